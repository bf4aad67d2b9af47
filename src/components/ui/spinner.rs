use icons::Loader;
use leptos::prelude::*;
use tw_merge::tw_merge;

#[component]
pub fn Spinner(#[prop(into, optional)] class: String) -> impl IntoView {
    let merged_class = tw_merge!("size-4 animate-spin", class);

    view! { <Loader class=merged_class attr:role="status" attr:aria-label="Loading" /> }
}

/// Spinner with a muted caption, for whole-panel loading states.
#[component]
pub fn LoadingLine(#[prop(into)] label: String) -> impl IntoView {
    view! {
        <div class="flex items-center gap-2 text-sm text-muted-foreground">
            <Spinner />
            {label}
        </div>
    }
}
