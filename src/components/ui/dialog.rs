use icons::X;
use leptos::ev;
use leptos::prelude::*;
use leptos_dom::helpers::window_event_listener;
use leptos_ui::clx;
use tw_merge::*;

use crate::components::hooks::use_random::use_random_id_for;

mod components {
    use super::*;
    clx! {DialogBody, div, "flex flex-col gap-4"}
    clx! {DialogFooter, footer, "flex flex-col-reverse gap-2 sm:flex-row sm:justify-end"}
}

pub use components::*;

/// Signal-driven modal dialog.
///
/// Closing (X button, backdrop click, Escape) sets `open` to false and then
/// runs `on_close`, so hosts can tear down whatever the modal session owns.
#[component]
pub fn Dialog(
    open: RwSignal<bool>,
    #[prop(into)] title: String,
    #[prop(into, optional)] description: String,
    #[prop(optional)] on_close: Option<Callback<()>>,
    #[prop(into, optional)] class: String,
    children: ChildrenFn,
) -> impl IntoView {
    let title_id = use_random_id_for("dialog_title");
    let merged_class = tw_merge!(
        "fixed top-[50%] left-[50%] z-100 w-full max-w-[calc(100%-2rem)] sm:max-w-lg max-h-[85vh] overflow-y-auto translate-x-[-50%] translate-y-[-50%] rounded-2xl border bg-background p-6 shadow-lg",
        class
    );

    let close = Callback::new(move |_: ()| {
        if !open.get_untracked() {
            return;
        }
        open.set(false);
        if let Some(cb) = on_close {
            cb.run(());
        }
    });

    let escape = window_event_listener(ev::keydown, move |e: web_sys::KeyboardEvent| {
        if e.key() == "Escape" && open.get_untracked() {
            e.prevent_default();
            close.run(());
        }
    });
    on_cleanup(move || escape.remove());

    let children = StoredValue::new(children);
    let title = StoredValue::new(title);
    let description = StoredValue::new(description);
    let title_id = StoredValue::new(title_id);
    let merged_class = StoredValue::new(merged_class);

    view! {
        <Show when=move || open.get() fallback=|| ().into_view()>
            <div
                data-name="DialogBackdrop"
                class="fixed inset-0 z-60 bg-black/50"
                on:click=move |_| close.run(())
            />
            <div
                data-name="DialogContent"
                role="dialog"
                aria-modal="true"
                aria-labelledby=title_id.get_value()
                class=merged_class.get_value()
            >
                <button
                    type="button"
                    class="absolute top-4 right-4 rounded-sm p-1 focus:ring-2 focus:ring-ring focus:outline-none [&_svg:not([class*='size-'])]:size-4"
                    aria-label="Close dialog"
                    on:click=move |_| close.run(())
                >
                    <X />
                </button>

                <header class="mb-4 flex flex-col gap-2 pr-6">
                    <h3 id=title_id.get_value() class="text-lg leading-none font-semibold">
                        {title.get_value()}
                    </h3>
                    {move || {
                        let d = description.get_value();
                        (!d.is_empty()).then(|| view! { <p class="text-muted-foreground text-sm">{d}</p> })
                    }}
                </header>

                {move || children.with_value(|c| c())}
            </div>
        </Show>
    }
}
