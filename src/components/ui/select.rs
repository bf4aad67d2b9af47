use leptos::prelude::*;
use tw_merge::*;

/// One `<option>` of a [`NativeSelect`]: (value, label).
pub type SelectChoice = (String, String);

/// Plain `<select>` bound to a signal. The empty value stands for "nothing chosen".
#[component]
pub fn NativeSelect(
    #[prop(into)] options: Signal<Vec<SelectChoice>>,
    #[prop(into)] bind_value: RwSignal<String>,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] id: String,
    #[prop(into, optional)] class: String,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "h-9 w-full rounded-md border border-input bg-background px-2 text-sm shadow-xs outline-none focus-visible:border-ring focus-visible:ring-2 focus-visible:ring-ring/50 disabled:opacity-50",
        class
    );
    let has_placeholder = !placeholder.is_empty();

    view! {
        <select
            data-name="NativeSelect"
            id=id
            class=merged_class
            prop:value=move || bind_value.get()
            on:change=move |ev| bind_value.set(event_target_value(&ev))
        >
            {has_placeholder.then(|| view! { <option value="">{placeholder.clone()}</option> })}
            <For
                each=move || options.get()
                key=|(value, _)| value.clone()
                children=move |(value, label)| {
                    let v = value.clone();
                    view! {
                        <option value=value selected=move || bind_value.get() == v>
                            {label}
                        </option>
                    }
                }
            />
        </select>
    }
}
