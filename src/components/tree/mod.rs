mod rows;

pub(crate) use rows::{crumbs, level_rows, selected_label, tree_rows};

use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::state::OrgHierarchy;
use icons::{ChevronLeft, ChevronRight};
use leptos::prelude::*;

/// "All units / HQ / Engineering" trail. Each crumb jumps back to its level.
#[component]
pub(crate) fn Breadcrumbs(hierarchy: OrgHierarchy) -> impl IntoView {
    let trail = move || hierarchy.session.with(crumbs);

    view! {
        <nav aria-label="Breadcrumb" class="flex flex-wrap items-center gap-1 text-xs text-muted-foreground">
            <button
                type="button"
                class="hover:text-foreground hover:underline"
                on:click=move |_| hierarchy.reset()
            >
                "All units"
            </button>
            <For
                each=trail
                key=|c| (c.id.clone(), c.backs)
                children=move |c| {
                    let backs = c.backs;
                    view! {
                        <span aria-hidden="true">"/"</span>
                        <button
                            type="button"
                            class="hover:text-foreground hover:underline"
                            on:click=move |_| {
                                for _ in 0..backs {
                                    hierarchy.back();
                                }
                            }
                        >
                            {c.name}
                        </button>
                    }
                }
            />
        </nav>
    }
}

/// Drill-down picker over one level at a time.
///
/// Clicking a row selects it; the chevron enters it. With `pick_entered`, the
/// node being shown can itself be picked ("under this unit").
#[component]
pub(crate) fn NodeNavigator(
    hierarchy: OrgHierarchy,
    #[prop(optional)] pick_entered: bool,
) -> impl IntoView {
    let rows = move || hierarchy.session.with(level_rows);
    let at_root = move || hierarchy.session.with(|s| s.depth() == 0);
    let entered_name = move || {
        hierarchy
            .session
            .with(|s| s.entered().map(|n| n.item.name.clone()))
    };
    let entered_selected = move || {
        hierarchy.session.with(|s| match (s.entered(), s.selected_id()) {
            (Some(n), Some(sel)) => n.item.id == sel,
            _ => false,
        })
    };

    view! {
        <div data-name="NodeNavigator" class="flex flex-col gap-2">
            <div class="flex items-center justify-between gap-2">
                <Breadcrumbs hierarchy=hierarchy />
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Sm
                    attr:disabled=at_root
                    on:click=move |_| hierarchy.back()
                >
                    <ChevronLeft />
                    "Back"
                </Button>
            </div>

            <Show when=move || pick_entered && !at_root() fallback=|| ().into_view()>
                <button
                    type="button"
                    class=move || {
                        if entered_selected() {
                            "rounded-md border border-primary bg-primary/10 px-3 py-2 text-left text-xs"
                        } else {
                            "rounded-md border border-dashed px-3 py-2 text-left text-xs text-muted-foreground hover:bg-accent"
                        }
                    }
                    on:click=move |_| hierarchy.select_entered()
                >
                    {move || format!("Use \"{}\" itself", entered_name().unwrap_or_default())}
                </button>
            </Show>

            <ul role="listbox" class="flex max-h-72 flex-col gap-1 overflow-y-auto">
                <Show
                    when=move || !rows().is_empty()
                    fallback=|| view! { <li class="px-3 py-2 text-xs text-muted-foreground">"No units."</li> }
                >
                    <For
                        each=rows
                        key=|r| (r.id.clone(), r.selected)
                        children=move |r| {
                            let id_select = r.id.clone();
                            let id_enter = r.id.clone();
                            let has_children = r.child_count > 0;
                            let row_class = if r.selected {
                                "flex items-center gap-2 rounded-md border border-primary bg-primary/10 px-3 py-2"
                            } else {
                                "flex items-center gap-2 rounded-md border px-3 py-2 hover:bg-accent"
                            };
                            view! {
                                <li role="option" aria-selected=r.selected.to_string() class=row_class>
                                    <button
                                        type="button"
                                        class="flex min-w-0 flex-1 flex-col items-start text-left"
                                        on:click=move |_| hierarchy.select(&id_select)
                                    >
                                        <span class=if r.is_active { "truncate text-sm font-medium" } else { "truncate text-sm font-medium text-muted-foreground line-through" }>
                                            {r.name}
                                        </span>
                                        <span class="truncate text-xs text-muted-foreground">{r.description}</span>
                                    </button>
                                    <Show when=move || has_children fallback=|| ().into_view()>
                                        <span class="text-xs text-muted-foreground">{r.child_count}</span>
                                        <Button
                                            variant=ButtonVariant::Ghost
                                            size=ButtonSize::Icon
                                            attr:aria-label="Open unit"
                                            on:click={
                                                let id = id_enter.clone();
                                                move |_| hierarchy.enter(&id)
                                            }
                                        >
                                            <ChevronRight />
                                        </Button>
                                    </Show>
                                </li>
                            }
                        }
                    />
                </Show>
            </ul>
        </div>
    }
}

/// Whole-subtree view of the level being shown, for the structure page.
#[component]
pub(crate) fn TreeView(hierarchy: OrgHierarchy) -> impl IntoView {
    let rows = move || hierarchy.session.with(tree_rows);

    view! {
        <div data-name="TreeView" class="flex flex-col gap-2">
            <Breadcrumbs hierarchy=hierarchy />
            <ul role="tree" class="flex flex-col">
                <For
                    each=rows
                    key=|r| (r.id.clone(), r.selected, r.indent)
                    children=move |r| {
                        let pad = format!("padding-left: {}rem", r.indent as f32 * 1.25);
                        let id_select = r.id.clone();
                        let id_enter = r.id.clone();
                        let can_enter = r.on_current_level && r.child_count > 0;
                        let selectable = r.on_current_level;
                        let name_class = match (r.selected, r.is_active) {
                            (true, _) => "font-semibold text-primary",
                            (false, true) => "text-foreground",
                            (false, false) => "text-muted-foreground",
                        };
                        view! {
                            <li role="treeitem" aria-selected=r.selected.to_string() class="flex items-center gap-2 py-1 text-sm" style=pad>
                                <button
                                    type="button"
                                    class=name_class
                                    disabled=!selectable
                                    on:click=move |_| hierarchy.select(&id_select)
                                >
                                    {r.name}
                                </button>
                                {(!r.is_active).then(|| view! { <span class="rounded border px-1 text-[10px] text-muted-foreground">"inactive"</span> })}
                                <Show when=move || can_enter fallback=|| ().into_view()>
                                    <button
                                        type="button"
                                        class="text-xs text-muted-foreground hover:text-foreground"
                                        on:click={
                                            let id = id_enter.clone();
                                            move |_| hierarchy.enter(&id)
                                        }
                                    >
                                        "focus"
                                    </button>
                                </Show>
                            </li>
                        }
                    }
                />
            </ul>
        </div>
    }
}
