use crate::api::CreateOrgNodeRequest;
use crate::components::tree::{selected_label, NodeNavigator, TreeView};
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardTitle,
    CardToolbar, Dialog, DialogBody, DialogFooter, ErrorAlert, Input, Label, LoadingLine,
    NativeSelect, SelectChoice, Spinner, TextArea,
};
use crate::hierarchy::SelectionPolicy;
use crate::models::{AccountInfo, AdminUser, AssignmentRole, OrgNode};
use crate::state::{AppContext, OrgHierarchy, OrgUiActions};
use crate::storage::save_user_to_storage;
use icons::{LogOut, Plus, RefreshCw, UserPlus};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_location, use_query_map};
use strum::IntoEnumIterator;

const OUTLINE_BUTTON_CLASS: &str =
    "inline-flex h-8 items-center rounded-md border px-3 text-sm hover:bg-border/50";

#[component]
pub fn LoginPage() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let email_val = email.get();
        let password_val = password.get();
        let mut api_client = app_state.0.api_client.get_untracked();

        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match api_client.login(&email_val, &password_val).await {
                Ok(response) => {
                    tracing::info!("signed in");
                    api_client.set_token(response.token);
                    api_client.save_to_storage();
                    save_user_to_storage(&response.account);
                    app_state.0.api_client.set(api_client);
                    app_state.0.current_user.set(Some(response.account));
                    let _ = window().location().set_href("/");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "sign in failed");
                    error.set(Some(e.to_string()));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <div class="mb-6 flex items-center justify-center">
                    <a href="/" class="text-sm font-medium text-foreground">"Org Console"</a>
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">"Log in"</CardTitle>
                        <CardDescription class="text-xs">"Administrator account required."</CardDescription>
                    </CardHeader>

                    <CardContent>
                        <form class="flex flex-col gap-3" on:submit=on_submit>
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="email" class="text-xs">"Email"</Label>
                                <Input
                                    id="email"
                                    r#type="email"
                                    placeholder="admin@example.com"
                                    bind_value=email
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="password" class="text-xs">"Password"</Label>
                                <Input
                                    id="password"
                                    r#type="password"
                                    placeholder="••••••••"
                                    bind_value=password
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </div>

                            <ErrorAlert error=error />

                            <Button
                                class="w-full"
                                size=ButtonSize::Sm
                                attr:disabled=move || loading.get()
                            >
                                <span class="inline-flex items-center gap-2">
                                    <Show when=move || loading.get() fallback=|| ().into_view()>
                                        <Spinner />
                                    </Show>
                                    {move || if loading.get() { "Signing in..." } else { "Continue" }}
                                </span>
                            </Button>
                        </form>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}

/// Name to show for the signed-in account.
fn account_label(account: &AccountInfo) -> String {
    ["username", "name", "email"]
        .iter()
        .find_map(|k| {
            account
                .extra
                .get(*k)
                .and_then(|v| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
        })
        .unwrap_or("Administrator")
        .to_string()
}

fn user_label(user: &AdminUser) -> String {
    if user.email.trim().is_empty() {
        user.username.clone()
    } else {
        format!("{} ({})", user.username, user.email)
    }
}

/// Attribute value as shown in the details panel: strings bare, everything else as JSON.
fn attribute_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "—".to_string(),
        other => other.to_string(),
    }
}

fn focus_href(node_id: &str) -> String {
    format!("/?focus={}", urlencoding::encode(node_id))
}

/// An assignment the server accepted, shown under the form until the next submit.
#[derive(Clone, Debug, PartialEq)]
struct Assigned {
    node_id: String,
    node_name: String,
}

impl Assigned {
    fn message(&self) -> String {
        match self.node_name.trim() {
            "" => format!("Assigned to {}. ", self.node_id),
            name => format!("Assigned to {name}. "),
        }
    }

    fn href(&self) -> String {
        focus_href(&self.node_id)
    }
}

#[component]
pub fn AppLayout(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let unit_open: RwSignal<bool> = RwSignal::new(false);
    let assign_open: RwSignal<bool> = RwSignal::new(false);

    let actions = OrgUiActions {
        open_create_unit: Callback::new(move |_| unit_open.set(true)),
        open_assign_user: Callback::new(move |_| assign_open.set(true)),
    };
    provide_context(actions);

    let pathname = use_location().pathname;
    let nav_class = move |href: &'static str| {
        if pathname.get() == href {
            "text-sm font-medium text-foreground"
        } else {
            "text-sm text-muted-foreground hover:text-foreground"
        }
    };

    let who = move || {
        app_state
            .0
            .current_user
            .with(|u| u.as_ref().map(account_label))
            .unwrap_or_default()
    };

    view! {
        <div class="min-h-screen bg-background">
            <header class="border-b">
                <div class="mx-auto flex h-12 max-w-6xl items-center gap-6 px-4">
                    <a href="/" class="text-sm font-semibold">"Org Console"</a>
                    <nav class="flex items-center gap-4">
                        <a href="/" class=move || nav_class("/")>"Structure"</a>
                        <a href="/assignments" class=move || nav_class("/assignments")>"Assignments"</a>
                    </nav>
                    <div class="ml-auto flex items-center gap-2">
                        <Button size=ButtonSize::Sm on:click=move |_| actions.open_create_unit.run(())>
                            <Plus />
                            "New unit"
                        </Button>
                        <Button
                            variant=ButtonVariant::Outline
                            size=ButtonSize::Sm
                            on:click=move |_| actions.open_assign_user.run(())
                        >
                            <UserPlus />
                            "Assign user"
                        </Button>
                        <span class="hidden text-xs text-muted-foreground sm:inline">{who}</span>
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Icon
                            attr:aria-label="Sign out"
                            on:click=move |_| app_state.force_relogin()
                        >
                            <LogOut />
                        </Button>
                    </div>
                </div>
            </header>

            <main class="mx-auto max-w-6xl px-4 py-6">
                {children()}
            </main>

            <OrgUnitModal open=unit_open />
            <AssignUserModal open=assign_open />
        </div>
    }
}

#[component]
pub fn RootAuthed(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let is_authenticated = move || app_state.0.api_client.get().is_authenticated();

    // Store children so the view macro sees an `Fn` (not an `FnOnce`).
    let children = StoredValue::new(children);

    view! {
        <Show when=is_authenticated fallback=move || view! { <LoginPage /> }>
            <AppLayout>
                {move || children.with_value(|c| c())}
            </AppLayout>
        </Show>
    }
}

#[derive(Clone, Debug, PartialEq)]
struct UnitDetails {
    node: OrgNode,
    child_count: usize,
    path: String,
}

#[component]
fn UnitDetailsPanel(details: UnitDetails) -> impl IntoView {
    let attributes: Vec<(String, String)> = details
        .node
        .extra
        .iter()
        .map(|(k, v)| (k.clone(), attribute_text(v)))
        .collect();

    view! {
        <aside data-name="UnitDetails" class="flex flex-col gap-3 rounded-xl border p-4 text-sm">
            <div class="flex flex-col gap-1">
                <h3 class="font-semibold">{details.node.name.clone()}</h3>
                <p class="text-xs text-muted-foreground">{details.path}</p>
            </div>
            {(!details.node.description.is_empty())
                .then(|| view! { <p class="text-muted-foreground">{details.node.description.clone()}</p> })}
            <dl class="grid grid-cols-[auto_1fr] gap-x-4 gap-y-1 text-xs">
                <dt class="text-muted-foreground">"Status"</dt>
                <dd>{if details.node.is_active { "Active" } else { "Inactive" }}</dd>
                <dt class="text-muted-foreground">"Sub-units"</dt>
                <dd>{details.child_count}</dd>
                {attributes
                    .into_iter()
                    .map(|(k, v)| view! {
                        <dt class="text-muted-foreground">{k}</dt>
                        <dd class="break-all">{v}</dd>
                    })
                    .collect_view()}
            </dl>
        </aside>
    }
}

/// Full tree of the organization, drillable one level at a time.
#[component]
pub fn OrgStructurePage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let actions = use_context::<OrgUiActions>();

    let hierarchy = OrgHierarchy::new(SelectionPolicy::strict());
    let revision = app_state.0.org_revision;

    Effect::new(move |_| {
        revision.track();
        hierarchy.load(app_state);
    });
    on_cleanup(move || hierarchy.close());

    // `?focus=<id>` lands on that unit once a snapshot is in.
    let query = use_query_map();
    let focus = move || query.get().get("focus").filter(|f| !f.trim().is_empty());
    let generation = Memo::new(move |_| hierarchy.session.with(|s| s.generation()));
    Effect::new(move |_| {
        if generation.get() == 0 {
            return;
        }
        if let Some(id) = focus() {
            hierarchy.reveal(&id);
        }
    });

    let is_empty = Memo::new(move |_| hierarchy.session.with(|s| s.is_empty()));
    let summary = move || {
        hierarchy.session.with(|s| {
            let n = s.node_count();
            let roots = s.forest().len();
            format!("{n} units, {roots} top-level")
        })
    };
    let details = move || {
        hierarchy.session.with(|s| {
            s.selected().map(|n| UnitDetails {
                node: n.item.clone(),
                child_count: n.children.len(),
                path: selected_label(s).unwrap_or_default(),
            })
        })
    };

    view! {
        <Card>
            <CardHeader>
                <div class="flex flex-col gap-1">
                    <CardTitle>"Organization structure"</CardTitle>
                    <CardDescription class="text-xs">{summary}</CardDescription>
                </div>
                <CardToolbar>
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        attr:disabled=move || hierarchy.loading.get()
                        on:click=move |_| hierarchy.load(app_state)
                    >
                        <RefreshCw />
                        "Refresh"
                    </Button>
                    {actions.map(|a| view! {
                        <Button size=ButtonSize::Sm on:click=move |_| a.open_create_unit.run(())>
                            <Plus />
                            "New unit"
                        </Button>
                    })}
                </CardToolbar>
            </CardHeader>

            <CardContent>
                <div class="flex flex-col gap-4">
                    <ErrorAlert error=hierarchy.error />
                    {move || {
                        if is_empty.get() && hierarchy.loading.get() {
                            view! { <LoadingLine label="Loading structure..." /> }.into_any()
                        } else if is_empty.get() {
                            view! {
                                <p class="text-sm text-muted-foreground">"No units yet."</p>
                            }
                                .into_any()
                        } else {
                            view! {
                                <div class="grid gap-6 md:grid-cols-[2fr_1fr]">
                                    <TreeView hierarchy=hierarchy />
                                    {move || {
                                        details()
                                            .map(|d| view! { <UnitDetailsPanel details=d /> }.into_any())
                                            .unwrap_or_else(|| view! {
                                                <p class="text-xs text-muted-foreground">
                                                    "Select a unit to see its details."
                                                </p>
                                            }.into_any())
                                    }}
                                </div>
                            }
                                .into_any()
                        }
                    }}
                </div>
            </CardContent>
        </Card>
    }
}

/// Create a unit under a parent picked with the navigator.
#[component]
pub fn OrgUnitModal(open: RwSignal<bool>) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let hierarchy = OrgHierarchy::new(SelectionPolicy::default());

    let name: RwSignal<String> = RwSignal::new(String::new());
    let description: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let saving: RwSignal<bool> = RwSignal::new(false);

    // Each opening is a fresh session.
    Effect::new(move |was_open: Option<bool>| {
        let is_open = open.get();
        if is_open && was_open != Some(true) {
            name.set(String::new());
            description.set(String::new());
            error.set(None);
            hierarchy.open(app_state);
        }
        is_open
    });

    let dismiss = move || {
        open.set(false);
        hierarchy.close();
    };

    let parent_label = move || {
        hierarchy
            .session
            .with(selected_label)
            .unwrap_or_else(|| "Top level".to_string())
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let name_val = name.get_untracked().trim().to_string();
        if name_val.is_empty() {
            error.set(Some("Name is required.".to_string()));
            return;
        }
        let req = CreateOrgNodeRequest {
            parent_id: hierarchy.selected_id(),
            name: name_val,
            description: description.get_untracked().trim().to_string(),
        };
        let api_client = app_state.0.api_client.get_untracked();

        saving.set(true);
        error.set(None);

        spawn_local(async move {
            match api_client.create_org_node(req).await {
                Ok(node) => {
                    tracing::info!(id = %node.id, "org unit created");
                    app_state.bump_org_revision();
                    dismiss();
                }
                Err(e) => error.set(app_state.api_error_message(e)),
            }
            saving.set(false);
        });
    };

    view! {
        <Dialog
            open=open
            title="New unit"
            description="Pick where the unit goes, then name it."
            on_close=Callback::new(move |_| hierarchy.close())
        >
            <form class="flex flex-col gap-4" on:submit=on_submit>
                <DialogBody>
                    <div class="flex flex-col gap-1.5">
                        <Label>"Parent unit"</Label>
                        <ErrorAlert error=hierarchy.error />
                        <Show when=move || hierarchy.loading.get() fallback=|| ().into_view()>
                            <LoadingLine label="Loading units..." />
                        </Show>
                        <NodeNavigator hierarchy=hierarchy pick_entered=true />
                        <p class="text-xs text-muted-foreground">
                            "Parent: "
                            <span class="text-foreground">{parent_label}</span>
                        </p>
                    </div>

                    <div class="flex flex-col gap-1.5">
                        <Label html_for="org-unit-name" required=true>"Name"</Label>
                        <Input id="org-unit-name" bind_value=name required=true autofocus=true />
                    </div>

                    <div class="flex flex-col gap-1.5">
                        <Label html_for="org-unit-description">"Description"</Label>
                        <TextArea id="org-unit-description" bind_value=description />
                    </div>

                    <ErrorAlert error=error />
                </DialogBody>

                <DialogFooter>
                    <button type="button" class=OUTLINE_BUTTON_CLASS on:click=move |_| dismiss()>
                        "Cancel"
                    </button>
                    <Button size=ButtonSize::Sm attr:disabled=move || saving.get()>
                        <Show when=move || saving.get() fallback=|| ().into_view()>
                            <Spinner />
                        </Show>
                        "Create"
                    </Button>
                </DialogFooter>
            </form>
        </Dialog>
    }
}

/// Assign a user to a unit picked with the navigator.
#[component]
pub(crate) fn AssignUserForm(
    hierarchy: OrgHierarchy,
    /// Runs when the "Show in structure" link is followed.
    #[prop(optional)]
    on_show: Option<Callback<()>>,
) -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let users: RwSignal<Vec<AdminUser>> = RwSignal::new(Vec::new());
    let users_loading: RwSignal<bool> = RwSignal::new(true);
    let user_id: RwSignal<String> = RwSignal::new(String::new());
    let role: RwSignal<String> = RwSignal::new(AssignmentRole::default().to_string());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let saving: RwSignal<bool> = RwSignal::new(false);
    let assigned: RwSignal<Option<Assigned>> = RwSignal::new(None);

    {
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.get_users().await {
                Ok(list) => {
                    tracing::debug!(users = list.len(), "user list loaded");
                    users.set(list);
                }
                Err(e) => error.set(app_state.api_error_message(e)),
            }
            users_loading.set(false);
        });
    }

    let user_options = Signal::derive(move || {
        users.with(|list| {
            list.iter()
                .map(|u| (u.id.clone(), user_label(u)))
                .collect::<Vec<SelectChoice>>()
        })
    });
    let role_options = Signal::derive(|| {
        AssignmentRole::iter()
            .map(|r| (r.to_string(), r.label().to_string()))
            .collect::<Vec<SelectChoice>>()
    });

    let target_label = move || {
        hierarchy
            .session
            .with(selected_label)
            .unwrap_or_else(|| "No unit selected".to_string())
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let Some(node) = hierarchy.selected_node() else {
            error.set(Some("Pick a unit first.".to_string()));
            return;
        };
        let uid = user_id.get_untracked();
        if uid.is_empty() {
            error.set(Some("Pick a user.".to_string()));
            return;
        }
        let role_val = AssignmentRole::from_value(&role.get_untracked()).unwrap_or_default();
        let api_client = app_state.0.api_client.get_untracked();

        saving.set(true);
        error.set(None);
        assigned.set(None);

        spawn_local(async move {
            match api_client.assign_user(&uid, &node.id, role_val).await {
                Ok(_) => {
                    tracing::info!(user = %uid, node = %node.id, role = %role_val, "user assigned");
                    assigned.set(Some(Assigned {
                        node_id: node.id.clone(),
                        node_name: node.name.clone(),
                    }));
                }
                Err(e) => error.set(app_state.api_error_message(e)),
            }
            saving.set(false);
        });
    };

    view! {
        <form data-name="AssignUserForm" class="flex flex-col gap-4" on:submit=on_submit>
            <div class="flex flex-col gap-1.5">
                <Label required=true>"Unit"</Label>
                <ErrorAlert error=hierarchy.error />
                <Show when=move || hierarchy.loading.get() fallback=|| ().into_view()>
                    <LoadingLine label="Loading units..." />
                </Show>
                <NodeNavigator hierarchy=hierarchy pick_entered=true />
                <p class="text-xs text-muted-foreground">
                    "Unit: "
                    <span class="text-foreground">{target_label}</span>
                </p>
            </div>

            <div class="grid gap-4 sm:grid-cols-2">
                <div class="flex flex-col gap-1.5">
                    <Label html_for="assign-user" required=true>"User"</Label>
                    <NativeSelect
                        id="assign-user"
                        options=user_options
                        bind_value=user_id
                        placeholder="Choose a user"
                    />
                    <Show when=move || users_loading.get() fallback=|| ().into_view()>
                        <span class="text-xs text-muted-foreground">"Loading users..."</span>
                    </Show>
                </div>
                <div class="flex flex-col gap-1.5">
                    <Label html_for="assign-role">"Role"</Label>
                    <NativeSelect id="assign-role" options=role_options bind_value=role />
                </div>
            </div>

            <ErrorAlert error=error />

            {move || {
                assigned
                    .get()
                    .map(|done| {
                        view! {
                            <p class="text-xs text-muted-foreground">
                                {done.message()}
                                <a
                                    class="text-primary underline underline-offset-4"
                                    href=done.href()
                                    on:click=move |_| {
                                        if let Some(cb) = on_show {
                                            cb.run(());
                                        }
                                    }
                                >
                                    "Show in structure"
                                </a>
                            </p>
                        }
                    })
            }}

            <div class="flex justify-end">
                <Button size=ButtonSize::Sm attr:disabled=move || saving.get()>
                    <Show when=move || saving.get() fallback=|| ().into_view()>
                        <Spinner />
                    </Show>
                    "Assign"
                </Button>
            </div>
        </form>
    }
}

#[component]
pub fn AssignUserModal(open: RwSignal<bool>) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let hierarchy = OrgHierarchy::new(SelectionPolicy::default());

    Effect::new(move |was_open: Option<bool>| {
        let is_open = open.get();
        if is_open && was_open != Some(true) {
            hierarchy.open(app_state);
        }
        is_open
    });

    view! {
        <Dialog
            open=open
            title="Assign user"
            description="Choose a unit, a user and a role."
            on_close=Callback::new(move |_| hierarchy.close())
        >
            // Stays open after a successful assignment so the confirmation is visible.
            <AssignUserForm
                hierarchy=hierarchy
                on_show=Callback::new(move |_| {
                    open.set(false);
                    hierarchy.close();
                })
            />
        </Dialog>
    }
}

#[component]
pub fn AssignmentsPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let hierarchy = OrgHierarchy::new(SelectionPolicy::default());
    let revision = app_state.0.org_revision;

    Effect::new(move |_| {
        revision.track();
        hierarchy.load(app_state);
    });
    on_cleanup(move || hierarchy.close());

    view! {
        <Card>
            <CardHeader>
                <div class="flex flex-col gap-1">
                    <CardTitle>"Assign users"</CardTitle>
                    <CardDescription class="text-xs">
                        "Open a unit to look inside it. Select the unit that should receive the user."
                    </CardDescription>
                </div>
            </CardHeader>
            <CardContent>
                <AssignUserForm hierarchy=hierarchy />
            </CardContent>
        </Card>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_label_prefers_username() {
        let account = AccountInfo {
            extra: serde_json::json!({"username": "root", "email": "root@example.com"}),
        };
        assert_eq!(account_label(&account), "root");
    }

    #[test]
    fn test_account_label_falls_back() {
        let account = AccountInfo {
            extra: serde_json::json!({"username": "  ", "email": "ops@example.com"}),
        };
        assert_eq!(account_label(&account), "ops@example.com");

        let account = AccountInfo {
            extra: serde_json::json!({}),
        };
        assert_eq!(account_label(&account), "Administrator");
    }

    #[test]
    fn test_user_label() {
        let mut user = AdminUser {
            id: "1".to_string(),
            username: "ada".to_string(),
            email: String::new(),
        };
        assert_eq!(user_label(&user), "ada");
        user.email = "ada@example.com".to_string();
        assert_eq!(user_label(&user), "ada (ada@example.com)");
    }

    #[test]
    fn test_attribute_text() {
        assert_eq!(attribute_text(&serde_json::json!("Berlin")), "Berlin");
        assert_eq!(attribute_text(&serde_json::json!(12)), "12");
        assert_eq!(attribute_text(&serde_json::Value::Null), "—");
    }

    #[test]
    fn test_focus_href_encodes_id() {
        assert_eq!(focus_href("a b/c"), "/?focus=a%20b%2Fc");
    }

    #[test]
    fn test_assigned_confirmation_links_to_unit() {
        let done = Assigned {
            node_id: "u-7".to_string(),
            node_name: "Ops".to_string(),
        };
        assert_eq!(done.message(), "Assigned to Ops. ");
        assert_eq!(done.href(), "/?focus=u-7");

        let unnamed = Assigned {
            node_id: "u 8".to_string(),
            node_name: "  ".to_string(),
        };
        assert_eq!(unnamed.message(), "Assigned to u 8. ");
        assert_eq!(unnamed.href(), "/?focus=u%208");
    }
}
