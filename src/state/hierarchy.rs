use crate::hierarchy::{FetchGuard, HierarchySession, SelectionPolicy};
use crate::models::OrgNode;
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Reactive wrapper around one navigation session over the org structure.
///
/// Each surface (tree page, unit modal, assignment modal) owns one of these;
/// they never share cursor or selection state.
#[derive(Clone, Copy)]
pub(crate) struct OrgHierarchy {
    pub session: RwSignal<HierarchySession<OrgNode>>,
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
    guard: RwSignal<FetchGuard>,
}

impl OrgHierarchy {
    pub fn new(policy: SelectionPolicy) -> Self {
        Self {
            session: RwSignal::new(HierarchySession::with_policy(policy)),
            loading: RwSignal::new(false),
            error: RwSignal::new(None),
            guard: RwSignal::new(FetchGuard::new()),
        }
    }

    /// Fetch a fresh snapshot. A response that arrives after a newer load was
    /// started, or after [`OrgHierarchy::close`], is dropped.
    pub fn load(self, app_state: AppContext) {
        let mut ticket = 0;
        self.guard.update(|g| ticket = g.begin());

        self.loading.set(true);
        self.error.set(None);

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            let result = api_client.get_org_nodes().await;

            // Ignore stale responses.
            if !self.guard.get_untracked().accept(ticket) {
                tracing::debug!(ticket, "discarding stale org snapshot");
                return;
            }

            match result {
                Ok(nodes) => {
                    tracing::info!(nodes = nodes.len(), "org snapshot loaded");
                    self.session.update(|s| s.replace_snapshot(&nodes));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "org snapshot load failed");
                    // The last good forest stays in place.
                    self.error.set(app_state.api_error_message(e));
                }
            }
            self.loading.set(false);
        });
    }

    /// Start a new editing session: back to the root level, nothing selected,
    /// and a fresh snapshot on the way.
    pub fn open(self, app_state: AppContext) {
        self.session.update(|s| s.restart());
        self.load(app_state);
    }

    /// Tear down: any load still in flight will be discarded.
    pub fn close(self) {
        self.guard.update(|g| g.close());
        self.loading.set(false);
    }

    pub fn enter(self, id: &str) {
        self.session.update(|s| {
            s.enter(id);
        });
    }

    pub fn back(self) {
        self.session.update(|s| {
            s.back();
        });
    }

    pub fn reset(self) {
        self.session.update(|s| {
            s.reset();
        });
    }

    pub fn select(self, id: &str) {
        self.session.update(|s| {
            s.select(id);
        });
    }

    pub fn select_entered(self) {
        self.session.update(|s| {
            s.select_entered();
        });
    }

    pub fn reveal(self, id: &str) {
        self.session.update(|s| {
            s.reveal(id);
        });
    }

    pub fn selected_node(self) -> Option<OrgNode> {
        self.session.with(|s| s.selected().map(|n| n.item.clone()))
    }

    pub fn selected_id(self) -> Option<String> {
        self.session.with(|s| s.selected_id().map(|id| id.to_string()))
    }
}
