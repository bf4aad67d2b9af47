mod hierarchy;

pub(crate) use hierarchy::OrgHierarchy;

use crate::api::{ApiClient, ApiError};
use crate::models::AccountInfo;
use crate::storage::load_user_from_storage;
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,
    pub current_user: RwSignal<Option<AccountInfo>>,

    /// Bumped whenever the org structure is changed from this console, so
    /// mounted views know to fetch a fresh snapshot.
    pub org_revision: RwSignal<u64>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            api_client: RwSignal::new(ApiClient::load_from_storage()),
            current_user: RwSignal::new(load_user_from_storage()),
            org_revision: RwSignal::new(0),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);

impl AppContext {
    /// Drop the session and send the user to the login page.
    pub fn force_relogin(&self) {
        let mut c = self.0.api_client.get_untracked();
        c.logout();
        self.0.api_client.set(c);
        self.0.current_user.set(None);
        let _ = window().location().set_href("/login");
    }

    /// Route an API error: unauthorized ends the session, anything else is
    /// returned as a message for the caller to show.
    pub fn api_error_message(&self, e: ApiError) -> Option<String> {
        if e.is_unauthorized() {
            tracing::info!("session expired, redirecting to login");
            self.force_relogin();
            None
        } else {
            Some(e.to_string())
        }
    }

    pub fn bump_org_revision(&self) {
        self.0.org_revision.update(|r| *r = r.wrapping_add(1));
    }
}

#[derive(Clone, Copy)]
pub(crate) struct OrgUiActions {
    pub open_create_unit: Callback<()>,
    pub open_assign_user: Callback<()>,
}
