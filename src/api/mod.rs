use crate::config::EnvConfig;
use crate::models::{AccountInfo, AdminUser, AssignmentRole, OrgNode};
use crate::storage::{clear_session_storage, load_token_from_storage, save_token_to_storage};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn unauthorized() -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized,
            message: "Unauthorized".to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct LoginResponse {
    pub token: String,
    pub account: AccountInfo,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct CreateOrgNodeRequest {
    #[serde(rename = "parent-id", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub name: String,
    pub description: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct AssignUserRequest {
    #[serde(rename = "user-id")]
    pub user_id: String,
    #[serde(rename = "node-id")]
    pub node_id: String,
    pub role: String,
}

#[derive(Clone)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) token: Option<String>,
}

impl ApiClient {
    #[cfg(test)]
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            token: None,
        }
    }

    pub fn load_from_storage() -> Self {
        Self {
            base_url: EnvConfig::new().api_url,
            token: load_token_from_storage(),
        }
    }

    pub fn save_to_storage(&self) {
        if let Some(token) = &self.token {
            save_token_to_storage(token);
        }
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn logout(&mut self) {
        self.token = None;
        clear_session_storage();
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> ApiResult<T> {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        let mut req = client.post(url).json(body);
        if let Some(header) = self.auth_header() {
            req = req.header("Authorization", header);
        }

        tracing::debug!(path, "api request");
        let res = req.send().await.map_err(ApiError::network)?;

        if res.status().is_success() {
            res.json().await.map_err(ApiError::parse)
        } else if res.status().as_u16() == 401 {
            Err(ApiError::unauthorized())
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            tracing::warn!(path, %status, "api request failed");
            Err(ApiError::http(status, body, "Request failed"))
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        self.post(
            "/login/web-login",
            &LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            },
        )
        .await
    }

    /// Snapshot of the whole organizational structure.
    pub async fn get_org_nodes(&self) -> ApiResult<Vec<OrgNode>> {
        let data: serde_json::Value = self
            .post("/admin/get-org-tree", &serde_json::json!({}))
            .await?;
        Ok(Self::parse_org_node_list_response(data))
    }

    pub async fn create_org_node(&self, req_body: CreateOrgNodeRequest) -> ApiResult<OrgNode> {
        let data: serde_json::Value = self.post("/admin/create-org-node", &req_body).await?;

        // Accept either `{"node": {...}}` or the bare node.
        let item = data.get("node").cloned().unwrap_or(data);
        Self::parse_org_node(&item).ok_or_else(|| {
            ApiError::parse(format!(
                "Create org node succeeded but response is missing the node: {}",
                item
            ))
        })
    }

    pub async fn get_users(&self) -> ApiResult<Vec<AdminUser>> {
        let data: serde_json::Value = self
            .post("/admin/get-user-list", &serde_json::json!({}))
            .await?;
        Ok(Self::parse_user_list_response(data))
    }

    pub async fn assign_user(
        &self,
        user_id: &str,
        node_id: &str,
        role: AssignmentRole,
    ) -> ApiResult<serde_json::Value> {
        self.post(
            "/admin/assign-user",
            &AssignUserRequest {
                user_id: user_id.to_string(),
                node_id: node_id.to_string(),
                role: role.to_string(),
            },
        )
        .await
    }

    pub(crate) fn parse_org_node_list_response(data: serde_json::Value) -> Vec<OrgNode> {
        let list = data
            .get("org-list")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        list.iter().filter_map(Self::parse_org_node).collect()
    }

    /// Preferred: canonical kebab-case keys. Namespaced (`org-nodes/...`) keys are
    /// accepted as well. Entries without an id are dropped.
    fn parse_org_node(item: &serde_json::Value) -> Option<OrgNode> {
        if let Ok(node) = serde_json::from_value::<OrgNode>(item.clone()) {
            return (!node.id.trim().is_empty()).then_some(node);
        }

        let obj = item.as_object()?;
        let get = |k: &str| {
            obj.get(k)
                .or_else(|| obj.get(&format!("org-nodes/{k}")))
        };
        let get_s = |k: &str| get(k).and_then(|v| v.as_str()).map(|s| s.to_string());

        let id = get_s("id").unwrap_or_default();
        if id.trim().is_empty() {
            return None;
        }

        let extra = obj
            .iter()
            .filter(|(k, _)| {
                let bare = k.strip_prefix("org-nodes/").unwrap_or(k);
                !matches!(bare, "id" | "parent-id" | "name" | "description" | "is-active")
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Some(OrgNode {
            id,
            parent_id: get_s("parent-id"),
            name: get_s("name").unwrap_or_default(),
            description: get_s("description").unwrap_or_default(),
            is_active: get("is-active").and_then(|v| v.as_bool()).unwrap_or(true),
            extra,
        })
    }

    pub(crate) fn parse_user_list_response(data: serde_json::Value) -> Vec<AdminUser> {
        let list = data
            .get("user-list")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        let mut out: Vec<AdminUser> = Vec::with_capacity(list.len());
        for item in list {
            let get_s = |k: &str| item.get(k).and_then(|v| v.as_str()).map(|s| s.to_string());

            let id = get_s("id").unwrap_or_default();
            let username = get_s("username").unwrap_or_default();

            if !id.trim().is_empty() && !username.trim().is_empty() {
                out.push(AdminUser {
                    id,
                    username,
                    email: get_s("email").unwrap_or_default(),
                });
            }
        }

        out
    }
}
