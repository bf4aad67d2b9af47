use crate::hierarchy::Hierarchical;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

/// Backend account info object.
///
/// Returned under the `account` field on login.
/// We keep it flexible to avoid breaking when backend fields evolve.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct AccountInfo {
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

/// Parent id some backends use for "no parent".
pub(crate) const ROOT_PARENT_ID: &str = "00000000-0000-0000-0000-000000000000";

/// One unit of the organizational structure, as delivered by the backend.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OrgNode {
    pub id: String,

    /// Parent unit id. Absent, empty or all-zero for roots.
    #[serde(rename = "parent-id", default)]
    pub parent_id: Option<String>,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(rename = "is-active", default = "default_true")]
    pub is_active: bool,

    /// Everything else the backend sends, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_true() -> bool {
    true
}

impl Hierarchical for OrgNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn parent_id(&self) -> Option<&str> {
        self.parent_id
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty() && *p != ROOT_PARENT_ID)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct AdminUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum AssignmentRole {
    #[default]
    Member,
    Manager,
    Viewer,
}

impl AssignmentRole {
    pub fn label(self) -> &'static str {
        match self {
            Self::Member => "Member",
            Self::Manager => "Manager",
            Self::Viewer => "Viewer",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        use strum::IntoEnumIterator;
        Self::iter().find(|r| r.as_ref() == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_org_node_deserialize_keeps_extra_fields() {
        let json = r#"{
            "id": "u1",
            "parent-id": null,
            "name": "Engineering",
            "description": "All engineers",
            "is-active": false,
            "cost-center": "CC-7",
            "headcount": 42
        }"#;
        let node: OrgNode = serde_json::from_str(json).expect("org node should parse");
        assert_eq!(node.id, "u1");
        assert!(node.parent_id.is_none());
        assert!(!node.is_active);
        assert_eq!(node.extra["cost-center"], "CC-7");
        assert_eq!(node.extra["headcount"], 42);

        let back = serde_json::to_value(&node).expect("should serialize");
        assert_eq!(back["cost-center"], "CC-7");
        assert_eq!(back["parent-id"], serde_json::Value::Null);
    }

    #[test]
    fn test_org_node_defaults() {
        let node: OrgNode =
            serde_json::from_str(r#"{"id": "u1", "name": "Ops"}"#).expect("should parse");
        assert!(node.is_active);
        assert_eq!(node.description, "");
        assert!(node.extra.is_empty());
    }

    #[test]
    fn test_org_node_root_markers() {
        let mut node: OrgNode =
            serde_json::from_str(r#"{"id": "u1", "name": "Ops"}"#).expect("should parse");
        assert_eq!(Hierarchical::parent_id(&node), None);

        node.parent_id = Some(String::new());
        assert_eq!(Hierarchical::parent_id(&node), None);

        node.parent_id = Some(ROOT_PARENT_ID.to_string());
        assert_eq!(Hierarchical::parent_id(&node), None);

        node.parent_id = Some("p1".to_string());
        assert_eq!(Hierarchical::parent_id(&node), Some("p1"));
    }

    #[test]
    fn test_assignment_role_values() {
        assert_eq!(AssignmentRole::Manager.as_ref(), "manager");
        assert_eq!(AssignmentRole::Viewer.to_string(), "viewer");
        assert_eq!(AssignmentRole::from_value("member"), Some(AssignmentRole::Member));
        assert_eq!(AssignmentRole::from_value("owner"), None);
    }
}
