//! Wavefront user API types.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// A Wavefront user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The email identifier for a user.
    #[serde(rename = "identifier", default, deserialize_with = "nullable")]
    pub id: String,

    /// The customer the user is a member of.
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "String::is_empty"
    )]
    pub customer: String,

    /// Last successful login in epoch millis.
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "is_zero"
    )]
    pub last_successful_login: u64,

    /// The permissions granted to this user. Wavefront calls these "groups".
    #[serde(
        rename = "groups",
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub permissions: Vec<String>,

    /// Groups this user belongs to.
    #[serde(rename = "userGroups", default)]
    pub groups: UserGroups,

    /// Only sent on update, to change the user's password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl User {
    /// Handle for an existing user.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// Request to create a new user.
///
/// A credential cannot be set at creation time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserRequest {
    /// The only place the identifier is called an email address.
    pub email_address: String,

    #[serde(rename = "groups", skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,

    #[serde(rename = "userGroups", skip_serializing_if = "UserGroups::has_no_ids")]
    pub groups: UserGroups,
}

impl NewUserRequest {
    /// Create a request for `email_address` with no permissions or groups.
    pub fn new(email_address: impl Into<String>) -> Self {
        Self {
            email_address: email_address.into(),
            ..Default::default()
        }
    }

    /// Grant a permission.
    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    /// Add the user to the group with `id`.
    pub fn group(mut self, id: impl Into<String>) -> Self {
        self.groups.push(UserGroup::with_id(id));
        self
    }
}

/// A Wavefront user group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGroup {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,

    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "String::is_empty"
    )]
    pub name: String,

    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub permissions: Vec<String>,

    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "String::is_empty"
    )]
    pub customer: String,

    /// Identifiers of the group's members.
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub users: Vec<String>,

    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "is_zero"
    )]
    pub user_count: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<UserGroupProperties>,

    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "is_zero"
    )]
    pub created_epoch_millis: u64,
}

impl UserGroup {
    /// An unresolved group reference.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// Which parts of a group may be edited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGroupProperties {
    #[serde(default)]
    pub name_editable: bool,
    #[serde(default)]
    pub permissions_editable: bool,
    #[serde(default)]
    pub users_editable: bool,
}

/// Group memberships of a user.
///
/// Written as a list of group IDs. Read either as a list of IDs (search
/// results) or as full group objects (direct user responses). Every group
/// held after a decode has a non-empty ID.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserGroups(pub Vec<UserGroup>);

impl UserGroups {
    /// Unresolved groups for the given IDs. Empty IDs are skipped.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            ids.into_iter()
                .map(Into::into)
                .filter(|id| !id.is_empty())
                .map(UserGroup::with_id)
                .collect(),
        )
    }

    /// Decode either accepted wire shape.
    pub fn from_wire(raw: &serde_json::Value) -> Result<Self, serde_json::Error> {
        if raw.is_null() {
            return Ok(Self::default());
        }

        if let Ok(ids) = Vec::<Option<String>>::deserialize(raw) {
            return Ok(Self::from_ids(ids.into_iter().flatten()));
        }

        let groups = Vec::<UserGroup>::deserialize(raw)?;
        Ok(Self(
            groups.into_iter().filter(|g| !g.id.is_empty()).collect(),
        ))
    }

    /// IDs that would be sent on the wire.
    pub fn ids(&self) -> Vec<&str> {
        self.0
            .iter()
            .map(|g| g.id.as_str())
            .filter(|id| !id.is_empty())
            .collect()
    }

    pub fn has_no_ids(&self) -> bool {
        self.0.iter().all(|g| g.id.is_empty())
    }

    pub fn push(&mut self, group: UserGroup) {
        self.0.push(group);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UserGroup> {
        self.0.iter()
    }
}

impl From<Vec<UserGroup>> for UserGroups {
    fn from(groups: Vec<UserGroup>) -> Self {
        Self(groups)
    }
}

impl<'a> IntoIterator for &'a UserGroups {
    type Item = &'a UserGroup;
    type IntoIter = std::slice::Iter<'a, UserGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for UserGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.ids())
    }
}

impl<'de> Deserialize<'de> for UserGroups {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Self::from_wire(&raw).map_err(de::Error::custom)
    }
}

/// Treat an explicit `null` like a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encodes_only_non_empty_ids() {
        let groups = UserGroups::from(vec![
            UserGroup::with_id("g1"),
            UserGroup {
                name: "unsaved".to_string(),
                ..Default::default()
            },
            UserGroup {
                id: "g2".to_string(),
                name: "Eng".to_string(),
                ..Default::default()
            },
        ]);
        assert_eq!(serde_json::to_value(&groups).unwrap(), json!(["g1", "g2"]));
    }

    #[test]
    fn empty_groups_encode_as_empty_list() {
        assert_eq!(
            serde_json::to_value(UserGroups::default()).unwrap(),
            json!([])
        );
    }

    #[test]
    fn decodes_id_list() {
        let groups: UserGroups = serde_json::from_value(json!(["g1", "g2"])).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups.0[0], UserGroup::with_id("g1"));
        assert_eq!(groups.0[1], UserGroup::with_id("g2"));
    }

    #[test]
    fn decodes_full_objects() {
        let groups: UserGroups =
            serde_json::from_value(json!([{"id": "g1", "name": "Eng"}])).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.0[0].id, "g1");
        assert_eq!(groups.0[0].name, "Eng");
        assert!(groups.0[0].permissions.is_empty());
    }

    #[test]
    fn decode_drops_groups_without_id() {
        let groups: UserGroups =
            serde_json::from_value(json!([{"name": "orphan"}, {"id": "g3"}])).unwrap();
        assert_eq!(groups.ids(), vec!["g3"]);

        let groups: UserGroups = serde_json::from_value(json!(["", null, "g4"])).unwrap();
        assert_eq!(groups.ids(), vec!["g4"]);
    }

    #[test]
    fn decode_rejects_other_shapes() {
        assert!(serde_json::from_value::<UserGroups>(json!("g1")).is_err());
        assert!(serde_json::from_value::<UserGroups>(json!({"id": "g1"})).is_err());
        assert!(serde_json::from_value::<UserGroups>(json!([1, 2])).is_err());
    }

    #[test]
    fn user_wire_names() {
        let user = User {
            id: "jane@example.com".to_string(),
            customer: "acme".to_string(),
            last_successful_login: 1_700_000_000_000,
            permissions: vec!["agent_management".to_string()],
            groups: UserGroups::from_ids(["g1"]),
            credential: Some("hunter2".to_string()),
        };

        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({
                "identifier": "jane@example.com",
                "customer": "acme",
                "lastSuccessfulLogin": 1_700_000_000_000u64,
                "groups": ["agent_management"],
                "userGroups": ["g1"],
                "credential": "hunter2"
            })
        );
    }

    #[test]
    fn user_tolerates_nulls_and_missing_fields() {
        let user: User = serde_json::from_value(json!({
            "identifier": "jane@example.com",
            "groups": null,
            "userGroups": null
        }))
        .unwrap();
        assert_eq!(user, User::with_id("jane@example.com"));
    }

    #[test]
    fn user_decodes_resolved_groups() {
        let user: User = serde_json::from_value(json!({
            "identifier": "jane@example.com",
            "customer": "acme",
            "userGroups": [{
                "id": "g1",
                "name": "Everyone",
                "permissions": ["ingestion"],
                "userCount": 12,
                "properties": {"nameEditable": false, "permissionsEditable": true, "usersEditable": false}
            }]
        }))
        .unwrap();

        let group = &user.groups.0[0];
        assert_eq!(group.name, "Everyone");
        assert_eq!(group.user_count, 12);
        assert_eq!(
            group.properties,
            Some(UserGroupProperties {
                name_editable: false,
                permissions_editable: true,
                users_editable: false,
            })
        );
    }

    #[test]
    fn new_user_request_shape() {
        let request = NewUserRequest::new("new@example.com")
            .permission("ingestion")
            .group("g1");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "emailAddress": "new@example.com",
                "groups": ["ingestion"],
                "userGroups": ["g1"]
            })
        );

        let bare = NewUserRequest::new("bare@example.com");
        assert_eq!(
            serde_json::to_value(&bare).unwrap(),
            json!({"emailAddress": "bare@example.com"})
        );
    }
}
