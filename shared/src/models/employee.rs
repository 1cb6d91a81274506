//! Employee Model

use crate::error::ParseError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which attribute identifies an employee on the remote store.
///
/// A deployment uses exactly one of the two, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyScheme {
    /// Keyed by the externally issued `id` (GraphQL `ID!`)
    #[default]
    Id,
    /// Keyed by `user_name`
    UserName,
}

impl KeyScheme {
    /// Name of the identifying field on the wire
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::UserName => "user_name",
        }
    }
}

impl FromStr for KeyScheme {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "user_name" | "username" => Ok(Self::UserName),
            other => Err(ParseError::KeyScheme(other.to_string())),
        }
    }
}

/// Stable, externally issued key of an employee record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum EmployeeKey {
    Id(String),
    UserName(String),
}

impl EmployeeKey {
    /// Raw key value
    pub fn value(&self) -> &str {
        match self {
            Self::Id(v) | Self::UserName(v) => v,
        }
    }

    /// Scheme this key belongs to
    pub fn scheme(&self) -> KeyScheme {
        match self {
            Self::Id(_) => KeyScheme::Id,
            Self::UserName(_) => KeyScheme::UserName,
        }
    }
}

impl fmt::Display for EmployeeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.scheme().field_name(), self.value())
    }
}

/// Employee row as returned by the list query
///
/// A cached projection of remote state; never mutated locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Present only in id-keyed deployments
    #[serde(
        default,
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl EmployeeRecord {
    /// Key of this record under the given scheme
    ///
    /// Returns `None` when the identifying field is missing or blank.
    pub fn key(&self, scheme: KeyScheme) -> Option<EmployeeKey> {
        match scheme {
            KeyScheme::Id => self
                .id
                .as_ref()
                .filter(|id| !id.is_empty())
                .map(|id| EmployeeKey::Id(id.clone())),
            KeyScheme::UserName => Some(&self.user_name)
                .filter(|u| !u.is_empty())
                .map(|u| EmployeeKey::UserName(u.clone())),
        }
    }
}

/// Upsert payload (variables of the merge mutation)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeUpsert {
    #[serde(
        default,
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub name: String,
    pub user_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl EmployeeUpsert {
    /// Key the backend will merge on
    pub fn key(&self, scheme: KeyScheme) -> Option<EmployeeKey> {
        match scheme {
            KeyScheme::Id => self.id.clone().map(EmployeeKey::Id),
            KeyScheme::UserName => {
                (!self.user_name.is_empty()).then(|| EmployeeKey::UserName(self.user_name.clone()))
            }
        }
    }

    /// Record as the backend stores it
    pub fn into_record(self) -> EmployeeRecord {
        EmployeeRecord {
            id: self.id,
            name: self.name,
            user_name: self.user_name,
            email: self.email,
            phone: self.phone,
        }
    }
}

/// GraphQL `ID` values arrive either as strings or as bare integers.
fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accepts_numeric_id() {
        let record: EmployeeRecord = serde_json::from_str(
            r#"{"id":5,"name":"Ann","user_name":"ann1","email":"a@x.com","phone":"555"}"#,
        )
        .unwrap();
        assert_eq!(record.id.as_deref(), Some("5"));
        assert_eq!(record.key(KeyScheme::Id), Some(EmployeeKey::Id("5".into())));
    }

    #[test]
    fn test_record_without_id_in_user_name_scheme() {
        let record: EmployeeRecord =
            serde_json::from_str(r#"{"name":"Ann","user_name":"ann1","email":null}"#).unwrap();
        assert!(record.id.is_none());
        assert!(record.key(KeyScheme::Id).is_none());
        assert_eq!(
            record.key(KeyScheme::UserName),
            Some(EmployeeKey::UserName("ann1".into()))
        );
    }

    #[test]
    fn test_key_scheme_parse() {
        assert_eq!("id".parse::<KeyScheme>().unwrap(), KeyScheme::Id);
        assert_eq!("USER_NAME".parse::<KeyScheme>().unwrap(), KeyScheme::UserName);
        assert!("email".parse::<KeyScheme>().is_err());
    }

    #[test]
    fn test_key_display() {
        assert_eq!(EmployeeKey::UserName("ann1".into()).to_string(), "user_name=ann1");
        assert_eq!(EmployeeKey::Id("5".into()).to_string(), "id=5");
    }

    #[test]
    fn test_upsert_without_id_omits_field() {
        let upsert = EmployeeUpsert {
            id: None,
            name: "Bob".into(),
            user_name: "bob".into(),
            email: None,
            phone: None,
        };
        let json = serde_json::to_value(&upsert).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["email"], serde_json::Value::Null);
    }
}
