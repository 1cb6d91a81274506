//! GraphQL-over-HTTP envelope and operation documents
//!
//! Shared between roster-client (sender) and roster-mock (receiver).

use crate::models::employee::{EmployeeKey, EmployeeRecord, KeyScheme};
use serde::{Deserialize, Serialize};

pub const EMPLOYEES_OPERATION: &str = "employeesPaginateQuery";
pub const MERGE_OPERATION: &str = "MergeEmployee";
pub const DELETE_OPERATION: &str = "DeleteEmployee";

const EMPLOYEES_BY_ID: &str = r#"query employeesPaginateQuery(
  $first: Int
  $offset: Int
  $orderBy: [EmployeeSort]
  $filter: EmployeeWhere
) {
  employees(options: { limit: $first, skip: $offset, sort: $orderBy }, where: $filter) {
    id
    name
    user_name
    email
    phone
  }
}"#;

const EMPLOYEES_BY_USER_NAME: &str = r#"query employeesPaginateQuery(
  $first: Int
  $offset: Int
  $orderBy: [EmployeeSort]
  $filter: EmployeeWhere
) {
  employees(options: { limit: $first, skip: $offset, sort: $orderBy }, where: $filter) {
    name
    user_name
    email
    phone
  }
}"#;

const MERGE_BY_ID: &str = r#"mutation MergeEmployee(
  $id: ID!
  $name: String!
  $user_name: String!
  $email: String
  $phone: String
) {
  mergeEmployee(id: $id, name: $name, user_name: $user_name, email: $email, phone: $phone) {
    id
    name
    user_name
    email
    phone
  }
}"#;

const MERGE_BY_USER_NAME: &str = r#"mutation MergeEmployee(
  $name: String!
  $user_name: String!
  $email: String
  $phone: String
) {
  mergeEmployee(name: $name, user_name: $user_name, email: $email, phone: $phone) {
    name
    user_name
    email
    phone
  }
}"#;

const DELETE_BY_ID: &str = r#"mutation DeleteEmployee($id: ID!) {
  deleteEmployee(id: $id)
}"#;

const DELETE_BY_USER_NAME: &str = r#"mutation DeleteEmployee($user_name: String!) {
  deleteEmployee(user_name: $user_name)
}"#;

/// List query document for a key scheme
///
/// `id` is only selected when it is the identifying field.
pub fn employees_document(scheme: KeyScheme) -> &'static str {
    match scheme {
        KeyScheme::Id => EMPLOYEES_BY_ID,
        KeyScheme::UserName => EMPLOYEES_BY_USER_NAME,
    }
}

/// Merge mutation document for a key scheme
pub fn merge_document(scheme: KeyScheme) -> &'static str {
    match scheme {
        KeyScheme::Id => MERGE_BY_ID,
        KeyScheme::UserName => MERGE_BY_USER_NAME,
    }
}

/// Delete mutation document for a key scheme
pub fn delete_document(scheme: KeyScheme) -> &'static str {
    match scheme {
        KeyScheme::Id => DELETE_BY_ID,
        KeyScheme::UserName => DELETE_BY_USER_NAME,
    }
}

/// Request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlRequest<V> {
    pub query: String,
    #[serde(rename = "operationName", default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    #[serde(default)]
    pub variables: V,
}

impl<V> GraphQlRequest<V> {
    pub fn new(query: &str, operation_name: &str, variables: V) -> Self {
        Self {
            query: query.to_string(),
            operation_name: Some(operation_name.to_string()),
            variables,
        }
    }
}

/// One entry of the `errors` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
}

impl GraphQlError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: Vec::new(),
        }
    }
}

/// Response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQlError>,
}

impl<T> GraphQlResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    pub fn errors(errors: Vec<GraphQlError>) -> Self {
        Self { data: None, errors }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeesData {
    pub employees: Vec<EmployeeRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeData {
    #[serde(rename = "mergeEmployee")]
    pub merge_employee: EmployeeRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteData {
    #[serde(rename = "deleteEmployee")]
    pub delete_employee: bool,
}

/// Variables of the delete mutation; exactly one field is set
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeleteVariables {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

impl DeleteVariables {
    pub fn for_key(key: &EmployeeKey) -> Self {
        match key {
            EmployeeKey::Id(id) => Self {
                id: Some(id.clone()),
                user_name: None,
            },
            EmployeeKey::UserName(u) => Self {
                id: None,
                user_name: Some(u.clone()),
            },
        }
    }

    pub fn key(&self) -> Option<EmployeeKey> {
        match (&self.id, &self.user_name) {
            (Some(id), _) => Some(EmployeeKey::Id(id.clone())),
            (None, Some(u)) => Some(EmployeeKey::UserName(u.clone())),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn selects_id(document: &str) -> bool {
        document.lines().any(|l| l.trim() == "id")
    }

    #[test]
    fn test_documents_select_only_scheme_key() {
        assert!(selects_id(employees_document(KeyScheme::Id)));
        assert!(!selects_id(employees_document(KeyScheme::UserName)));
        assert!(!selects_id(merge_document(KeyScheme::UserName)));
        assert!(employees_document(KeyScheme::UserName).contains("user_name"));
    }

    #[test]
    fn test_response_with_errors_only() {
        let resp: GraphQlResponse<DeleteData> = serde_json::from_value(json!({
            "errors": [{ "message": "boom" }]
        }))
        .unwrap();
        assert!(resp.data.is_none());
        assert_eq!(resp.errors, vec![GraphQlError::new("boom")]);
    }

    #[test]
    fn test_delete_variables_by_scheme() {
        let by_id = serde_json::to_value(DeleteVariables::for_key(&EmployeeKey::Id("7".into())))
            .unwrap();
        assert_eq!(by_id, json!({ "id": "7" }));

        let by_user = DeleteVariables::for_key(&EmployeeKey::UserName("ann1".into()));
        assert_eq!(serde_json::to_value(&by_user).unwrap(), json!({ "user_name": "ann1" }));
        assert_eq!(by_user.key(), Some(EmployeeKey::UserName("ann1".into())));
    }

    #[test]
    fn test_documents_match_scheme() {
        assert!(merge_document(KeyScheme::Id).contains("$id: ID!"));
        assert!(!merge_document(KeyScheme::UserName).contains("$id"));
        assert!(delete_document(KeyScheme::UserName).contains("user_name: $user_name"));
    }
}
