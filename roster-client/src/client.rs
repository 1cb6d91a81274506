//! Gateway to the remote employee store

use crate::error::status_error;
use crate::{ClientError, ClientResult};
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::graph::{
    DELETE_OPERATION, DeleteData, DeleteVariables, EMPLOYEES_OPERATION, EmployeesData,
    GraphQlRequest, GraphQlResponse, MERGE_OPERATION, MergeData, delete_document,
    employees_document, merge_document,
};
use shared::{EmployeeKey, EmployeeRecord, EmployeeUpsert, KeyScheme, ListVariables};

// ============================================================================
// Gateway Trait
// ============================================================================

/// Remote query/mutation collaborator
///
/// Implementations only move requests; they keep no list state.
#[async_trait]
pub trait EmployeeGateway: Send + Sync + 'static {
    /// Fetch one page of employees
    async fn fetch_collection(&self, variables: &ListVariables)
    -> ClientResult<Vec<EmployeeRecord>>;

    /// Insert or update an employee; the backend decides which by key
    async fn upsert_record(&self, fields: &EmployeeUpsert) -> ClientResult<EmployeeRecord>;

    /// Delete an employee; `Ok(false)` when nothing matched the key
    async fn delete_record(&self, key: &EmployeeKey) -> ClientResult<bool>;
}

/// Unwrap a GraphQL response into its data
pub(crate) fn into_data<T>(response: GraphQlResponse<T>) -> ClientResult<T> {
    if !response.errors.is_empty() {
        return Err(ClientError::GraphQl(
            response.errors.into_iter().map(|e| e.message).collect(),
        ));
    }
    response
        .data
        .ok_or_else(|| ClientError::InvalidResponse("Missing data".into()))
}

/// Build the list request for a scheme
pub(crate) fn employees_request(
    scheme: KeyScheme,
    variables: &ListVariables,
) -> GraphQlRequest<&ListVariables> {
    GraphQlRequest::new(employees_document(scheme), EMPLOYEES_OPERATION, variables)
}

/// Build the merge request for a scheme
///
/// The user_name-keyed document has no `$id`, so it is stripped here.
pub(crate) fn merge_request(
    scheme: KeyScheme,
    fields: &EmployeeUpsert,
) -> ClientResult<GraphQlRequest<EmployeeUpsert>> {
    let mut variables = fields.clone();
    match scheme {
        KeyScheme::Id if variables.id.is_none() => {
            return Err(ClientError::Validation("id is required".into()));
        }
        KeyScheme::Id => {}
        KeyScheme::UserName => variables.id = None,
    }
    Ok(GraphQlRequest::new(
        merge_document(scheme),
        MERGE_OPERATION,
        variables,
    ))
}

pub(crate) fn delete_request(key: &EmployeeKey) -> GraphQlRequest<DeleteVariables> {
    GraphQlRequest::new(
        delete_document(key.scheme()),
        DELETE_OPERATION,
        DeleteVariables::for_key(key),
    )
}

// ============================================================================
// InProcessGateway - tower oneshot against an axum Router
// ============================================================================

/// In-process gateway (calls a Router directly, no network)
#[derive(Clone)]
pub struct InProcessGateway {
    router: axum::Router,
    path: String,
    scheme: KeyScheme,
    token: Option<String>,
}

impl InProcessGateway {
    /// Create an in-process gateway posting to `/graphql`
    pub fn new(router: axum::Router, scheme: KeyScheme) -> Self {
        Self {
            router,
            path: "/graphql".to_string(),
            scheme,
            token: None,
        }
    }

    /// Set the bearer token
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    async fn execute<V: Serialize + Sync, T: DeserializeOwned>(
        &self,
        request: &GraphQlRequest<V>,
    ) -> ClientResult<T> {
        use axum::body::Body;
        use tower::ServiceExt;

        let body = serde_json::to_vec(request)?;
        let mut builder = http::Request::builder()
            .method(http::Method::POST)
            .uri(&self.path)
            .header("Content-Type", "application/json");

        if let Some(token) = &self.token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        let req = builder
            .body(Body::from(body))
            .map_err(|e| ClientError::Internal(e.to_string()))?;

        let resp = self
            .router
            .clone()
            .oneshot(req)
            .await
            .map_err(|e| ClientError::Internal(e.to_string()))?;

        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .map_err(|e| ClientError::Internal(e.to_string()))?;

        if !status.is_success() {
            return Err(status_error(
                status,
                String::from_utf8_lossy(&bytes).to_string(),
            ));
        }

        let response: GraphQlResponse<T> = serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        into_data(response)
    }
}

#[async_trait]
impl EmployeeGateway for InProcessGateway {
    async fn fetch_collection(
        &self,
        variables: &ListVariables,
    ) -> ClientResult<Vec<EmployeeRecord>> {
        let data: EmployeesData = self
            .execute(&employees_request(self.scheme, variables))
            .await?;
        Ok(data.employees)
    }

    async fn upsert_record(&self, fields: &EmployeeUpsert) -> ClientResult<EmployeeRecord> {
        let request = merge_request(self.scheme, fields)?;
        let data: MergeData = self.execute(&request).await?;
        Ok(data.merge_employee)
    }

    async fn delete_record(&self, key: &EmployeeKey) -> ClientResult<bool> {
        let data: DeleteData = self.execute(&delete_request(key)).await?;
        Ok(data.delete_employee)
    }
}
