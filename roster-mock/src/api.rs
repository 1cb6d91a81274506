use crate::state::AppState;
use crate::validation::validate_upsert;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::graph::{
    DELETE_OPERATION, DeleteData, DeleteVariables, EMPLOYEES_OPERATION, EmployeesData,
    GraphQlError, GraphQlRequest, GraphQlResponse, MERGE_OPERATION, MergeData,
};
use shared::{EmployeeUpsert, KeyScheme, ListVariables};
use std::sync::Arc;

/// Routes: `POST /graphql`, `GET /health`
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/graphql", post(graphql))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn graphql(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<GraphQlRequest<Value>>,
) -> Response {
    if let Some(expected) = &state.token {
        let auth_header = headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("");

        if auth_header.strip_prefix("Bearer ") != Some(expected.as_str()) {
            return (
                StatusCode::UNAUTHORIZED,
                "Missing or invalid Authorization header",
            )
                .into_response();
        }
    }

    let operation = req
        .operation_name
        .clone()
        .or_else(|| sniff_operation(&req.query).map(str::to_string));

    match operation.as_deref() {
        Some(EMPLOYEES_OPERATION) => employees(&state, req.variables).await,
        Some(MERGE_OPERATION) => merge(&state, req.variables).await,
        Some(DELETE_OPERATION) => delete(&state, req.variables).await,
        other => {
            tracing::warn!(operation = ?other, "Unsupported operation");
            errors(vec![format!(
                "Unsupported operation: {}",
                other.unwrap_or("<anonymous>")
            )])
        }
    }
}

/// Operation of an unnamed request, guessed from the root field
fn sniff_operation(query: &str) -> Option<&'static str> {
    if query.contains("mergeEmployee") {
        Some(MERGE_OPERATION)
    } else if query.contains("deleteEmployee") {
        Some(DELETE_OPERATION)
    } else if query.contains("employees") {
        Some(EMPLOYEES_OPERATION)
    } else {
        None
    }
}

async fn employees(state: &AppState, variables: Value) -> Response {
    let variables: ListVariables = match parse_variables(variables) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let employees = state.store.read().await.list(&variables);
    tracing::info!(
        count = employees.len(),
        offset = variables.offset,
        filter = ?variables.filter.name_contains,
        "employees"
    );
    data(EmployeesData { employees })
}

async fn merge(state: &AppState, variables: Value) -> Response {
    let fields: EmployeeUpsert = match parse_variables(variables) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let mut store = state.store.write().await;
    if store.scheme() == KeyScheme::Id && fields.id.as_deref().is_none_or(str::is_empty) {
        return errors(vec!["id is required".to_string()]);
    }
    if let Err(violations) = validate_upsert(&fields) {
        tracing::warn!(?violations, "mergeEmployee rejected");
        return errors(violations);
    }

    let record = store.merge(fields);
    tracing::info!(name = %record.name, user_name = %record.user_name, "mergeEmployee");
    data(MergeData {
        merge_employee: record,
    })
}

async fn delete(state: &AppState, variables: Value) -> Response {
    let variables: DeleteVariables = match parse_variables(variables) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let mut store = state.store.write().await;
    let key = match variables.key() {
        Some(key) if key.scheme() == store.scheme() => key,
        _ => {
            return errors(vec![format!(
                "{} is required",
                store.scheme().field_name()
            )]);
        }
    };

    let removed = store.delete(&key);
    tracing::info!(key = %key, removed, "deleteEmployee");
    data(DeleteData {
        delete_employee: removed,
    })
}

fn parse_variables<T: DeserializeOwned>(variables: Value) -> Result<T, Response> {
    serde_json::from_value(variables)
        .map_err(|e| errors(vec![format!("Invalid variables: {}", e)]))
}

fn data<T: Serialize>(data: T) -> Response {
    Json(GraphQlResponse::data(data)).into_response()
}

fn errors(messages: Vec<String>) -> Response {
    Json(GraphQlResponse::<Value>::errors(
        messages.into_iter().map(GraphQlError::new).collect(),
    ))
    .into_response()
}
