//! HTTP transport for the GraphQL endpoint

use crate::client::{EmployeeGateway, delete_request, employees_request, into_data, merge_request};
use crate::error::status_error;
use crate::{ClientConfig, ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::graph::{DeleteData, EmployeesData, GraphQlRequest, GraphQlResponse, MergeData};
use shared::{EmployeeKey, EmployeeRecord, EmployeeUpsert, KeyScheme, ListVariables};

/// GraphQL-over-HTTP gateway
#[derive(Debug, Clone)]
pub struct GraphQlGateway {
    client: Client,
    endpoint: String,
    token: Option<String>,
    scheme: KeyScheme,
}

impl GraphQlGateway {
    /// Create a new gateway from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
            scheme: config.key_scheme,
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Endpoint this gateway posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build authorization header value
    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    /// POST a GraphQL request and unwrap its data
    async fn execute<V: Serialize + Sync, T: DeserializeOwned>(
        &self,
        request: &GraphQlRequest<V>,
    ) -> ClientResult<T> {
        let mut req = self.client.post(&self.endpoint).json(request);

        if let Some(auth) = self.auth_header() {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }

        let response = req.send().await?;
        into_data(Self::handle_response(response).await?)
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> ClientResult<GraphQlResponse<T>> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, text));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl EmployeeGateway for GraphQlGateway {
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
