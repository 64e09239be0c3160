//! REST implementation of the role service.
//!
//! Talks to the dashboard API's role and permission endpoints. Responses
//! may be wrapped in a `{"data": ...}` envelope or returned bare.

use std::time::Duration;

use async_trait::async_trait;
use domain::models::{
    AssignPermissionsRequest, CreateRoleRequest, Permission, Role, RoleWithPermissions,
    UpdateRoleRequest,
};
use domain::services::{RoleService, RoleServiceError};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error};

use crate::config::ApiConfig;
use crate::error::ClientError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Body<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Body<T> {
    fn into_inner(self) -> T {
        match self {
            Body::Wrapped { data } => data,
            Body::Bare(data) => data,
        }
    }
}

/// Role service backed by the dashboard REST API.
#[derive(Debug, Clone)]
pub struct HttpRoleService {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpRoleService {
    /// Create a new client for the configured API.
    ///
    /// # Errors
    /// Returns an error if the base URL is not http(s) or the HTTP client
    /// cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(config.base_url.clone()));
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token: config.bearer_token().map(str::to_string),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, url = %url, "Sending API request");

        let builder = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<String, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(status = %status, "API request failed");
            return Err(ClientError::from_response_body(status, &body));
        }
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ClientError> {
        let body = self.send(builder).await?;
        serde_json::from_str::<Body<T>>(&body)
            .map(Body::into_inner)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl RoleService for HttpRoleService {
    async fn list_permissions(&self) -> Result<Vec<Permission>, RoleServiceError> {
        let permissions: Vec<Permission> = self
            .send_json(self.request(Method::GET, "/permissions"))
            .await?;
        debug!(count = permissions.len(), "Fetched permissions");
        Ok(permissions)
    }

    async fn get_role(&self, role_id: i64) -> Result<RoleWithPermissions, RoleServiceError> {
        let path = format!("/roles/{}", role_id);
        Ok(self.send_json(self.request(Method::GET, &path)).await?)
    }

    async fn create_role(&self, request: &CreateRoleRequest) -> Result<Role, RoleServiceError> {
        let builder = self.request(Method::POST, "/roles").json(request);
        Ok(self.send_json(builder).await?)
    }

    async fn update_role(
        &self,
        role_id: i64,
        request: &UpdateRoleRequest,
    ) -> Result<Role, RoleServiceError> {
        let path = format!("/roles/{}", role_id);
        let builder = self.request(Method::PUT, &path).json(request);
        Ok(self.send_json(builder).await?)
    }

    async fn assign_permissions(
        &self,
        request: &AssignPermissionsRequest,
    ) -> Result<(), RoleServiceError> {
        let path = format!("/roles/{}/permissions", request.role_id);
        let builder = self.request(Method::POST, &path).json(request);
        self.send(builder).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_config(base_url: &str, token: &str) -> ApiConfig {
        ApiConfig {
            base_url: base_url.to_string(),
            token: token.to_string(),
            timeout_ms: 1000,
        }
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let service = HttpRoleService::new(&api_config("http://localhost:3000/api/", "")).unwrap();
        assert_eq!(service.base_url, "http://localhost:3000/api");
        assert!(service.token.is_none());
    }

    #[test]
    fn test_new_rejects_bad_url() {
        let result = HttpRoleService::new(&api_config("localhost:3000", ""));
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_body_envelope() {
        let wrapped: Body<Vec<i64>> = serde_json::from_str(r#"{"data": [1, 2]}"#).unwrap();
        assert_eq!(wrapped.into_inner(), vec![1, 2]);

        let bare: Body<Vec<i64>> = serde_json::from_str("[3]").unwrap();
        assert_eq!(bare.into_inner(), vec![3]);
    }
}
