use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{User, UserFields, UserId},
    error::ApiMessage,
    protocol::{
        delete_user_path, update_user_path, UsersResponse, CREATE_USER_PATH, LIST_USERS_PATH,
    },
};
use tracing::{debug, warn};
use url::Url;

pub mod error;
pub use error::ClientError;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of a create or update request that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    /// Non-success status; `message` is the server's explanation, verbatim.
    Rejected { status: u16, message: String },
}

/// Result of a delete request that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Failed {
        status: u16,
        message: Option<String>,
    },
}

/// The remote user collection. Implementations never cache; callers re-fetch after mutating.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, ClientError>;
    async fn create_user(&self, fields: &UserFields) -> Result<MutationOutcome, ClientError>;
    async fn update_user(
        &self,
        id: UserId,
        fields: &UserFields,
    ) -> Result<MutationOutcome, ClientError>;
    async fn delete_user(&self, id: UserId) -> Result<DeleteOutcome, ClientError>;
}

pub struct DirectoryClient {
    http: Client,
    base_url: Url,
}

impl DirectoryClient {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(server_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(server_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = normalize_base_url(server_url)?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::HttpClient)?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|source| ClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                source,
            })
    }

    async fn mutation_outcome(
        context: &'static str,
        response: Response,
    ) -> Result<MutationOutcome, ClientError> {
        let status = response.status();
        if status == StatusCode::OK || status == StatusCode::CREATED {
            return Ok(MutationOutcome::Applied);
        }

        let body: ApiMessage = decode_body(context, response).await?;
        warn!(
            status = status.as_u16(),
            message = %body.message,
            "{context} rejected by server"
        );
        Ok(MutationOutcome::Rejected {
            status: status.as_u16(),
            message: body.message,
        })
    }
}

/// Parses `server_url` and makes sure relative request paths land beneath it.
pub fn normalize_base_url(server_url: &str) -> Result<Url, ClientError> {
    let trimmed = server_url.trim();
    let mut url = Url::parse(trimmed).map_err(|source| ClientError::InvalidBaseUrl {
        url: trimmed.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(ClientError::UnsupportedBaseUrl(trimmed.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

async fn decode_body<T: DeserializeOwned>(
    context: &'static str,
    response: Response,
) -> Result<T, ClientError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode { context, source })
}

#[async_trait]
impl UserStore for DirectoryClient {
    async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        let url = self.endpoint(LIST_USERS_PATH)?;
        debug!(%url, "GET users");
        let response = self.http.get(url).send().await?;
        let body: UsersResponse = decode_body("list users", response).await?;
        debug!(count = body.users.len(), "fetched users");
        Ok(body.users)
    }

    async fn create_user(&self, fields: &UserFields) -> Result<MutationOutcome, ClientError> {
        let url = self.endpoint(CREATE_USER_PATH)?;
        debug!(%url, "POST create user");
        let response = self.http.post(url).json(fields).send().await?;
        Self::mutation_outcome("create user", response).await
    }

    async fn update_user(
        &self,
        id: UserId,
        fields: &UserFields,
    ) -> Result<MutationOutcome, ClientError> {
        let url = self.endpoint(&update_user_path(id))?;
        debug!(%url, user_id = id.0, "PATCH update user");
        let response = self.http.patch(url).json(fields).send().await?;
        Self::mutation_outcome("update user", response).await
    }

    async fn delete_user(&self, id: UserId) -> Result<DeleteOutcome, ClientError> {
        let url = self.endpoint(&delete_user_path(id))?;
        debug!(%url, user_id = id.0, "DELETE user");
        let response = self.http.delete(url).send().await?;
        let status = response.status();
        if status == StatusCode::OK {
            return Ok(DeleteOutcome::Deleted);
        }

        // Best effort: the body is only used for diagnostics here.
        let message = decode_body::<ApiMessage>("delete user", response)
            .await
            .ok()
            .map(|body| body.message);
        Ok(DeleteOutcome::Failed {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
