//! Bearer-authenticated REST client for the sandbox instance
//!
//! All calls go through the versioned data path
//! (`{instance}/services/data/{version}/...`) and carry the session token
//! obtained from the identity CLI. The token is fetched once per run and
//! passed into each call; the client itself holds no credentials.

use reqwest::StatusCode;
use tracing::debug;

use super::errors::PlatformError;
use super::types::QueryResponse;

#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    instance_url: String,
    api_version: String,
}

impl RestClient {
    pub fn new(instance_url: String, api_version: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            instance_url: instance_url.trim_end_matches('/').to_string(),
            api_version,
        }
    }

    pub(crate) fn data_url(&self, path: &str) -> String {
        format!(
            "{}/services/data/{}/{}",
            self.instance_url, self.api_version, path
        )
    }

    /// Run a SOQL-style query and parse the record collection.
    ///
    /// `object` is only used for error context. The query string goes out as
    /// a percent-encoded `q` parameter, so interpolated values need SOQL
    /// string-literal escaping but no URL escaping.
    pub(crate) async fn run_query(
        &self,
        object: &str,
        soql: String,
        token: &str,
    ) -> Result<QueryResponse, PlatformError> {
        let url = self.data_url("query/");
        debug!(object = object, soql = %soql, "issuing directory query");

        let response = self
            .http
            .get(&url)
            .query(&[("q", soql.as_str())])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| PlatformError::Query {
                object: object.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::Query {
                object: object.to_string(),
                message: http_failure(status, response.text().await.ok()),
            });
        }

        response
            .json::<QueryResponse>()
            .await
            .map_err(|e| PlatformError::Query {
                object: object.to_string(),
                message: format!("malformed response body: {}", e),
            })
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

pub(crate) fn http_failure(status: StatusCode, body: Option<String>) -> String {
    match body {
        Some(body) if !body.is_empty() => format!("HTTP {}: {}", status, body),
        _ => format!("HTTP {}", status),
    }
}
