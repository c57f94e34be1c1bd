//! etcd v2 keys API client with multi-endpoint failover.

use crate::error::{StoreError, StoreResult};
use crate::gateway::StoreGateway;
use crate::tree::{KeysResponse, Node};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

/// Error payload of the etcd v2 keys API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error_code: u64,
    message: String,
    cause: Option<String>,
}

/// Store gateway backed by the etcd v2 keys API.
///
/// Reads `GET <endpoint>/v2/keys<path>?recursive=true`. Endpoints are tried
/// in order: transport failures fall through to the next endpoint, while
/// protocol errors (the store answered, e.g. key not found) are returned
/// immediately.
pub struct EtcdStore {
    endpoints: Vec<Url>,
    http: reqwest::Client,
}

impl EtcdStore {
    /// Creates a store gateway for the given endpoint URLs.
    ///
    /// Returns an error when the list is empty or any URL fails to parse.
    pub fn new<I, S>(endpoints: I) -> StoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let endpoints = endpoints
            .into_iter()
            .map(|e| Url::parse(e.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        if endpoints.is_empty() {
            return Err(StoreError::NoEndpoints);
        }

        Ok(Self {
            endpoints,
            http: reqwest::Client::new(),
        })
    }

    /// Returns the configured endpoints.
    pub fn endpoints(&self) -> &[Url] {
        &self.endpoints
    }

    async fn fetch_from(&self, endpoint: &Url, path: &str) -> StoreResult<Node> {
        let mut url = endpoint.clone();
        url.set_path(&format!("/v2/keys{path}"));
        url.set_query(Some("recursive=true"));

        debug!(%url, "fetching toggle tree");
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if status.is_success() {
            let parsed: KeysResponse = serde_json::from_str(&body)?;
            return Ok(parsed.node);
        }

        // etcd reports protocol errors as a JSON body with its own code; fall
        // back to the HTTP status for anything else.
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(err) => Err(StoreError::Store {
                code: err.error_code,
                message: err.message,
                cause: err.cause,
            }),
            Err(_) => Err(StoreError::Store {
                code: u64::from(status.as_u16()),
                message: format!("unexpected HTTP status {status}"),
                cause: None,
            }),
        }
    }
}

#[async_trait]
impl StoreGateway for EtcdStore {
    async fn fetch_tree(&self, path: &str) -> StoreResult<Node> {
        let mut last_err = None;

        for endpoint in &self.endpoints {
            match self.fetch_from(endpoint, path).await {
                Ok(node) => return Ok(node),
                Err(err @ StoreError::Transport(_)) => {
                    warn!(%endpoint, error = %err, "store endpoint unreachable, trying next");
                    last_err = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_err.unwrap_or(StoreError::NoEndpoints))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_endpoint_list() {
        let endpoints: Vec<&str> = Vec::new();
        assert!(matches!(
            EtcdStore::new(endpoints),
            Err(StoreError::NoEndpoints)
        ));
    }

    #[test]
    fn test_rejects_malformed_endpoint() {
        assert!(matches!(
            EtcdStore::new(["not a url"]),
            Err(StoreError::Endpoint(_))
        ));
    }

    #[test]
    fn test_keeps_endpoint_order() {
        let store = EtcdStore::new(["http://one:2379", "http://two:2379"]).unwrap();
        let hosts: Vec<_> = store
            .endpoints()
            .iter()
            .map(|u| u.host_str().unwrap().to_string())
            .collect();
        assert_eq!(hosts, vec!["one", "two"]);
    }
}
