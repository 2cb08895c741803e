use crate::config::ApiConfig;
use anyhow::anyhow;
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub(crate) const ENDPOINT_PLANS: &str = "plans";
pub(crate) const ENDPOINT_ROUTES: &str = "routes";
pub(crate) const ENDPOINT_TRACES: &str = "traces";
pub(crate) const ENDPOINT_SPEEDS: &str = "reports/speed-averages";

/// Thin endpoint client for the telemetry server. Owns the connection
/// pool; one instance per base URL is enough for the whole process.
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new api client. The underlying http client is built
    /// eagerly to afford graceful failure on startup.
    pub fn new(config: &ApiConfig) -> Result<Self, anyhow::Error> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| anyhow!("invalid base url '{}': {e}", config.base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("base url '{base_url}' cannot carry endpoint paths"));
        }

        let client = reqwest::ClientBuilder::new()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .tcp_keepalive(Some(Duration::from_secs(20)))
            .tcp_nodelay(true)
            .gzip(true)
            .build()
            .map_err(anyhow::Error::from)?;

        Ok(ApiClient { client, base_url })
    }

    /// Resolve an endpoint path (plus optional extra segments such as
    /// a plan id) against the base URL, appending query parameters.
    /// A path prefix on the base URL is kept, not replaced.
    fn endpoint_url(
        &self,
        segments: &[&str],
        params: &[(String, String)],
    ) -> Result<Url, anyhow::Error> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| anyhow!("base url cannot carry endpoint paths"))?;
            path.pop_if_empty();
            for segment in segments {
                for part in segment.split('/') {
                    path.push(part);
                }
            }
        }
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }

    /// GET an endpoint. Any non-2xx status is an error; the body is
    /// not read in that case.
    pub async fn get(
        &self,
        segments: &[&str],
        params: &[(String, String)],
    ) -> Result<Response, anyhow::Error> {
        let url = self.endpoint_url(segments, params)?;
        debug!(%url, "api get");

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| anyhow!("request to {url} failed: {e}"))?;

        Self::check_status(url, response)
    }

    /// POST a JSON payload to an endpoint. Any non-2xx status is an
    /// error.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        payload: &T,
    ) -> Result<Response, anyhow::Error> {
        let url = self.endpoint_url(segments, &[])?;
        debug!(%url, "api post");

        let response = self
            .client
            .post(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| anyhow!("request to {url} failed: {e}"))?;

        Self::check_status(url, response)
    }

    fn check_status(url: Url, response: Response) -> Result<Response, anyhow::Error> {
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!(
                "{url} returned {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("no status message")
            ));
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfigBuilder;

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(
            &ApiConfigBuilder::default()
                .base_url(base_url)
                .build()
                .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_url_plain() {
        let url = client("https://api.example.net")
            .endpoint_url(&[ENDPOINT_TRACES], &[])
            .unwrap();
        assert_eq!(url.as_str(), "https://api.example.net/traces");
    }

    #[test]
    fn test_endpoint_url_keeps_base_prefix() {
        let url = client("https://api.example.net/v1")
            .endpoint_url(&[ENDPOINT_SPEEDS], &[])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.net/v1/reports/speed-averages"
        );
    }

    #[test]
    fn test_endpoint_url_with_id_segment() {
        let url = client("https://api.example.net")
            .endpoint_url(&[ENDPOINT_PLANS, "abc-123"], &[])
            .unwrap();
        assert_eq!(url.as_str(), "https://api.example.net/plans/abc-123");
    }

    #[test]
    fn test_endpoint_url_encodes_parameters() {
        let params = vec![
            ("planID".to_string(), "p 1".to_string()),
            ("type".to_string(), "weekly".to_string()),
        ];
        let url = client("https://api.example.net")
            .endpoint_url(&[ENDPOINT_SPEEDS], &params)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.net/reports/speed-averages?planID=p+1&type=weekly"
        );
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        let config = ApiConfigBuilder::default()
            .base_url("not a url")
            .build()
            .unwrap();
        assert!(ApiClient::new(&config).is_err());
    }
}
