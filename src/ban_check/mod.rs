//! Ban-status lookups against the upstream anti-hack service
//!
//! One lookup is one outbound `GET`: the player ID and language go into the
//! query string and the upstream JSON answer is reduced to a [`BanStatus`].
//! Nothing is cached and failed lookups are never retried.

use crate::config::BanCheckConfig;
use crate::error::BanCheckError;
use crate::types::BanStatus;
use reqwest::header::{ACCEPT, REFERER};
use serde_json::Value;
use url::Url;

/// Client for the upstream ban-status service
#[derive(Clone, Debug)]
pub struct BanChecker {
    /// HTTP client with the configured timeout and user agent
    http_client: reqwest::Client,

    /// Parsed upstream endpoint, without query parameters
    endpoint: Url,

    language: String,
    referer: Option<String>,
}

impl BanChecker {
    /// Create a checker from configuration
    ///
    /// # Errors
    ///
    /// Returns [`BanCheckError::InvalidEndpoint`] if the endpoint is not a
    /// valid URL, or [`BanCheckError::Http`] if the HTTP client cannot be
    /// built.
    pub fn new(config: &BanCheckConfig) -> Result<Self, BanCheckError> {
        let endpoint =
            Url::parse(&config.endpoint).map_err(|source| BanCheckError::InvalidEndpoint {
                endpoint: config.endpoint.clone(),
                source,
            })?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            http_client,
            endpoint,
            language: config.language.clone(),
            referer: config.referer.clone(),
        })
    }

    /// The upstream endpoint this checker queries
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Look up the ban status of `player_id`
    ///
    /// Surrounding whitespace is ignored. Exactly one upstream request is made
    /// per call.
    ///
    /// # Errors
    ///
    /// - [`BanCheckError::MissingPlayerId`] if `player_id` is empty; no
    ///   request is sent
    /// - [`BanCheckError::Http`] on transport failure or timeout
    /// - [`BanCheckError::UpstreamStatus`] on a non-2xx answer
    /// - [`BanCheckError::InvalidResponse`] if the body is not usable JSON
    /// - [`BanCheckError::MissingStatus`] if `data.is_banned` is absent
    pub async fn check(&self, player_id: &str) -> Result<BanStatus, BanCheckError> {
        let player_id = player_id.trim();
        if player_id.is_empty() {
            return Err(BanCheckError::MissingPlayerId);
        }

        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("lang", &self.language)
            .append_pair("uid", player_id);

        tracing::debug!(player_id, url = %url, "checking ban status");

        let mut request = self
            .http_client
            .get(url)
            .header(ACCEPT, "application/json, text/plain, */*");
        if let Some(referer) = &self.referer {
            request = request.header(REFERER, referer.as_str());
        }

        let response = request.send().await?;

        // Check HTTP status before trying to parse the response body
        let status = response.status();
        if !status.is_success() {
            return Err(BanCheckError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let is_banned = parse_ban_flag(&body)?;

        tracing::info!(player_id, is_banned, "ban status checked");

        Ok(BanStatus {
            player_id: player_id.to_string(),
            is_banned,
            checked_at: chrono::Utc::now(),
        })
    }
}

/// Read `data.is_banned` from an upstream response body
///
/// Booleans are taken as-is; numbers count as banned when non-zero.
fn parse_ban_flag(body: &str) -> Result<bool, BanCheckError> {
    let document: Value = serde_json::from_str(body)
        .map_err(|e| BanCheckError::InvalidResponse(format!("body is not JSON: {}", e)))?;

    match document.get("data").and_then(|data| data.get("is_banned")) {
        None | Some(Value::Null) => Err(BanCheckError::MissingStatus),
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(Value::Number(n)) => Ok(n.as_f64().is_some_and(|v| v != 0.0)),
        Some(other) => Err(BanCheckError::InvalidResponse(format!(
            "unexpected `is_banned` value: {}",
            other
        ))),
    }
}
