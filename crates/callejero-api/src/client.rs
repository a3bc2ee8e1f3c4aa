// Hand-crafted async HTTP client for the callejero REST API.
//
// Base path: /api/
// Four read-only GET endpoints; no auth, no retries, no caching.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::{Municipality, Province, Region, Street};

// ── Error response shape from the API ────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    // FastAPI sends a string here for domain errors, but an array of
    // objects for 422 validation failures. Only the string form is usable
    // as a message.
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the callejero lookup API.
///
/// Issues parameterized GETs against `/api/` and decodes JSON array
/// bodies into the record types in [`crate::types`].
pub struct CallejeroClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CallejeroClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL and transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (used by tests).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Build the base URL with the `/api/` prefix.
    ///
    /// `http://host:8000` and `http://host:8000/api` both normalize to
    /// `http://host:8000/api/`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;

        // Strip trailing slash for uniform handling
        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/api") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/"));
        }

        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments onto the base URL.
    ///
    /// Segments are percent-encoded individually, so user-supplied text
    /// (the street-name fragment) travels with its literal characters
    /// intact -- no normalization, no case-folding, and a `/` inside a
    /// segment cannot change the path shape.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .expect("base URL accepts path segments");
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }

    // ── Request / response handling ──────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                // Char-based cut: bodies are Spanish text, byte slicing could
                // split a multibyte sequence.
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        let detail = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|e| e.detail)
            .and_then(|v| v.as_str().map(str::to_owned));

        Error::Http {
            status: status.as_u16(),
            detail,
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// List all autonomous communities.
    ///
    /// `GET /api/autonomias/`
    pub async fn list_regions(&self) -> Result<Vec<Region>, Error> {
        // Trailing slash is part of the endpoint contract.
        self.get(self.endpoint(&["autonomias", ""])).await
    }

    /// List the provinces of one autonomous community.
    ///
    /// `GET /api/provincias/{ccom}`
    pub async fn list_provinces(&self, ccom: &str) -> Result<Vec<Province>, Error> {
        self.get(self.endpoint(&["provincias", ccom])).await
    }

    /// List the municipalities of one province.
    ///
    /// `GET /api/poblaciones/{cpro}`
    pub async fn list_municipalities(&self, cpro: &str) -> Result<Vec<Municipality>, Error> {
        self.get(self.endpoint(&["poblaciones", cpro])).await
    }

    /// Search streets by postal code and name fragment.
    ///
    /// `GET /api/vias/{cpos}/{nviac}`
    pub async fn search_streets(&self, cpos: &str, nviac: &str) -> Result<Vec<Street>, Error> {
        self.get(self.endpoint(&["vias", cpos, nviac])).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalize_appends_api_prefix() {
        let url = CallejeroClient::normalize_base_url("http://127.0.0.1:8000").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/");
    }

    #[test]
    fn normalize_keeps_existing_api_prefix() {
        let url = CallejeroClient::normalize_base_url("http://127.0.0.1:8000/api/").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/");
    }

    #[test]
    fn normalize_rejects_garbage() {
        assert!(CallejeroClient::normalize_base_url("not a url").is_err());
    }

    #[test]
    fn endpoint_percent_encodes_segments() {
        let client =
            CallejeroClient::from_reqwest("http://localhost:8000", reqwest::Client::new()).unwrap();
        let url = client.endpoint(&["vias", "28001", "GRAN VÍA"]);
        assert_eq!(url.path(), "/api/vias/28001/GRAN%20V%C3%8DA");
    }
}
