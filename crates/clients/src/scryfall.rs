use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use cardfolio_common::{define_module_client, env_or, env_parse_or, ModuleClient};
use cardfolio_runtime::{CardCatalog, CatalogError, RawPrinting, RawSetInfo};

use crate::consts::{CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SCRYFALL_API_URL, USER_AGENT};

/// HTTP handle plus the base url every request is resolved against.
pub struct ScryfallApi {
    http: Client,
    base_url: Url,
}

impl ScryfallApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: Url::parse(base_url.trim_end_matches('/'))?,
        })
    }

    /// The base url extended by `segments`, each percent-encoded as a single path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::Transport(format!("{} cannot be a base url", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn from_env() -> Result<Self> {
        let base_url = env_or("SCRYFALL_API_URL", DEFAULT_SCRYFALL_API_URL);
        let timeout = env_parse_or("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        Self::new(&base_url, Duration::from_secs(timeout))
    }
}

define_module_client! {
    (struct ScryfallClient, "scryfall")
    client_type: ScryfallApi,
    env: [],
    setup: async {
        ScryfallApi::from_env()
    }
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    data: Vec<RawPrinting>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_page: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    details: String,
}

impl ScryfallClient {
    async fn fetch<T: for<'de> Deserialize<'de>>(&self, request: reqwest::RequestBuilder) -> Result<T, CatalogError> {
        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let response = Self::check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))
    }

    async fn check_status(response: Response) -> Result<Response, CatalogError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        // error responses carry a human readable `details` field
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|error| error.details)
            .unwrap_or(body);

        warn!("Scryfall request failed with status {}: {}", status, message);
        Err(CatalogError::Status { status: status.as_u16(), message })
    }
}

#[async_trait::async_trait]
impl CardCatalog for ScryfallClient {
    async fn search_printings_by_card_id(&self, card_id: &str) -> Result<Vec<RawPrinting>, CatalogError> {
        let api = self.get_client();
        let query = format!("oracleid:{}", card_id);

        let first = api.http
            .get(api.endpoint(&["cards", "search"])?)
            .query(&[
                ("q", query.as_str()),
                ("unique", "prints"),
                ("order", "released"),
                ("dir", "asc"),
                ("include_multilingual", "true"),
            ]);

        let mut page: SearchPage = self.fetch(first).await?;
        let mut printings = std::mem::take(&mut page.data);

        while page.has_more {
            let Some(next) = page.next_page.take() else {
                return Err(CatalogError::Decode("has_more without next_page".to_string()));
            };
            debug!("Following search page {}", next);

            page = self.fetch(api.http.get(next)).await?;
            printings.append(&mut page.data);
        }

        Ok(printings)
    }

    async fn get_set_metadata(&self, set_id: &str) -> Result<RawSetInfo, CatalogError> {
        let api = self.get_client();
        self.fetch(api.http.get(api.endpoint(&["sets", set_id])?)).await
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    fn client(server: &mockito::ServerGuard) -> ScryfallClient {
        ScryfallClient::from_client(ScryfallApi::new(&server.url(), Duration::from_secs(5)).unwrap())
    }

    fn printing(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": "Opt",
            "lang": "en",
            "set_id": "s1",
            "set_name": "Ixalan",
            "released_at": "2017-09-29",
            "foil": true,
            "nonfoil": true
        })
    }

    #[tokio::test]
    async fn search_sends_the_expected_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/cards/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "oracleid:abc".into()),
                Matcher::UrlEncoded("unique".into(), "prints".into()),
                Matcher::UrlEncoded("order".into(), "released".into()),
                Matcher::UrlEncoded("dir".into(), "asc".into()),
                Matcher::UrlEncoded("include_multilingual".into(), "true".into()),
            ]))
            .match_header("user-agent", USER_AGENT)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "object": "list", "has_more": false, "data": [printing("p1")] }).to_string())
            .create_async()
            .await;

        let printings = client(&server).search_printings_by_card_id("abc").await.unwrap();

        assert_eq!(printings.len(), 1);
        assert_eq!(printings[0].id, "p1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn search_follows_next_page() {
        let mut server = mockito::Server::new_async().await;
        let next_page = format!("{}/cards/search?page=2", server.url());

        let first = server
            .mock("GET", "/cards/search")
            .match_query(Matcher::UrlEncoded("q".into(), "oracleid:abc".into()))
            .with_status(200)
            .with_body(json!({ "has_more": true, "next_page": next_page, "data": [printing("p1")] }).to_string())
            .create_async()
            .await;
        let second = server
            .mock("GET", "/cards/search")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_body(json!({ "has_more": false, "data": [printing("p2"), printing("p3")] }).to_string())
            .create_async()
            .await;

        let printings = client(&server).search_printings_by_card_id("abc").await.unwrap();

        let ids: Vec<_> = printings.iter().map(|printing| printing.id.as_str()).collect();
        assert_eq!(ids, ["p1", "p2", "p3"]);
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn failed_page_fails_the_search() {
        let mut server = mockito::Server::new_async().await;
        let next_page = format!("{}/cards/search?page=2", server.url());

        server
            .mock("GET", "/cards/search")
            .match_query(Matcher::UrlEncoded("q".into(), "oracleid:abc".into()))
            .with_status(200)
            .with_body(json!({ "has_more": true, "next_page": next_page, "data": [printing("p1")] }).to_string())
            .create_async()
            .await;
        server
            .mock("GET", "/cards/search")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let result = client(&server).search_printings_by_card_id("abc").await;
        assert!(matches!(result, Err(CatalogError::Status { status: 500, .. })));
    }

    #[tokio::test]
    async fn has_more_without_next_page_fails_the_search() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/cards/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({ "has_more": true, "data": [printing("p1")] }).to_string())
            .create_async()
            .await;

        let result = client(&server).search_printings_by_card_id("abc").await;
        assert!(matches!(result, Err(CatalogError::Decode(_))));
    }

    #[tokio::test]
    async fn error_status_carries_the_catalog_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/cards/search")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(json!({
                "object": "error",
                "code": "not_found",
                "status": 404,
                "details": "Your query didn't match any cards."
            }).to_string())
            .create_async()
            .await;

        let err = client(&server).search_printings_by_card_id("missing").await.unwrap_err();

        match err {
            CatalogError::Status { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Your query didn't match any cards.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn set_metadata_is_decoded() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/sets/s1")
            .with_status(200)
            .with_body(json!({
                "object": "set",
                "id": "s1",
                "code": "xln",
                "name": "Ixalan",
                "icon_svg_uri": "https://svgs.scryfall.io/sets/xln.svg"
            }).to_string())
            .create_async()
            .await;

        let set = client(&server).get_set_metadata("s1").await.unwrap();

        assert_eq!(set.code.as_deref(), Some("xln"));
        assert_eq!(set.icon_svg_uri.as_deref(), Some("https://svgs.scryfall.io/sets/xln.svg"));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/sets/s1")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let result = client(&server).get_set_metadata("s1").await;
        assert!(matches!(result, Err(CatalogError::Decode(_))));
    }

    #[tokio::test]
    async fn set_id_stays_inside_the_sets_path() {
        let mut server = mockito::Server::new_async().await;
        let other = server
            .mock("GET", "/cards/some-card")
            .with_status(200)
            .with_body(json!({ "object": "card", "id": "some-card", "name": "Opt" }).to_string())
            .expect(0)
            .create_async()
            .await;
        let sets = server
            .mock("GET", "/sets/..%2Fcards%2Fsome-card")
            .with_status(404)
            .with_body(json!({ "object": "error", "details": "No set found." }).to_string())
            .create_async()
            .await;

        let result = client(&server).get_set_metadata("../cards/some-card").await;

        assert!(matches!(result, Err(CatalogError::Status { status: 404, .. })));
        other.assert_async().await;
        sets.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_catalog_is_a_transport_error() {
        let api = ScryfallApi::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap();
        let result = ScryfallClient::from_client(api).get_set_metadata("s1").await;
        assert!(matches!(result, Err(CatalogError::Transport(_))));
    }
}
