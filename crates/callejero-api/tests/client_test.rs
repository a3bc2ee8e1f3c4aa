// Integration tests for `CallejeroClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use callejero_api::{CallejeroClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, CallejeroClient) {
    let server = MockServer::start().await;
    let client = CallejeroClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_regions() {
    let (server, client) = setup().await;

    let body = json!([
        { "CCOM": "01", "AUTO": "ANDALUCÍA" },
        { "CCOM": "13", "AUTO": "MADRID" },
        { "CCOM": "16", "AUTO": "PAÍS VASCO" },
    ]);

    Mock::given(method("GET"))
        .and(path("/api/autonomias/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let regions = client.list_regions().await.unwrap();

    assert_eq!(regions.len(), 3);
    assert_eq!(regions[0].code, "01");
    assert_eq!(regions[0].name, "ANDALUCÍA");
    assert_eq!(regions[1].code, "13");
    assert_eq!(regions[2].name, "PAÍS VASCO");
}

#[tokio::test]
async fn test_list_provinces() {
    let (server, client) = setup().await;

    let body = json!([
        { "CODPRO": "04", "PRO": "ALMERÍA", "CCOM": "01", "AUTO": "ANDALUCÍA" },
        { "CODPRO": "11", "PRO": "CÁDIZ", "CCOM": "01", "AUTO": "ANDALUCÍA" },
    ]);

    Mock::given(method("GET"))
        .and(path("/api/provincias/01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let provinces = client.list_provinces("01").await.unwrap();

    assert_eq!(provinces.len(), 2);
    assert_eq!(provinces[0].code, "04");
    assert_eq!(provinces[0].name, "ALMERÍA");
    assert!(provinces.iter().all(|p| p.region_code == "01"));
}

#[tokio::test]
async fn test_list_municipalities_numeric_fields() {
    let (server, client) = setup().await;

    let body = json!([
        { "cmun": 79, "cun": 0, "nentsic": "MADRID" },
        { "cmun": 1, "cun": 0, "nentsic": "ALCALÁ DE HENARES" },
    ]);

    Mock::given(method("GET"))
        .and(path("/api/poblaciones/28"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let municipalities = client.list_municipalities("28").await.unwrap();

    assert_eq!(municipalities.len(), 2);
    assert_eq!(municipalities[0].code, 79);
    assert_eq!(municipalities[0].name, "MADRID");
    assert_eq!(municipalities[1].name, "ALCALÁ DE HENARES");
}

#[tokio::test]
async fn test_search_streets() {
    let (server, client) = setup().await;

    let body = json!([
        {
            "cpos": 28001, "cpro": 28, "cmun": 79, "cvia": 1,
            "nentsic": "MADRID", "tvia": "Calle", "nvia": "Mayor"
        },
        {
            "cpos": 28001, "cpro": 28, "cmun": 79, "cvia": 2,
            "nentsic": "MADRID", "tvia": "Plaza", "nvia": "Mayor"
        },
    ]);

    Mock::given(method("GET"))
        .and(path("/api/vias/28001/MAYOR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let streets = client.search_streets("28001", "MAYOR").await.unwrap();

    assert_eq!(streets.len(), 2);
    assert!(streets.iter().all(|s| s.postal_code == 28001));
    assert_eq!(streets[0].kind, "Calle");
    assert_eq!(streets[1].kind, "Plaza");
    assert_eq!(streets[1].name, "Mayor");
}

#[tokio::test]
async fn test_search_streets_empty_result() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/vias/28001/INEXISTENTE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let streets = client.search_streets("28001", "INEXISTENTE").await.unwrap();
    assert!(streets.is_empty());
}

#[tokio::test]
async fn test_search_streets_preserves_non_ascii() {
    let (server, client) = setup().await;

    // Catch-all: we only care about the request the client sends.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    client.search_streets("28001", "JOSÉ").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    // É travels percent-encoded, not normalized or case-folded.
    assert_eq!(requests[0].url.path(), "/api/vias/28001/JOS%C3%89");
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_404_with_detail() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/provincias/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "detail": "Sin resultados para esa comunidad autónoma"
        })))
        .mount(&server)
        .await;

    let result = client.list_provinces("99").await;

    match result {
        Err(Error::Http { status, ref detail }) => {
            assert_eq!(status, 404);
            assert_eq!(
                detail.as_deref(),
                Some("Sin resultados para esa comunidad autónoma")
            );
        }
        other => panic!("expected Http 404 error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_422_non_string_detail() {
    let (server, client) = setup().await;

    // FastAPI validation failures carry an array in `detail` -- not usable
    // as a message, so the client must report no detail.
    Mock::given(method("GET"))
        .and(path("/api/vias/999/MAYOR"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [{ "loc": ["path", "cpos"], "msg": "value is not valid" }]
        })))
        .mount(&server)
        .await;

    let result = client.search_streets("999", "MAYOR").await;

    match result {
        Err(Error::Http { status, ref detail }) => {
            assert_eq!(status, 422);
            assert!(detail.is_none());
        }
        other => panic!("expected Http 422 error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_500_empty_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client.list_regions().await;

    match result {
        Err(Error::Http { status, ref detail }) => {
            assert_eq!(status, 500);
            assert!(detail.is_none());
        }
        other => panic!("expected Http 500 error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_transport_error_no_response() {
    // Nothing listens on port 1; the connection is refused before any
    // HTTP exchange, so this must surface as Transport, not Http.
    let client =
        CallejeroClient::from_reqwest("http://127.0.0.1:1", reqwest::Client::new()).unwrap();

    let result = client.list_regions().await;

    match result {
        Err(Error::Transport(e)) => assert!(e.is_connect(), "expected connect error, got: {e}"),
        other => panic!("expected Transport error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_deserialization_error_keeps_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/autonomias/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.list_regions().await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => assert_eq!(body, "not json"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_helpers() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "nope" })))
        .mount(&server)
        .await;

    let err = client.list_regions().await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.detail(), Some("nope"));
}
