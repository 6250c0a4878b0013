//! Integration tests for the catalog client against a mock TMDB server.
//!
//! Each test starts its own `wiremock` server and feeds the client's results
//! through the view state, the way the UI does after a fetch completes.

use marquee::catalog::{CatalogClient, CatalogError, CatalogOptions, ListingMode};
use marquee::controller::ViewState;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> CatalogClient {
    CatalogClient::new(CatalogOptions {
        api_base: server.uri(),
        token: Some(SecretString::from("test-token")),
        timeout: Duration::from_secs(2),
        ..CatalogOptions::default()
    })
    .unwrap()
}

fn page(titles: &[(u64, &str)]) -> serde_json::Value {
    let results: Vec<_> = titles
        .iter()
        .map(|(id, title)| serde_json::json!({ "id": id, "title": title }))
        .collect();
    serde_json::json!({ "page": 1, "results": results, "total_results": titles.len() })
}

#[tokio::test]
async fn test_listing_modes_hit_their_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/now_playing"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&[(1, "Dune"), (2, "Heat")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&[(3, "Alien")])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut view = ViewState::new(ListingMode::New);

    let ticket = view.reload_listing();
    let result = client.listing(ticket.mode).await;
    assert!(view.apply_listing(ticket.seq, result));
    assert_eq!(view.raw_summaries().len(), 2);

    let ticket = view.set_listing_mode(ListingMode::Popular).unwrap();
    let result = client.listing(ticket.mode).await;
    assert!(view.apply_listing(ticket.seq, result));
    assert_eq!(view.raw_summaries()[0].title, "Alien");
}

#[tokio::test]
async fn test_search_round_trip_through_view() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .and(query_param("query", "the batman"))
        .and(query_param("include_adult", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&[(414906, "The Batman")])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut view = ViewState::new(ListingMode::New);
    let ticket = view.set_search_query("the batman").unwrap();
    let result = client.search(&ticket.query).await;
    assert!(view.apply_search(ticket.seq, result));
    assert_eq!(view.displayed()[0].id, 414906);
}

#[tokio::test]
async fn test_unauthorized_listing_leaves_grid_intact() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/now_playing"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "status_code": 7,
            "status_message": "Invalid API key",
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.now_playing().await;
    assert!(matches!(result, Err(CatalogError::HttpStatus(401))));

    let mut view = ViewState::new(ListingMode::New);
    let ticket = view.reload_listing();
    assert!(view.apply_listing(ticket.seq, result));
    assert!(view.raw_summaries().is_empty());
    assert!(!view.is_list_loading());
}

#[tokio::test]
async fn test_detail_failure_keeps_overlay_open() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/42"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut view = ViewState::new(ListingMode::New);
    let summary = serde_json::from_value(serde_json::json!({ "id": 42, "title": "Lost" })).unwrap();
    let ticket = view.select_movie(summary);
    let result = client.detail(ticket.movie_id).await;
    assert!(matches!(result, Err(CatalogError::HttpStatus(404))));
    assert!(view.apply_detail(ticket.seq, ticket.movie_id, result));
    assert!(view.is_detail_open());
    assert!(view.selected_detail().is_none());
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/now_playing"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(&[]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = CatalogClient::new(CatalogOptions {
        api_base: server.uri(),
        timeout: Duration::from_millis(200),
        ..CatalogOptions::default()
    })
    .unwrap();
    let result = client.now_playing().await;
    assert!(matches!(result, Err(CatalogError::Timeout)), "{:?}", result);
}

#[tokio::test]
async fn test_oversized_response_rejected() {
    let server = MockServer::start().await;
    let huge = format!(r#"{{"results": [], "padding": "{}"}}"#, "x".repeat(6 * 1024 * 1024));
    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .respond_with(ResponseTemplate::new(200).set_body_string(huge))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.popular().await;
    assert!(matches!(result, Err(CatalogError::ResponseTooLarge(_))));
}
