//! Integration tests for `KakaoClient` using wiremock HTTP mocks.

use kioskmap_core::Coordinates;
use kioskmap_geocode::{GeocodeError, KakaoClient};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> KakaoClient {
    KakaoClient::with_base_url("test-key", 5, "kioskmap-test", base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn search_keyword_sends_kakao_auth_and_parses_documents() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/local/search/keyword.json"))
        .and(query_param("query", "온수역"))
        .and(header("authorization", "KakaoAK test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "meta": { "total_count": 2 },
            "documents": [
                { "place_name": "온수역 7호선", "x": "126.8252", "y": "37.4922" },
                { "place_name": "온수역 1호선", "x": 126.8227, "y": 37.4921 }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let places = test_client(&server.uri())
        .search_keyword("온수역")
        .await
        .expect("should parse places");

    assert_eq!(places.len(), 2);
    assert_eq!(places[0].place_name, "온수역 7호선");
    assert!((places[0].y - 37.4922).abs() < 1e-9);
    assert!((places[1].x - 126.8227).abs() < 1e-9);
}

#[tokio::test]
async fn search_keyword_maps_non_2xx_to_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/local/search/keyword.json"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search_keyword("온수역")
        .await
        .unwrap_err();

    assert!(
        matches!(err, GeocodeError::UnexpectedStatus { status: 401, .. }),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn search_keyword_rejects_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/local/search/keyword.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search_keyword("온수역")
        .await
        .unwrap_err();

    assert!(matches!(err, GeocodeError::Deserialize { .. }));
}

#[tokio::test]
async fn search_keyword_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/local/search/keyword.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "documents": [] }))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = KakaoClient::with_base_url("test-key", 1, "kioskmap-test", &server.uri())
        .expect("client");
    let err = client.search_keyword("온수역").await.unwrap_err();

    assert!(matches!(err, GeocodeError::Http(ref e) if e.is_timeout()));
}

#[tokio::test]
async fn coord_to_address_sends_lon_as_x_and_lat_as_y() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/local/geo/coord2address.json"))
        .and(query_param("x", "126.82"))
        .and(query_param("y", "37.49"))
        .and(header("authorization", "KakaoAK test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "documents": [{
                "address": {
                    "address_name": "서울 구로구 온수동",
                    "region_1depth_name": "서울특별시",
                    "region_2depth_name": "구로구",
                    "region_3depth_name": "온수동"
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let documents = test_client(&server.uri())
        .coord_to_address(Coordinates::new(37.49, 126.82))
        .await
        .expect("should parse address");

    let address = documents[0].address.as_ref().expect("address present");
    assert_eq!(address.region_1depth_name, "서울특별시");
    assert_eq!(address.region_2depth_name, "구로구");
}
