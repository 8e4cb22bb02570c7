use serde_json::json;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wayfarer::api::{Geocoder, RouteEstimator};
use wayfarer::config::Config;
use wayfarer::entities::{Coordinate, TravelMode};
use wayfarer::error::ErrorKind;
use wayfarer::external::{NominatimGeocoder, OsrmRouteEstimator};

fn coord(longitude: f64, latitude: f64) -> Coordinate {
    Coordinate::new(longitude, latitude).unwrap()
}

fn geocoder(server: &MockServer) -> NominatimGeocoder {
    NominatimGeocoder::new(&Config {
        geocoding_base_url: server.uri(),
        ..Config::for_testing()
    })
    .unwrap()
}

fn router(server: &MockServer, retries: u32) -> OsrmRouteEstimator {
    OsrmRouteEstimator::new(&Config {
        routing_base_url: server.uri(),
        http_retries: retries,
        ..Config::for_testing()
    })
    .unwrap()
}

fn candidate(name: &str, lat: &str, lon: &str) -> serde_json::Value {
    json!({ "place_id": 1, "lat": lat, "lon": lon, "display_name": name, "type": "museum" })
}

#[tokio::test]
async fn search_returns_the_top_candidate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "British Museum"))
        .and(query_param("limit", "1"))
        .and(query_param("format", "jsonv2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([candidate(
            "British Museum, Great Russell Street, London",
            "51.5194133",
            "-0.1269566"
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let places = geocoder(&server).search("  British Museum ").await.unwrap();

    assert_eq!(places.len(), 1);
    assert_eq!(places[0].coordinate, coord(-0.1269566, 51.5194133));
    assert!(places[0].display_name.starts_with("British Museum"));
}

#[tokio::test]
async fn autocomplete_passes_the_limit_and_skips_bad_candidates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Lond"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            candidate("London, England", "51.5073", "-0.1276"),
            candidate("Broken", "", "-0.1"),
            candidate("London, Ontario", "42.9836", "-81.2497"),
        ])))
        .mount(&server)
        .await;

    let places = geocoder(&server).autocomplete("Lond", 5).await.unwrap();

    let names: Vec<_> = places.iter().map(|p| p.display_name.as_str()).collect();
    assert_eq!(names, ["London, England", "London, Ontario"]);
}

#[tokio::test]
async fn blank_queries_never_reach_the_service() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    assert!(geocoder(&server).autocomplete("   ", 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn reverse_lookup_reads_the_display_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "51.5308"))
        .and(query_param("lon", "-0.1246"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "place_id": 7,
            "display_name": "King's Cross, London N1C, United Kingdom"
        })))
        .mount(&server)
        .await;

    let address = geocoder(&server)
        .reverse(coord(-0.1246, 51.5308))
        .await
        .unwrap();

    assert_eq!(
        address.as_deref(),
        Some("King's Cross, London N1C, United Kingdom")
    );
}

#[tokio::test]
async fn reverse_lookup_without_an_address_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "error": "Unable to geocode" })),
        )
        .mount(&server)
        .await;

    let address = geocoder(&server).reverse(coord(0.0, 0.0)).await.unwrap();

    assert_eq!(address, None);
}

#[tokio::test]
async fn geocoder_server_errors_surface_as_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = geocoder(&server).search("anything").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Upstream);
}

fn osrm_ok() -> serde_json::Value {
    json!({
        "code": "Ok",
        "routes": [{
            "duration": 1534.2,
            "distance": 1820.4,
            "geometry": {
                "type": "LineString",
                "coordinates": [[-0.1246, 51.5308], [-0.1255, 51.5251], [-0.1269, 51.5194]]
            }
        }],
        "waypoints": []
    })
}

#[tokio::test]
async fn route_uses_the_mode_profile_and_geojson_geometry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/foot/-0\.1246,51\.5308;-0\.1269,51\.5194$"))
        .and(query_param("overview", "full"))
        .and(query_param("geometries", "geojson"))
        .respond_with(ResponseTemplate::new(200).set_body_json(osrm_ok()))
        .expect(1)
        .mount(&server)
        .await;

    let leg = router(&server, 0)
        .route(coord(-0.1246, 51.5308), coord(-0.1269, 51.5194), TravelMode::Foot)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(leg.duration_seconds, 1534.2);
    assert_eq!(leg.path.len(), 3);
    assert_eq!(leg.path[0], coord(-0.1246, 51.5308));
    assert_eq!(leg.path[2], coord(-0.1269, 51.5194));
}

#[tokio::test]
async fn no_route_answer_is_an_empty_leg() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "NoRoute",
            "message": "Impossible route between points"
        })))
        .mount(&server)
        .await;

    let leg = router(&server, 0)
        .route(coord(-0.1246, 51.5308), coord(2.3522, 48.8566), TravelMode::Car)
        .await
        .unwrap();

    assert_eq!(leg, None);
}

#[tokio::test]
async fn server_errors_are_retried_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(osrm_ok()))
        .expect(1)
        .mount(&server)
        .await;

    let leg = router(&server, 1)
        .route(coord(-0.1246, 51.5308), coord(-0.1269, 51.5194), TravelMode::Bike)
        .await
        .unwrap();

    assert!(leg.is_some());
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "InvalidQuery",
            "message": "Query string malformed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = router(&server, 3)
        .route(coord(-0.1246, 51.5308), coord(-0.1269, 51.5194), TravelMode::Car)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn malformed_routing_answers_are_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = router(&server, 0)
        .route(coord(-0.1246, 51.5308), coord(-0.1269, 51.5194), TravelMode::Car)
        .await;

    assert!(result.is_err());
}
