//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use readthrough_config::OriginConfig;
use readthrough_core::EmployeeList;
use readthrough_service::HttpOriginSource;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage};
use testcontainers_modules::redis::Redis;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path served by the mock origin.
pub const EMPLOYEES_PATH: &str = "/api/v1/employees";

/// The single-employee directory used throughout the scenarios.
pub const TIGER_JSON: &str = r#"[{"id":1,"name":"Tiger"}]"#;

/// Starts a mock origin answering `response` to a JSON GET, expecting
/// exactly `times` requests.
pub async fn mock_origin(response: ResponseTemplate, times: u64) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(EMPLOYEES_PATH))
        .and(header("accept", "application/json"))
        .respond_with(response)
        .expect(times)
        .mount(&server)
        .await;

    server
}

/// A JSON response with the given body.
pub fn json_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "application/json")
}

/// Origin configuration pointing at a mock server.
pub fn origin_config(server: &MockServer) -> OriginConfig {
    OriginConfig {
        url: format!("{}{}", server.uri(), EMPLOYEES_PATH),
        ..OriginConfig::default()
    }
}

/// HTTP origin client pointing at a mock server.
pub fn http_origin(server: &MockServer) -> HttpOriginSource<EmployeeList> {
    HttpOriginSource::new(&origin_config(server)).expect("Failed to build origin client")
}

/// Starts a Redis container and returns it with its `redis://` address.
pub async fn start_redis() -> (ContainerAsync<Redis>, String) {
    let container = Redis::default()
        .start()
        .await
        .expect("Failed to start Redis container");

    let port = container
        .get_host_port_ipv4(6379)
        .await
        .expect("Failed to get Redis port");

    (container, format!("redis://127.0.0.1:{}", port))
}

/// Starts a memcached container and returns it with its `memcache://` address.
pub async fn start_memcached() -> (ContainerAsync<GenericImage>, String) {
    let container = GenericImage::new("memcached", "1.6-alpine")
        .with_exposed_port(11211.tcp())
        .with_wait_for(WaitFor::seconds(1))
        .start()
        .await
        .expect("Failed to start memcached container");

    let port = container
        .get_host_port_ipv4(11211)
        .await
        .expect("Failed to get memcached port");

    (container, format!("memcache://127.0.0.1:{}", port))
}
