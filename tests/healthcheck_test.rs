use std::net::TcpListener;
use std::time::Duration;
use tokio::time::sleep;

fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn spawn_health_server(port: u16, status: axum::http::StatusCode) -> tokio::task::JoinHandle<()> {
    let handle = tokio::spawn(async move {
        let app = axum::Router::new().route(
            "/health",
            axum::routing::get(move || async move { (status, "OK") }),
        );
        let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{port}"))
            .await
            .unwrap();
        axum::serve(listener, app).await.unwrap();
    });
    sleep(Duration::from_millis(100)).await;
    handle
}

#[tokio::test]
async fn test_healthcheck_succeeds_when_relay_is_up() {
    let port = free_port();
    let server = spawn_health_server(port, axum::http::StatusCode::OK).await;

    let result = rask_hec_relay::healthcheck_with_port(port).await;
    assert!(result.is_ok(), "{result:?}");

    server.abort();
}

#[tokio::test]
async fn test_healthcheck_fails_when_nothing_listens() {
    let port = free_port();
    assert!(rask_hec_relay::healthcheck_with_port(port).await.is_err());
}

#[tokio::test]
async fn test_healthcheck_fails_on_error_status() {
    let port = free_port();
    let server = spawn_health_server(port, axum::http::StatusCode::SERVICE_UNAVAILABLE).await;

    let err = rask_hec_relay::healthcheck_with_port(port).await.unwrap_err();
    assert!(err.to_string().contains("503"));

    server.abort();
}
