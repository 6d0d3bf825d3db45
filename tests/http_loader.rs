//! Loads records over a real socket from the API router.
#![cfg(feature = "server")]

use std::net::SocketAddr;
use std::sync::mpsc;
use std::thread;

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use data_review::{dataset, DataSource, LoadError};

/// Serve `app` on an ephemeral port from a background runtime
fn serve(app: Router) -> SocketAddr {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    rx.recv().unwrap()
}

#[test]
fn loads_records_from_data_endpoint() {
    let addr = serve(data_review::api::router(dataset::builtin().unwrap()));

    let store = DataSource::Http(format!("http://{}/api/data", addr))
        .load()
        .unwrap();

    assert_eq!(store.len(), 12);
    assert_eq!(store.get("5").unwrap().name, "Liam O\"Connor, Jr.");
}

#[test]
fn server_error_is_status_failure() {
    let app = Router::new().route(
        "/api/data",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let addr = serve(app);

    let err = DataSource::Http(format!("http://{}/api/data", addr))
        .load()
        .unwrap_err();

    assert!(matches!(err, LoadError::Status { status: 500, .. }));
}

#[test]
fn malformed_body_is_decode_failure() {
    let app = Router::new().route("/api/data", get(|| async { "not json" }));
    let addr = serve(app);

    let err = data_review::spawn_load(DataSource::Http(format!("http://{}/api/data", addr)))
        .recv()
        .unwrap()
        .unwrap_err();

    assert!(matches!(err, LoadError::Decode(_)));
}
