//! End-to-end checks of the fixed response over real sockets.

use std::net::TcpListener as StdTcpListener;
use std::time::Duration;

use ok_server::ServerConfig;
use reqwest::Method;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

mod common;

use common::{raw_exchange, read_head, start_server, RawResponse};

#[tokio::test]
async fn get_anything_is_200_with_empty_body() {
    let server = start_server(ServerConfig::default()).await;

    let raw = raw_exchange(
        server.addr,
        b"GET /anything HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    let response = RawResponse::parse(&raw);

    assert_eq!(response.status_line, "HTTP/1.1 200 OK");
    assert_eq!(response.header("content-length"), Some("0"));
    assert!(response.body.is_empty());

    server.stop().await.unwrap();
}

#[tokio::test]
async fn post_body_is_ignored() {
    let server = start_server(ServerConfig::default()).await;

    let raw = raw_exchange(
        server.addr,
        b"POST / HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\nConnection: close\r\n\r\nhello",
    )
    .await;
    let response = RawResponse::parse(&raw);

    assert_eq!(response.status_line, "HTTP/1.1 200 OK");
    assert_eq!(response.header("content-length"), Some("0"));
    assert!(response.body.is_empty());
    assert!(!raw.contains("hello"));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn any_method_and_path_is_200() {
    let server = start_server(ServerConfig::default()).await;
    let client = reqwest::Client::new();

    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::HEAD,
        Method::from_bytes(b"PURGE").unwrap(),
        Method::from_bytes(b"X-STRESS").unwrap(),
    ];
    let paths = ["/", "/anything", "/deeply/nested/path", "/q?x=1&y=2"];

    for method in &methods {
        for path in paths {
            let res = client
                .request(method.clone(), server.url(path))
                .body("ignored payload")
                .send()
                .await
                .unwrap();
            assert_eq!(res.status(), 200, "{method} {path}");
            assert!(res.bytes().await.unwrap().is_empty(), "{method} {path}");
        }
    }

    server.stop().await.unwrap();
}

#[tokio::test]
async fn http10_request_is_answered_and_closed() {
    let server = start_server(ServerConfig::default()).await;

    let raw = raw_exchange(server.addr, b"GET / HTTP/1.0\r\n\r\n").await;
    let response = RawResponse::parse(&raw);

    assert!(response.status_line.starts_with("HTTP/1."));
    assert!(response.status_line.ends_with(" 200 OK"));
    assert!(response.body.is_empty());

    server.stop().await.unwrap();
}

#[tokio::test]
async fn keep_alive_serves_several_requests_per_connection() {
    let server = start_server(ServerConfig::default()).await;
    let mut stream = TcpStream::connect(server.addr).await.unwrap();

    for path in ["/one", "/two", "/three"] {
        let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();
        let head = read_head(&mut stream).await;
        assert!(head.starts_with("HTTP/1.1 200 OK\r\n"), "{path}: {head}");
    }

    drop(stream);
    server.stop().await.unwrap();
}

#[tokio::test]
async fn disabled_keep_alive_closes_after_response() {
    let mut config = ServerConfig::default();
    config.http.keep_alive = false;
    let server = start_server(config).await;

    // No `Connection: close` from the client: the server decides.
    let raw = raw_exchange(server.addr, b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
    let response = RawResponse::parse(&raw);

    assert_eq!(response.status_line, "HTTP/1.1 200 OK");
    assert!(response.body.is_empty());

    server.stop().await.unwrap();
}

#[tokio::test]
async fn malformed_request_is_not_answered_with_200() {
    let server = start_server(ServerConfig::default()).await;

    let raw = raw_exchange(server.addr, b"THIS IS NOT HTTP\r\n\r\n").await;
    assert!(!raw.contains(" 200 "), "unexpected response: {raw}");

    // The server keeps serving afterwards.
    let res = reqwest::get(server.url("/")).await.unwrap();
    assert_eq!(res.status(), 200);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn h2c_prior_knowledge_is_served() {
    let server = start_server(ServerConfig::default()).await;
    let client = reqwest::Client::builder()
        .http2_prior_knowledge()
        .build()
        .unwrap();

    let res = client.get(server.url("/h2")).send().await.unwrap();
    assert_eq!(res.version(), reqwest::Version::HTTP_2);
    assert_eq!(res.status(), 200);
    assert!(res.bytes().await.unwrap().is_empty());

    server.stop().await.unwrap();
}

#[tokio::test]
async fn shutdown_releases_the_port() {
    let server = start_server(ServerConfig::default()).await;
    let addr = server.addr;

    let res = reqwest::get(server.url("/")).await.unwrap();
    assert_eq!(res.status(), 200);

    server.stop().await.unwrap();

    assert!(StdTcpListener::bind(addr).is_ok(), "port still bound after shutdown");
}

#[tokio::test]
async fn shutdown_drains_idle_keep_alive_connections() {
    let mut config = ServerConfig::default();
    config.timeouts.shutdown_secs = 60;
    let server = start_server(config).await;

    let mut stream = TcpStream::connect(server.addr).await.unwrap();
    stream
        .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();
    read_head(&mut stream).await;

    // The idle connection is still open; `stop` times out after 5s if the
    // drain waited for the 60s deadline instead of closing it.
    let started = std::time::Instant::now();
    server.stop().await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(5));
}
