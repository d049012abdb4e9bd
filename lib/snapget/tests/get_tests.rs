//! Integration tests for the blocking client using wiremock.
//!
//! The mock server lives on the test runtime; blocking calls go through
//! `spawn_blocking`, the way async callers are expected to use the client.

use std::time::{Duration, Instant};

use assert2::{check, let_assert};
use serde::Deserialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use snapget::{Client, DEFAULT_USER_AGENT, Error, TransportErrorKind};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

async fn blocking<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.expect("blocking task")
}

fn quiet_client() -> Client {
    Client::builder().without_logging().build().expect("client")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_query_parameters_are_encoded_in_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("results"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let base_url = format!("{}/search", mock_server.uri());
    let response = blocking(move || {
        snapget::get(&base_url, &[("q", "a b"), ("q", "c")], &[], 0.0)
    })
    .await
    .expect("response");

    check!(response.status() == 200);
    check!(response.text() == Ok("results"));
    check!(response.final_url().as_str() == format!("{}/search?q=a%20b&q=c", mock_server.uri()));

    let requests = mock_server.received_requests().await.expect("recorded requests");
    check!(requests.len() == 1);
    check!(requests[0].url.query() == Some("q=a%20b&q=c"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_params_append_after_existing_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let base_url = format!("{}?x=1", mock_server.uri());
    let response = blocking(move || quiet_client().get(&base_url, &[("y", "2")], &[], 0.0))
        .await
        .expect("response");

    check!(response.request_url().query() == Some("x=1&y=2"));
    check!(response.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_custom_headers_and_default_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/headers"))
        .and(header("x-token", "abc"))
        .and(header("accept", "application/json"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let base_url = format!("{}/headers", mock_server.uri());
    let response = blocking(move || {
        quiet_client().get(
            &base_url,
            &[],
            &[("X-Token", "abc"), ("Accept", "application/json")],
            5.0,
        )
    })
    .await
    .expect("response");

    check!(response.status() == 200);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_caller_user_agent_overrides_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("user-agent", "my-c-client/1.0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let response = blocking(move || {
        quiet_client().get(&base_url, &[], &[("User-Agent", "my-c-client/1.0")], 0.0)
    })
    .await
    .expect("response");

    check!(response.status() == 200);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_configured_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("user-agent", "crawler/2.0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let response = blocking(move || {
        let client = Client::builder()
            .user_agent("crawler/2.0")
            .without_logging()
            .build()
            .expect("client");
        client.get(&base_url, &[], &[], 0.0)
    })
    .await
    .expect("response");

    check!(response.status() == 200);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_binary_body_is_returned_verbatim() {
    let mock_server = MockServer::start().await;

    let payload: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    Mock::given(method("GET"))
        .and(path("/blob"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
        .mount(&mock_server)
        .await;

    let base_url = format!("{}/blob", mock_server.uri());
    let response = blocking(move || quiet_client().get(&base_url, &[], &[], 0.0))
        .await
        .expect("response");

    check!(response.len() == payload.len());
    check!(response.body() == &payload[..]);
    check!(response.text().is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_large_body_is_fully_buffered() {
    let mock_server = MockServer::start().await;

    let payload = vec![b'x'; 3 * 1024 * 1024];
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
        .mount(&mock_server)
        .await;

    let base_url = format!("{}/large", mock_server.uri());
    let response = blocking(move || quiet_client().get(&base_url, &[], &[], 10.0))
        .await
        .expect("response");

    check!(response.len() == payload.len());
    check!(response.into_body() == payload);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_json_body() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u64,
        name: String,
    }

    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 1,
            "name": "Alice",
        })))
        .mount(&mock_server)
        .await;

    let base_url = format!("{}/items/1", mock_server.uri());
    let response = blocking(move || quiet_client().get(&base_url, &[], &[], 0.0))
        .await
        .expect("response");

    check!(response.header("content-type") == Some("application/json"));
    let item: Item = response.json().expect("json");
    check!(
        item == Item {
            id: 1,
            name: "Alice".to_string(),
        }
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_zero_timeout_waits_for_slow_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let response = blocking(move || quiet_client().get(&base_url, &[], &[], 0.0))
        .await
        .expect("response");

    check!(response.text() == Ok("late"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_timeout_below_latency_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let result = blocking(move || quiet_client().get(&base_url, &[], &[], 0.1)).await;

    let_assert!(Err(err) = result);
    check!(err.is_timeout());
    check!(err.transport_kind() == Some(TransportErrorKind::Timeout));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_redirect_is_followed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/new"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
        .mount(&mock_server)
        .await;

    let base_url = format!("{}/old", mock_server.uri());
    let response = blocking(move || quiet_client().get(&base_url, &[("k", "v")], &[], 5.0))
        .await
        .expect("response");

    check!(response.status() == 200);
    check!(response.text() == Ok("moved"));
    check!(response.was_redirected());
    check!(response.request_url().as_str() == format!("{}/old?k=v", mock_server.uri()));
    check!(response.final_url().as_str() == format!("{}/new", mock_server.uri()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_redirect_loop_is_bounded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/loop"))
        .expect(4)
        .mount(&mock_server)
        .await;

    let base_url = format!("{}/loop", mock_server.uri());
    let result = blocking(move || {
        let client = Client::builder()
            .max_redirects(3)
            .without_logging()
            .build()
            .expect("client");
        client.get(&base_url, &[], &[], 5.0)
    })
    .await;

    let_assert!(Err(err) = result);
    check!(err.transport_kind() == Some(TransportErrorKind::Redirect));
    insta::assert_snapshot!(err, @"transport error (redirect): maximum (3) redirects followed");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_redirect_without_location_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(301))
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let result = blocking(move || quiet_client().get(&base_url, &[], &[], 5.0)).await;

    let_assert!(Err(err) = result);
    check!(err.transport_kind() == Some(TransportErrorKind::Redirect));
    insta::assert_snapshot!(err, @"transport error (redirect): redirect response missing Location header");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_zero_max_redirects_returns_redirect_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/new"))
        .mount(&mock_server)
        .await;

    let base_url = format!("{}/old", mock_server.uri());
    let response = blocking(move || {
        let client = Client::builder()
            .max_redirects(0)
            .without_logging()
            .build()
            .expect("client");
        client.get(&base_url, &[], &[], 5.0)
    })
    .await
    .expect("response");

    check!(response.status() == 302);
    check!(response.is_redirection());
    check!(response.header("location") == Some("/new"));
    check!(!response.was_redirected());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_error_status_is_a_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&mock_server)
        .await;

    let base_url = format!("{}/missing", mock_server.uri());
    let response = blocking(move || quiet_client().get(&base_url, &[], &[], 5.0))
        .await
        .expect("response");

    check!(response.status() == 404);
    check!(response.is_client_error());
    check!(response.text() == Ok("not found"));

    let_assert!(Err(Error::Http { status, .. }) = response.error_for_status());
    check!(status == 404);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_connection_refused() {
    let result = blocking(|| quiet_client().get("http://127.0.0.1:1/", &[], &[], 5.0)).await;

    let_assert!(Err(err) = result);
    check!(err.is_connect());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_malformed_url_sends_nothing() {
    let result = blocking(|| snapget::get("not a url \t", &[("q", "x")], &[], 0.0)).await;

    let_assert!(Err(Error::MalformedUrl(_)) = result);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_invalid_header_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let result =
        blocking(move || quiet_client().get(&base_url, &[], &[("Bad Header", "x")], 0.0)).await;

    let_assert!(Err(err) = result);
    check!(err.transport_kind() == Some(TransportErrorKind::InvalidRequest));
}

#[tokio::test]
async fn test_call_inside_async_task_is_refused() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let base_url = mock_server.uri();
    let result = tokio::spawn(async move { snapget::get(&base_url, &[], &[], 0.0) })
        .await
        .expect("task");

    let_assert!(Err(err) = result);
    check!(err.transport_kind() == Some(TransportErrorKind::Runtime));
}

#[tokio::test]
async fn test_call_from_spawn_blocking_on_current_thread_runtime() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = quiet_client();
    let base_url = format!("{}/ping", mock_server.uri());
    let response = tokio::task::spawn_blocking(move || client.get(&base_url, &[], &[], 5.0))
        .await
        .expect("blocking task")
        .expect("response");

    check!(response.status() == 200);
    check!(response.text() == Ok("pong"));
}

/// Serve one response whose body stalls halfway for `stall`.
async fn stalling_body_server(stall: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let mut request = [0_u8; 1024];
        let _ = socket.read(&mut request).await;
        let _ = socket
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 10\r\n\r\nhello")
            .await;
        tokio::time::sleep(stall).await;
        let _ = socket.write_all(b"world").await;
    });

    format!("http://{addr}/")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_timeout_covers_body_transfer() {
    let base_url = stalling_body_server(Duration::from_secs(3)).await;

    let started = Instant::now();
    let result = blocking(move || quiet_client().get(&base_url, &[], &[], 0.5)).await;

    let_assert!(Err(err) = result);
    check!(err.is_timeout());
    check!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slow_body_completes_without_timeout() {
    let base_url = stalling_body_server(Duration::from_millis(300)).await;

    let response = blocking(move || quiet_client().get(&base_url, &[], &[], 0.0))
        .await
        .expect("response");

    check!(response.text() == Ok("helloworld"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_repeated_calls_are_identical() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stable"))
        .respond_with(ResponseTemplate::new(200).set_body_string("same every time"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let base_url = format!("{}/stable", mock_server.uri());
    let (first, second) = blocking(move || {
        let client = quiet_client();
        let first = client.get(&base_url, &[("n", "1")], &[], 5.0);
        let second = client.get(&base_url, &[("n", "1")], &[], 5.0);
        (first, second)
    })
    .await;

    let first = first.expect("first");
    let second = second.expect("second");
    check!(first.status() == second.status());
    check!(first.body() == second.body());
    check!(first.final_url() == second.final_url());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_calls_from_threads() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/shared"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(8)
        .mount(&mock_server)
        .await;

    let base_url = format!("{}/shared", mock_server.uri());
    let statuses = blocking(move || {
        let client = quiet_client();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let client = client.clone();
                let base_url = base_url.clone();
                std::thread::spawn(move || {
                    let id = i.to_string();
                    client
                        .get(&base_url, &[("id", id.as_str())], &[], 5.0)
                        .map(|response| response.status())
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("thread"))
            .collect::<Vec<_>>()
    })
    .await;

    for status in statuses {
        check!(status.expect("response") == 200);
    }
}
