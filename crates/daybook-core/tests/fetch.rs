use std::time::Duration;

use serial_test::serial;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use daybook_core::fetch::{visualize_code, CodeFetcher, ErrorSniffing, VISUALIZE_PROMPT};

/// Serve one canned HTTP response and hand back the raw request text.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let read = socket.read(&mut buf).await.expect("read");
            if read == 0 {
                break;
            }
            request.extend_from_slice(&buf[..read]);
        }
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.expect("write");
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&request).into_owned()
    });
    (format!("http://{addr}"), handle)
}

fn fetcher() -> CodeFetcher {
    // Keep any proxy configured in the environment away from the loopback server.
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    std::env::set_var("no_proxy", "127.0.0.1,localhost");
    CodeFetcher::new(Duration::from_secs(5), "daybook-tests/0.1").expect("client")
}

#[tokio::test]
#[serial]
async fn fetch_requests_raw_path_with_custom_user_agent() {
    let (base, server) = serve_once("200 OK", "fn main() {}").await;
    let url = format!("{base}/acme/tool/blob/main/src/main.rs");

    let reply = visualize_code(&fetcher(), &url, ErrorSniffing::Legacy).await;
    assert_eq!(reply, format!("{VISUALIZE_PROMPT}fn main() {{}}"));

    let request = server.await.expect("server");
    assert!(request.starts_with("GET /acme/tool/main/src/main.rs HTTP/1.1"), "{request}");
    assert!(request.to_lowercase().contains("user-agent: daybook-tests/0.1"), "{request}");
}

#[tokio::test]
#[serial]
async fn non_success_status_becomes_error_string() {
    let (base, server) = serve_once("404 Not Found", "missing").await;
    let reply = visualize_code(&fetcher(), &format!("{base}/x/y/blob/main/z.rs"), ErrorSniffing::Legacy).await;
    assert!(reply.starts_with("Error fetching code:"), "{reply}");
    server.await.expect("server");
}

#[tokio::test]
#[serial]
async fn unreachable_host_becomes_error_string() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let reply = visualize_code(&fetcher(), &format!("http://{addr}/a.rs"), ErrorSniffing::FetchResult).await;
    assert!(reply.starts_with("Error fetching code:"), "{reply}");
}

#[tokio::test]
#[serial]
async fn legacy_sniffing_misroutes_source_mentioning_error() {
    let body = "use std::error::Error;\nfn main() {}";
    let (base, server) = serve_once("200 OK", body).await;
    let reply = visualize_code(&fetcher(), &format!("{base}/a/b/blob/main/lib.rs"), ErrorSniffing::Legacy).await;
    // The fetched source is returned bare, as if it were a fetch failure.
    assert_eq!(reply, body);
    server.await.expect("server");
}

#[tokio::test]
#[serial]
async fn fetch_result_sniffing_wraps_source_mentioning_error() {
    let body = "use std::error::Error;\nfn main() {}";
    let (base, server) = serve_once("200 OK", body).await;
    let reply = visualize_code(
        &fetcher(),
        &format!("{base}/a/b/blob/main/lib.rs"),
        ErrorSniffing::FetchResult,
    )
    .await;
    assert_eq!(reply, format!("{VISUALIZE_PROMPT}{body}"));
    server.await.expect("server");
}
