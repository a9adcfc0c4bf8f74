use sitewatch::config::DEFAULT_USER_AGENT;
use sitewatch::fetcher::errors::TimeoutPhase;
use sitewatch::fetcher::{FetchError, HttpFetcher, PageFetcher, PageResponse};
use url::Url;
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

const MAX_BODY_BYTES: u64 = 5 * 1024 * 1024;

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(DEFAULT_USER_AGENT, Duration::from_secs(5), MAX_BODY_BYTES).unwrap()
}

async fn get(fetcher: &HttpFetcher, url: &str) -> Result<PageResponse, FetchError> {
    fetcher.fetch(&Url::parse(url).unwrap()).await
}

#[tokio::test]
async fn test_fetch_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(
                    "<html><head><title>Test</title></head><body>Hello World</body></html>"
                        .as_bytes(),
                )
                .insert_header("Content-Type", "text/html; charset=utf-8"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/test", mock_server.uri());
    let result = get(&fetcher(), &url).await.unwrap();

    assert!(result.status.is_success());
    assert!(result.body_utf8.contains("Hello World"));
    assert!(!result.lossy);
    assert_eq!(result.url_final.as_str(), url);
}

#[tokio::test]
async fn test_fetch_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notfound"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let url = format!("{}/notfound", mock_server.uri());
    let result = get(&fetcher(), &url).await;

    match result {
        Err(err @ FetchError::Status(_)) => {
            assert_eq!(err.status(), Some(404));
            assert!(!err.is_transient());
        }
        _ => panic!("Expected HTTP 404 error"),
    }
}

#[tokio::test]
async fn test_fetch_500_retryable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/error"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let url = format!("{}/error", mock_server.uri());
    let err = get(&fetcher(), &url).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_fetch_redirect() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/redirect"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/final"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/final"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes("<html><body>Final page</body></html>".as_bytes())
                .insert_header("Content-Type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/redirect", mock_server.uri());
    let result = get(&fetcher(), &url).await.unwrap();

    assert!(result.body_utf8.contains("Final page"));
    assert!(result.url_final.as_str().ends_with("/final"));
}

#[tokio::test]
async fn test_fetch_gzip_compression() {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    let original_content =
        "<html><head><title>Compressed</title></head><body>This content is gzipped!</body></html>";

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(original_content.as_bytes()).unwrap();
    let compressed_data = encoder.finish().unwrap();

    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gzipped"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(compressed_data)
                .insert_header("Content-Type", "text/html; charset=utf-8")
                .insert_header("Content-Encoding", "gzip"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/gzipped", mock_server.uri());
    let result = get(&fetcher(), &url).await.unwrap();

    assert!(result.body_utf8.contains("This content is gzipped!"));
}

#[tokio::test]
async fn test_non_utf8_body_is_decoded_lossily() {
    let mock_server = MockServer::start().await;

    // Latin-1 "café" declared as such; decoding is forced to UTF-8 anyway.
    Mock::given(method("GET"))
        .and(path("/latin1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"<html><body>caf\xe9 news</body></html>".to_vec())
                .insert_header("Content-Type", "text/html; charset=iso-8859-1"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/latin1", mock_server.uri());
    let result = get(&fetcher(), &url).await.unwrap();

    assert!(result.lossy);
    assert!(result.body_utf8.contains("caf\u{FFFD} news"));
}

#[tokio::test]
async fn test_fetch_unsupported_content_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/image"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0xFF, 0xD8, 0xFF])
                .insert_header("Content-Type", "image/jpeg"),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/image", mock_server.uri());
    let result = get(&fetcher(), &url).await;

    match result {
        Err(FetchError::NotHtml(content_type)) => {
            assert_eq!(content_type, "image/jpeg");
        }
        _ => panic!("Expected NotHtml error"),
    }
}

#[tokio::test]
async fn test_fetch_body_too_large() {
    let mock_server = MockServer::start().await;

    let large_body = "x".repeat(2048);

    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(large_body.as_bytes())
                .insert_header("Content-Type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let small = HttpFetcher::new(DEFAULT_USER_AGENT, Duration::from_secs(5), 1024).unwrap();
    let url = format!("{}/large", mock_server.uri());
    let result = get(&small, &url).await;

    match result {
        Err(FetchError::BodyTooLarge { size, limit }) => {
            assert_eq!(size, 2048);
            assert_eq!(limit, 1024);
        }
        _ => panic!("Expected BodyTooLarge error"),
    }
}

#[tokio::test]
async fn test_fetch_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body>late</body></html>")
                .insert_header("Content-Type", "text/html")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let impatient =
        HttpFetcher::new(DEFAULT_USER_AGENT, Duration::from_millis(200), MAX_BODY_BYTES).unwrap();
    let url = format!("{}/slow", mock_server.uri());
    let err = get(&impatient, &url).await.unwrap_err();

    assert!(
        matches!(err, FetchError::Timeout(TimeoutPhase::Request)),
        "got {:?}",
        err
    );
    assert!(err.is_transient());
    assert_eq!(err.to_string(), "request timeout");
}

#[tokio::test]
async fn test_fetch_connection_refused_is_transient() {
    // Bind then drop a listener so the port is very likely closed
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let url = format!("http://{}/", addr);
    let err = get(&fetcher(), &url).await.unwrap_err();

    assert!(matches!(err, FetchError::Connect(_)), "got {:?}", err);
    assert!(err.is_transient());
    assert_eq!(err.status(), None);
}
