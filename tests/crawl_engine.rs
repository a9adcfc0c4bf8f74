use chrono::NaiveDate;
use sitewatch::config::DEFAULT_USER_AGENT;
use sitewatch::crawl::{CrawlEngine, CrawlRequest, CrawlStatus, DebugEvent};
use sitewatch::fetcher::HttpFetcher;
use sitewatch::sentiment::{SentimentLabel, analyzer_for, SentimentMethod};
use std::sync::Arc;
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_raw(format!("<html><body>{}</body></html>", body), "text/html; charset=utf-8")
}

async fn page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

fn engine(fetch_timeout: Duration) -> CrawlEngine {
    let fetcher = HttpFetcher::new(DEFAULT_USER_AGENT, fetch_timeout, 5 * 1024 * 1024).unwrap();
    CrawlEngine::new(Arc::new(fetcher))
}

fn request(server: &MockServer, keywords: &[&str]) -> sitewatch::crawl::CrawlRequestBuilder {
    CrawlRequest::builder(format!("{}/", server.uri()), keywords.iter().copied())
}

#[tokio::test]
async fn test_max_pages_one_fetches_only_seed() {
    let server = MockServer::start().await;
    page(
        &server,
        "/",
        r#"<a href="/1">1</a><a href="/2">2</a><a href="/3">3</a><a href="/4">4</a><a href="/5">5</a>"#,
    )
    .await;

    let request = request(&server, &["alpha"]).max_pages(1).build().unwrap();
    let state = engine(Duration::from_secs(5)).crawl(&request).await;

    assert_eq!(state.status(), CrawlStatus::Exhausted);
    assert_eq!(state.pages_visited(), 1);
    assert_eq!(state.debug_rows().len(), 1);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_fetch_timeout_is_recorded_and_crawl_moves_on() {
    let server = MockServer::start().await;
    page(&server, "/", r#"<a href="/slow">slow</a><a href="/ok">ok</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("alpha, but too late").set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;
    page(&server, "/ok", "<article>alpha arrives on time today</article>").await;

    let request = request(&server, &["alpha"]).build().unwrap();
    let state = engine(Duration::from_millis(300)).crawl(&request).await;

    assert_eq!(state.status(), CrawlStatus::Completed);
    let slow = state
        .debug_rows()
        .iter()
        .find(|row| row.url.ends_with("/slow"))
        .unwrap();
    assert_eq!(
        slow.event,
        DebugEvent::FetchFailed {
            reason: "request timeout".to_string(),
            status: None,
            retriable: true,
        }
    );
    assert_eq!(state.matches().len(), 1);
    assert!(state.matches()[0].url().as_str().ends_with("/ok"));
}

#[tokio::test]
async fn test_out_of_range_date_is_excluded_but_audited() {
    let server = MockServer::start().await;
    page(&server, "/", r#"<a href="/old">old</a><a href="/fresh">fresh</a>"#).await;
    page(
        &server,
        "/old",
        r#"<time datetime="2020-05-04">4 May 2020</time><article>alpha budget approved years ago</article>"#,
    )
    .await;
    page(
        &server,
        "/fresh",
        "<article>Published 2024-01-10. alpha budget approved this week</article>",
    )
    .await;

    let request = request(&server, &["Alpha", "budget"])
        .logic(sitewatch::matcher::MatchLogic::And)
        .date_from(NaiveDate::from_ymd_opt(2024, 1, 1))
        .date_to(NaiveDate::from_ymd_opt(2024, 1, 31))
        .build()
        .unwrap();
    let state = engine(Duration::from_secs(5)).crawl(&request).await;

    assert_eq!(state.matches().len(), 1);
    let fresh = &state.matches()[0];
    assert!(fresh.url().as_str().ends_with("/fresh"));
    assert_eq!(fresh.date().unwrap().date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    assert!(fresh.content().unwrap().contains("approved this week"));

    let old = state
        .debug_rows()
        .iter()
        .find(|row| row.url.ends_with("/old"))
        .unwrap();
    assert!(old.keyword_found);
    assert_eq!(old.raw_date.as_deref(), Some("2020-05-04"));
}

#[tokio::test]
async fn test_each_page_fetched_once_in_breadth_first_order() {
    let server = MockServer::start().await;
    page(&server, "/", r#"<a href="/a">a</a><a href="/b">b</a>"#).await;
    page(&server, "/a", r#"<a href="/c">c</a><a href="/b">b</a><a href="/">home</a>"#).await;
    page(&server, "/b", r#"<a href="/a#top">a</a><a href="/d">d</a>"#).await;
    page(&server, "/c", r#"<a href="/d">d</a>"#).await;
    page(&server, "/d", r#"<a href="/">home</a>"#).await;

    let request = request(&server, &["nothing"]).build().unwrap();
    let state = engine(Duration::from_secs(5)).crawl(&request).await;

    assert_eq!(state.status(), CrawlStatus::Completed);
    let paths: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(paths, vec!["/", "/a", "/b", "/c", "/d"]);
    assert_eq!(state.pages_visited(), 5);
}

#[tokio::test]
async fn test_matches_carry_sentiment() {
    let server = MockServer::start().await;
    page(
        &server,
        "/",
        "<article>Alpha reported excellent results and strong growth. Investors are very happy.</article>",
    )
    .await;

    let request = request(&server, &["alpha"]).build().unwrap();
    let state = engine(Duration::from_secs(5))
        .with_sentiment(analyzer_for(SentimentMethod::Vader))
        .crawl(&request)
        .await;

    let sentiment = state.matches()[0].sentiment().unwrap();
    assert_eq!(sentiment.label, SentimentLabel::Positive);
    assert_eq!(sentiment.method, SentimentMethod::Vader);
    assert!(sentiment.error.is_none());
}
