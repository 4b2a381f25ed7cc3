use chrono::{TimeZone, Utc};
use content_curator::{FeedFetcher, FetchConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Example Tech Feed</title>
    <description>News about examples</description>
    <link>https://example.com</link>
    <item>
      <title>First article</title>
      <description>Something happened</description>
      <link>https://example.com/first</link>
      <pubDate>Mon, 24 Aug 2026 09:00:00 GMT</pubDate>
      <category>tech</category>
      <author>jane@example.com</author>
    </item>
    <item>
      <title>Second article</title>
      <description>Something else happened</description>
      <link>https://example.com/second</link>
    </item>
  </channel>
</rss>"#;

#[test]
fn parse_normalizes_entries() {
    let fetcher = FeedFetcher::new(FetchConfig::default());
    let result = fetcher.parse_feed_document("https://example.com/feed", SAMPLE_RSS);

    assert!(result.error.is_none());
    assert_eq!(result.title, "Example Tech Feed");
    assert_eq!(result.description, "News about examples");
    assert_eq!(result.items.len(), 2);

    let first = &result.items[0];
    assert_eq!(first.title, "First article");
    assert_eq!(first.link, "https://example.com/first");
    assert_eq!(
        first.pub_date,
        Utc.with_ymd_and_hms(2026, 8, 24, 9, 0, 0).unwrap()
    );
    assert_eq!(first.category.as_deref(), Some("tech"));

    // No pubDate: the fetch time stands in, so the item is still usable.
    let second = &result.items[1];
    assert_eq!(second.title, "Second article");
    assert!(second.pub_date > Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
}

#[test]
fn parse_caps_item_count() {
    let mut items = String::new();
    for i in 0..60 {
        items.push_str(&format!(
            "<item><title>Item {i}</title><link>https://example.com/{i}</link></item>"
        ));
    }
    let feed = format!(
        r#"<?xml version="1.0"?><rss version="2.0"><channel><title>Big</title><description>Big feed</description>{}</channel></rss>"#,
        items
    );

    let fetcher = FeedFetcher::new(FetchConfig::default());
    let result = fetcher.parse_feed_document("https://example.com/big", &feed);

    assert!(result.error.is_none());
    assert_eq!(result.items.len(), 50);
}

#[test]
fn parse_skips_entries_without_links() {
    let feed = r#"<?xml version="1.0"?><rss version="2.0"><channel><title>Mixed</title><description>Mixed feed</description>
        <item><title>No link here</title></item>
        <item><title>Linked</title><link>https://example.com/ok</link></item>
    </channel></rss>"#;

    let fetcher = FeedFetcher::new(FetchConfig::default());
    let result = fetcher.parse_feed_document("https://example.com/mixed", feed);

    assert_eq!(result.items.len(), 1);
    assert_eq!(result.items[0].link, "https://example.com/ok");
}

#[test]
fn parse_failure_is_carried_in_the_result() {
    let fetcher = FeedFetcher::new(FetchConfig::default());
    let result = fetcher.parse_feed_document("https://example.com/bad", "this is not xml");

    assert_eq!(result.title, "Erreur");
    assert!(result.items.is_empty());
    assert!(result.error.unwrap().contains("Failed to parse feed"));
}

/// Serve one canned HTTP response on a random local port.
async fn serve_once(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;

        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/rss+xml\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
    });

    format!("http://{}/feed", addr)
}

#[tokio::test]
async fn batch_results_stay_positionally_aligned() {
    let _ = tracing_subscriber::fmt().try_init();

    let good_url = serve_once(SAMPLE_RSS).await;
    // Port 9 on localhost: connection refused without any timeout wait.
    let bad_url = "http://127.0.0.1:9/feed".to_string();

    let fetcher = FeedFetcher::new(FetchConfig::default());
    let results = fetcher
        .fetch_multiple_feeds(&[bad_url.clone(), good_url.clone()])
        .await;

    assert_eq!(results.len(), 2);

    assert_eq!(results[0].url, bad_url);
    assert_eq!(results[0].title, "Erreur");
    assert!(results[0].error.is_some());
    assert!(results[0].items.is_empty());

    assert_eq!(results[1].url, good_url);
    assert!(results[1].error.is_none());
    assert_eq!(results[1].items.len(), 2);
}
