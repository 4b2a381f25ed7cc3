use chrono::{Duration, Utc};
use content_curator::catalog::BROKEN_FEED_URLS;
use content_curator::types::*;
use content_curator::Store;
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

fn temp_store_path() -> PathBuf {
    std::env::temp_dir().join(format!("curator-store-test-{}.json", Uuid::new_v4()))
}

fn stored_item(link: &str, pub_date: chrono::DateTime<Utc>) -> StoredFeedItem {
    StoredFeedItem {
        id: Uuid::new_v4(),
        source_id: Uuid::new_v4(),
        source_name: "Test Source".to_string(),
        feed_category: FeedCategoryType::TechNews,
        fetched_at: Utc::now(),
        is_read: false,
        item: FeedItem {
            title: format!("Item {}", link),
            description: "A description".to_string(),
            link: link.to_string(),
            pub_date,
            category: None,
            author: None,
        },
    }
}

#[test]
fn open_seeds_default_sources() {
    let path = temp_store_path();
    let store = Store::open(&path).unwrap();

    assert!(!store.sources().is_empty());
    assert!(store
        .sources()
        .iter()
        .all(|s| !BROKEN_FEED_URLS.contains(&s.url.as_str())));
    assert!(!store.categories().is_empty());

    fs::remove_file(&path).unwrap();
}

#[test]
fn reopen_does_not_duplicate_sources() {
    let path = temp_store_path();
    let first = Store::open(&path).unwrap().sources().len();
    let second = Store::open(&path).unwrap().sources().len();
    assert_eq!(first, second);

    fs::remove_file(&path).unwrap();
}

#[test]
fn add_source_rejects_duplicate_url() {
    let path = temp_store_path();
    let mut store = Store::open(&path).unwrap();

    let source = store
        .add_source(
            "My Feed".to_string(),
            "https://example.com/feed.xml".to_string(),
            SourceType::Rss,
            PostCategory::Tech,
            FeedCategoryType::TechNews,
        )
        .unwrap();
    assert!(source.active);

    let duplicate = store.add_source(
        "Same Feed".to_string(),
        "https://example.com/feed.xml".to_string(),
        SourceType::Rss,
        PostCategory::Tech,
        FeedCategoryType::TechNews,
    );
    assert!(matches!(duplicate, Err(CuratorError::SourceExists { .. })));

    fs::remove_file(&path).unwrap();
}

#[test]
fn toggle_source_flips_active() {
    let path = temp_store_path();
    let mut store = Store::open(&path).unwrap();

    let id = store.sources()[0].id;
    assert!(store.sources()[0].active);

    store.toggle_source(id).unwrap();
    assert!(!store.sources().iter().find(|s| s.id == id).unwrap().active);

    store.toggle_source(id).unwrap();
    assert!(store.sources().iter().find(|s| s.id == id).unwrap().active);

    fs::remove_file(&path).unwrap();
}

#[test]
fn update_source_merges_partial_fields() {
    let path = temp_store_path();
    let mut store = Store::open(&path).unwrap();

    let id = store.sources()[0].id;
    let original_url = store.sources()[0].url.clone();

    store
        .update_source(
            id,
            SourceUpdate {
                name: Some("Renamed".to_string()),
                error_count: Some(2),
                ..Default::default()
            },
        )
        .unwrap();

    let source = store.sources().iter().find(|s| s.id == id).unwrap();
    assert_eq!(source.name, "Renamed");
    assert_eq!(source.error_count, Some(2));
    assert_eq!(source.url, original_url);

    let missing = store.update_source(Uuid::new_v4(), SourceUpdate::default());
    assert!(matches!(missing, Err(CuratorError::SourceNotFound { .. })));

    fs::remove_file(&path).unwrap();
}

#[test]
fn add_feed_items_dedups_by_link() {
    let path = temp_store_path();
    let mut store = Store::open(&path).unwrap();

    let now = Utc::now();
    let added = store
        .add_feed_items(vec![
            stored_item("https://example.com/a", now),
            stored_item("https://example.com/b", now),
        ])
        .unwrap();
    assert_eq!(added, 2);

    // Same links again, different ids: nothing new gets stored.
    let added = store
        .add_feed_items(vec![
            stored_item("https://example.com/a", now),
            stored_item("https://example.com/c", now),
        ])
        .unwrap();
    assert_eq!(added, 1);
    assert_eq!(store.feed_items().len(), 3);

    fs::remove_file(&path).unwrap();
}

#[test]
fn add_feed_items_keeps_newest_thousand() {
    let path = temp_store_path();
    let mut store = Store::open(&path).unwrap();

    let base = Utc::now();
    let items: Vec<StoredFeedItem> = (0..1010)
        .map(|i| {
            stored_item(
                &format!("https://example.com/item-{}", i),
                base + Duration::seconds(i),
            )
        })
        .collect();

    let added = store.add_feed_items(items).unwrap();
    assert_eq!(added, 1010);
    assert_eq!(store.feed_items().len(), 1000);

    // Sorted newest first; the ten oldest items were evicted.
    assert_eq!(store.feed_items()[0].item.link, "https://example.com/item-1009");
    assert!(!store
        .feed_items()
        .iter()
        .any(|i| i.item.link == "https://example.com/item-5"));

    fs::remove_file(&path).unwrap();
}

#[test]
fn clear_old_feed_items_evicts_by_pub_date() {
    let path = temp_store_path();
    let mut store = Store::open(&path).unwrap();

    let now = Utc::now();
    store
        .add_feed_items(vec![
            stored_item("https://example.com/old", now - Duration::days(10)),
            stored_item("https://example.com/fresh", now),
        ])
        .unwrap();

    let removed = store.clear_old_feed_items(7).unwrap();
    assert_eq!(removed, 1);
    assert_eq!(store.feed_items().len(), 1);
    assert_eq!(store.feed_items()[0].item.link, "https://example.com/fresh");

    fs::remove_file(&path).unwrap();
}

#[test]
fn mark_feed_item_read_sets_flag() {
    let path = temp_store_path();
    let mut store = Store::open(&path).unwrap();

    store
        .add_feed_items(vec![stored_item("https://example.com/read-me", Utc::now())])
        .unwrap();
    let id = store.feed_items()[0].id;

    store.mark_feed_item_read(id).unwrap();
    assert!(store.feed_items()[0].is_read);

    fs::remove_file(&path).unwrap();
}

#[test]
fn update_settings_merges_only_given_fields() {
    let path = temp_store_path();
    let mut store = Store::open(&path).unwrap();

    assert_eq!(store.settings().max_posts_per_day, 5);
    assert_eq!(store.settings().language, Language::Fr);

    store
        .update_settings(AppSettingsUpdate {
            max_posts_per_day: Some(10),
            theme: Some(Theme::Dark),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(store.settings().max_posts_per_day, 10);
    assert_eq!(store.settings().theme, Theme::Dark);
    // Untouched fields keep their defaults.
    assert_eq!(store.settings().language, Language::Fr);
    assert!(store.settings().include_hashtags);

    fs::remove_file(&path).unwrap();
}

#[test]
fn import_sources_drops_incomplete_entries() {
    let path = temp_store_path();
    let mut store = Store::open(&path).unwrap();

    let mut sources = store.export_sources();
    sources.truncate(2);
    sources[1].name = String::new();

    store.import_sources(sources).unwrap();
    assert_eq!(store.sources().len(), 1);

    fs::remove_file(&path).unwrap();
}

#[test]
fn stats_reflect_stored_state() {
    let path = temp_store_path();
    let mut store = Store::open(&path).unwrap();

    let source_stats = store.source_stats();
    assert_eq!(source_stats.total, store.sources().len());
    assert_eq!(source_stats.active, store.sources().len());

    let now = Utc::now();
    store
        .add_feed_items(vec![
            stored_item("https://example.com/s1", now),
            stored_item("https://example.com/s2", now - Duration::days(3)),
        ])
        .unwrap();
    let id = store.feed_items()[0].id;
    store.mark_feed_item_read(id).unwrap();

    let item_stats = store.feed_item_stats();
    assert_eq!(item_stats.total, 2);
    assert_eq!(item_stats.unread, 1);
    assert_eq!(item_stats.recent, 1);
    assert_eq!(item_stats.by_category.get("tech-news"), Some(&2));

    fs::remove_file(&path).unwrap();
}
