use chrono::Utc;
use content_curator::extract::{
    extract_hashtags, format_from_analysis, parse_final_response, parse_variations, Engagement,
};
use content_curator::pipeline::{select_top_news, ContentPipeline, MAX_SELECTED};
use content_curator::scoring::rank_news_items;
use content_curator::types::{CuratorError, NewsItem, PostCategory, PostFormat};
use content_curator::MockAgent;
use std::sync::Arc;

fn news(title: &str, description: &str, category: PostCategory) -> NewsItem {
    NewsItem {
        title: title.to_string(),
        description: description.to_string(),
        link: format!("https://example.com/{}", title.to_lowercase().replace(' ', "-")),
        pub_date: Utc::now(),
        category,
    }
}

fn pipeline_with_mocks() -> (ContentPipeline, Arc<MockAgent>, Arc<MockAgent>) {
    let analyzer = Arc::new(MockAgent::new("newsAnalyzer"));
    let creator = Arc::new(MockAgent::new("contentCreator"));
    let pipeline = ContentPipeline::new(analyzer.clone(), creator.clone());
    (pipeline, analyzer, creator)
}

#[tokio::test]
async fn single_post_rejects_empty_input() {
    let (pipeline, analyzer, creator) = pipeline_with_mocks();

    let result = pipeline.generate_single_post(Vec::new()).await;
    assert!(matches!(result, Err(CuratorError::NoNewsItems)));
    assert_eq!(analyzer.call_count(), 0);
    assert_eq!(creator.call_count(), 0);
}

#[tokio::test]
async fn single_post_rejects_low_scoring_news() {
    let (pipeline, analyzer, _creator) = pipeline_with_mocks();

    let items = vec![news("Slow news day", "Nothing to report", PostCategory::Personal)];
    let result = pipeline.generate_single_post(items).await;

    assert!(matches!(result, Err(CuratorError::NoViralNews)));
    // Selection fails before any agent is consulted.
    assert_eq!(analyzer.call_count(), 0);
}

#[tokio::test]
async fn single_post_runs_all_stages() {
    let (pipeline, analyzer, creator) = pipeline_with_mocks();

    analyzer.push_reply("This is controversial and calls for a strong opinion.");
    creator.push_reply(
        "VARIATION 1: AI consolidation is speeding up and nobody is ready #AI #Tech\n\
         VARIATION 2: I did not expect this acquisition so soon #AI\n\
         VARIATION 3: Who actually benefits from this deal? #Tech",
    );
    creator.push_reply(
        "AI consolidation is accelerating, and the rules are written without us #AI #Tech\n\n\
         Alternatives:\n\
         Would you have predicted this acquisition? #AI\n\
         This deal says more about the market than the product #Tech",
    );

    let items = vec![news(
        "Leaked: controversial AI acquisition",
        "An exclusive look at the deal",
        PostCategory::Tech,
    )];
    let bundle = pipeline.generate_single_post(items).await.unwrap();

    assert_eq!(
        bundle.final_post.content,
        "AI consolidation is accelerating, and the rules are written without us #AI #Tech"
    );
    assert_eq!(bundle.final_post.format, PostFormat::HotTake);
    assert_eq!(bundle.final_post.hashtags, vec!["#AI", "#Tech"]);
    assert_eq!(bundle.final_post.category, PostCategory::Tech);
    assert_eq!(bundle.alternatives.len(), 2);
    assert_eq!(
        bundle.alternatives[0].content,
        "Would you have predicted this acquisition? #AI"
    );

    assert_eq!(analyzer.call_count(), 1);
    assert_eq!(creator.call_count(), 2);
}

#[tokio::test]
async fn multi_posts_skip_failing_items() {
    let (pipeline, _analyzer, creator) = pipeline_with_mocks();

    creator.push_reply("Markets move faster than regulators #finance #deals\nExtra commentary line");
    creator.push_error("agent unavailable");

    let items = vec![
        news(
            "Leaked billion dollar acquisition",
            "The sector consolidates",
            PostCategory::Business,
        ),
        news("Layoffs at the plant", "Cuts across the board", PostCategory::Business),
    ];
    let posts = pipeline.generate_multi_posts(items).await.unwrap();

    // The failing second item is skipped, not fatal.
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].source_news.title, "Leaked billion dollar acquisition");
    assert_eq!(posts[0].source_news.viral_score, 6.5);
    assert_eq!(
        posts[0].final_post.content,
        "Markets move faster than regulators #finance #deals"
    );
    assert_eq!(posts[0].final_post.format, PostFormat::Analysis);
    assert_eq!(posts[0].final_post.hashtags, vec!["#finance", "#deals"]);
}

#[tokio::test]
async fn multi_posts_fall_back_to_best_item() {
    let (pipeline, _analyzer, creator) = pipeline_with_mocks();
    creator.push_reply("Even quiet weeks teach something #slowdays");

    // Nothing clears the threshold; the best item is still used.
    let items = vec![news("Slow news day", "Nothing to report", PostCategory::Personal)];
    let posts = pipeline.generate_multi_posts(items).await.unwrap();

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].source_news.viral_score, 5.0);
    assert_eq!(posts[0].final_post.format, PostFormat::Comparison);
}

#[tokio::test]
async fn multi_posts_reject_empty_input() {
    let (pipeline, _analyzer, creator) = pipeline_with_mocks();
    let result = pipeline.generate_multi_posts(Vec::new()).await;
    assert!(matches!(result, Err(CuratorError::NoNewsItems)));
    assert_eq!(creator.call_count(), 0);
}

#[test]
fn selection_caps_and_filters() {
    let ranked = rank_news_items(&[
        news(
            "Leaked: controversial AI acquisition",
            "Exclusive breakthrough, billions involved",
            PostCategory::Tech,
        ),
        news(
            "Leaked billion dollar acquisition",
            "The sector consolidates",
            PostCategory::Business,
        ),
        news("Layoffs at the plant", "Cuts across the board", PostCategory::Business),
        news("Slow news day", "Nothing to report", PostCategory::Personal),
    ]);

    let selected = select_top_news(ranked.clone(), 6.0);
    assert_eq!(selected.len(), 2);
    assert!(selected.iter().all(|n| n.viral_score > 6.0));

    let selected = select_top_news(ranked, 0.0);
    assert_eq!(selected.len(), MAX_SELECTED);
}

#[test]
fn variations_parse_marked_lines() {
    let variations = parse_variations(
        "VARIATION 1: First draft with a hook #one\n\
         VARIATION 2: Second draft, more personal #two\n\
         VARIATION 3: Third draft as a question? #three",
        PostFormat::HotTake,
    );

    assert_eq!(variations.len(), 3);
    assert_eq!(variations[0].content, "First draft with a hook #one");
    assert_eq!(variations[0].estimated_engagement, Engagement::High);
    assert_eq!(variations[1].estimated_engagement, Engagement::Medium);
    assert_eq!(variations[2].tone, "question");
    assert!(variations.iter().all(|v| v.format == PostFormat::HotTake));
}

#[test]
fn variations_fall_back_to_raw_text() {
    let variations = parse_variations("ok", PostFormat::Question);
    assert_eq!(variations.len(), 1);
    assert_eq!(variations[0].content, "ok");
    assert_eq!(variations[0].estimated_engagement, Engagement::High);
}

#[test]
fn final_response_uses_placeholder_alternatives() {
    let (content, alternatives) = parse_final_response("Just the polished post #done");
    assert_eq!(content, "Just the polished post #done");
    assert_eq!(alternatives.len(), 2);
    assert_eq!(alternatives[0].content, "Alternative 1");
    assert_eq!(alternatives[1].content, "Alternative 2");
}

#[test]
fn hashtag_extraction_is_capped() {
    let tags = extract_hashtags("a #one b #two c #three d #four", 3);
    assert_eq!(tags, vec!["#one", "#two", "#three"]);
    assert!(extract_hashtags("no tags here", 3).is_empty());
}

#[test]
fn analysis_keywords_pick_format() {
    assert_eq!(format_from_analysis("a controversial take"), PostFormat::HotTake);
    assert_eq!(format_from_analysis("ask why this happened"), PostFormat::Question);
    assert_eq!(format_from_analysis("share a personal story"), PostFormat::MiniStory);
    assert_eq!(format_from_analysis("the implications are wide"), PostFormat::Analysis);
    assert_eq!(format_from_analysis("compare it with last year"), PostFormat::Comparison);
    assert_eq!(format_from_analysis("nothing matches"), PostFormat::HotTake);
}
