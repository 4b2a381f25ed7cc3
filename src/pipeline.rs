//! Content-generation pipeline: sequences of typed stages around LLM agent
//! calls. Two shapes exist: the single-best pipeline (select, analyze,
//! draft variations, finalize) and the multi-post pipeline (select, then one
//! generation per selected item). Article and raw-text modes bypass the
//! scorer and fan out three agent calls per request.

use crate::agent::{Agent, AgentMessage};
use crate::extract::{self, Engagement};
use crate::scoring;
use crate::types::{
    CuratorError, GeneratedPost, GeneratedPostEntry, NewsItem, PostBundle, PostFormat,
    RankedNewsItem, Result, ScrapedArticle, SourceNewsRef,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Minimum viral score for the single-best pipeline (strictly greater).
pub const SINGLE_POST_THRESHOLD: f64 = 6.0;

/// Minimum viral score for the multi-post pipeline (strictly greater).
pub const MULTI_POST_THRESHOLD: f64 = 5.0;

/// Maximum number of candidates retained by either selection stage.
pub const MAX_SELECTED: usize = 3;

/// Keep ranked items above `threshold`, at most `MAX_SELECTED`. Input must
/// already be sorted descending by score.
pub fn select_top_news(ranked: Vec<RankedNewsItem>, threshold: f64) -> Vec<RankedNewsItem> {
    ranked
        .into_iter()
        .filter(|news| news.viral_score > threshold)
        .take(MAX_SELECTED)
        .collect()
}

pub struct ContentPipeline {
    analyzer: Arc<dyn Agent>,
    creator: Arc<dyn Agent>,
}

impl ContentPipeline {
    pub fn new(analyzer: Arc<dyn Agent>, creator: Arc<dyn Agent>) -> Self {
        Self { analyzer, creator }
    }

    /// Single-best pipeline: pick the strongest news item and turn it into
    /// one polished post plus two alternatives. Any failed stage aborts the
    /// run; there is no partial result.
    pub async fn generate_single_post(&self, news_items: Vec<NewsItem>) -> Result<PostBundle> {
        if news_items.is_empty() {
            return Err(CuratorError::NoNewsItems);
        }

        let ranked = scoring::rank_news_items(&news_items);
        let top = select_top_news(ranked, SINGLE_POST_THRESHOLD);
        let best = top.into_iter().next().ok_or(CuratorError::NoViralNews)?;

        info!(
            "Selected news for single-post generation: {} (score {:.1})",
            best.news.title, best.viral_score
        );

        // Deep analysis of the top item, hints included.
        let analysis_prompt = format!(
            "Analyze this news item:\n\
             Title: {}\n\
             Description: {}\n\n\
             Suggested engagement angle: {}\n\
             Possible hot take: {}\n\n\
             Give me:\n\
             1. A deep analysis of the engagement potential\n\
             2. The best suited post format (hot-take, question, mini-story, analysis, comparison)\n\
             3. The key elements to highlight",
            best.news.title, best.news.description, best.engagement_angle, best.suggested_hot_take
        );
        let analysis = self
            .analyzer
            .generate(&[AgentMessage::user(analysis_prompt)])
            .await?;
        let recommended_format = extract::format_from_analysis(&analysis.text);
        debug!("Recommended format: {}", recommended_format);

        // Draft three styled variations.
        let variations_prompt = format!(
            "Write 3 variations of an X/Twitter post about this news item:\n\n\
             TITLE: {}\n\
             DESCRIPTION: {}\n\
             RECOMMENDED FORMAT: {}\n\
             ANALYSIS: {}\n\n\
             For each variation:\n\
             1. Use a different style (direct, anecdote, question)\n\
             2. Stay under 280 characters\n\
             3. Add 2-3 hashtags\n\
             4. Make it sound natural and human\n\n\
             Reply format:\n\
             VARIATION 1: [post]\n\
             VARIATION 2: [post]\n\
             VARIATION 3: [post]",
            best.news.title, best.news.description, recommended_format, analysis.text
        );
        let drafts = self
            .creator
            .generate(&[AgentMessage::user(variations_prompt)])
            .await?;
        let variations = extract::parse_variations(&drafts.text, recommended_format);

        // parse_variations always yields at least one draft.
        let best_variation = variations
            .iter()
            .find(|v| v.estimated_engagement == Engagement::High)
            .or_else(|| variations.first())
            .cloned()
            .ok_or_else(|| CuratorError::General("no variation produced".to_string()))?;

        // Final polish plus two alternatives.
        let finalize_prompt = format!(
            "Here is a draft post about this news item:\n\
             {}\n\n\
             Current draft:\n\
             {}\n\n\
             Format: {}\n\
             Tone: {}\n\n\
             Improve this post by:\n\
             1. Making it more personal and authentic\n\
             2. Adjusting it to maximize engagement\n\
             3. Keeping it under 280 characters\n\
             4. Keeping the format while sharpening the impact\n\n\
             Also give me 2 alternatives in different styles.",
            best.news.title, best_variation.content, best_variation.format, best_variation.tone
        );
        let polished = self
            .creator
            .generate(&[AgentMessage::user(finalize_prompt)])
            .await?;
        let (final_content, alternatives) = extract::parse_final_response(&polished.text);

        Ok(PostBundle {
            final_post: GeneratedPost {
                content: final_content,
                format: best_variation.format,
                hashtags: best_variation.hashtags,
                source_url: best.news.link,
                category: best.news.category,
            },
            alternatives,
        })
    }

    /// Multi-post pipeline: one generated post per selected item, produced
    /// sequentially so working-memory updates stay ordered. A failing item
    /// is logged and skipped; the batch continues.
    pub async fn generate_multi_posts(
        &self,
        news_items: Vec<NewsItem>,
    ) -> Result<Vec<GeneratedPostEntry>> {
        if news_items.is_empty() {
            return Err(CuratorError::NoNewsItems);
        }

        let ranked = scoring::rank_news_items(&news_items);
        let mut selected = select_top_news(ranked.clone(), MULTI_POST_THRESHOLD);
        if selected.is_empty() {
            // Nothing cleared the threshold; keep at least the best item.
            selected = ranked.into_iter().take(1).collect();
        }

        info!("Generating content for {} selected news items", selected.len());

        let mut generated = Vec::new();
        for news in selected {
            match self.generate_one_post(&news).await {
                Ok(post) => {
                    self.spawn_memory_update(&post, &news);
                    generated.push(GeneratedPostEntry {
                        final_post: post,
                        source_news: SourceNewsRef {
                            title: news.news.title.clone(),
                            viral_score: news.viral_score,
                        },
                    });
                }
                Err(e) => {
                    error!("Generation failed for {}: {}", news.news.title, e);
                }
            }
        }

        Ok(generated)
    }

    async fn generate_one_post(&self, news: &RankedNewsItem) -> Result<GeneratedPost> {
        let prompt = format!(
            "Write a natural, authentic X/Twitter post about this news item:\n\n\
             TITLE: {}\n\
             DESCRIPTION: {}\n\
             CATEGORY: {}\n\n\
             CONTEXT FOR INSPIRATION:\n\
             - Suggested engagement angle: {}\n\
             - Emotional approach: {}\n\
             - Possible hot take: {}\n\
             - Viral score: {:.1}/10\n\n\
             GUIDELINES:\n\
             - Write as if you just discovered this news and are sharing it naturally\n\
             - Vary your style: sometimes direct, sometimes an anecdote, sometimes a question\n\
             - Use your own vocabulary, not canned phrases\n\
             - Stay under 280 characters\n\
             - Add 2-3 relevant hashtags at the end\n\
             - Make sure it reads like a real human, not an AI",
            news.news.title,
            news.news.description,
            news.news.category,
            news.engagement_angle,
            news.emotional_approach,
            news.suggested_hot_take,
            news.viral_score
        );

        let reply = self.creator.generate(&[AgentMessage::user(prompt)]).await?;

        let content = extract::first_line(&reply.text);
        let hashtags = extract::extract_hashtags(&content, 3);
        let format = scoring::format_from_score(news.viral_score);

        Ok(GeneratedPost {
            content,
            format,
            hashtags,
            source_url: news.news.link.clone(),
            category: news.news.category,
        })
    }

    /// Ask the creator agent to note the new post in its working memory of
    /// recent posts. Fire-and-forget: a failure is logged and never joins
    /// the generation result.
    fn spawn_memory_update(&self, post: &GeneratedPost, news: &RankedNewsItem) {
        let subject = news
            .news
            .title
            .split(':')
            .next()
            .and_then(|s| s.split('-').next())
            .unwrap_or(&news.news.title)
            .trim()
            .to_string();

        let lower = post.content.to_lowercase();
        let style = if lower.contains('?') || lower.contains("question") {
            "question"
        } else if lower.contains("yesterday") || lower.contains("reminds me") {
            "anecdote"
        } else {
            "direct"
        };

        let mut opening = extract::truncate_chars(&post.content, 30);
        if post.content.chars().count() > 30 {
            opening.push_str("...");
        }

        let prompt = format!(
            "Update your history of recent posts in your working memory with this new post \
             you just created:\n\n\
             NEW POST:\n\
             - Subject: {}\n\
             - Style: {}\n\
             - Format: {}\n\
             - Opening: \"{}\"\n\n\
             Instructions:\n\
             1. Shift every existing post down one rank\n\
             2. Add this one as the most recent post\n\
             3. Drop the oldest entry\n\
             4. Keep the same template\n\n\
             Reply with nothing but the memory update.",
            subject, style, post.format, opening
        );

        let creator = Arc::clone(&self.creator);
        tokio::spawn(async move {
            match creator.generate(&[AgentMessage::user(prompt)]).await {
                Ok(_) => debug!("Working memory updated for subject: {}", subject),
                Err(e) => warn!("Working memory update failed (ignored): {}", e),
            }
        });
    }

    /// Generate three posts from a scraped article, one per angle, with all
    /// three agent calls in flight together.
    pub async fn generate_from_article(
        &self,
        article: &ScrapedArticle,
        url: &str,
    ) -> Result<Vec<PostBundle>> {
        if article.content.is_empty() || article.content == crate::scraper::CONTENT_PLACEHOLDER {
            return Err(CuratorError::EmptyArticle {
                url: url.to_string(),
            });
        }

        let source = format!("Title: {}\n\nContent: {}", article.title, article.content);
        self.generate_three_angles(&source, url).await
    }

    /// Generate three posts from raw text pasted by the user.
    pub async fn generate_from_text(&self, text: &str) -> Result<Vec<PostBundle>> {
        if text.trim().is_empty() {
            return Err(CuratorError::General("No text provided".to_string()));
        }
        self.generate_three_angles(text, "#").await
    }

    async fn generate_three_angles(&self, source: &str, source_url: &str) -> Result<Vec<PostBundle>> {
        let angles = [
            ("a direct opinion angle", PostFormat::HotTake),
            ("a question angle to drive engagement", PostFormat::Question),
            ("a personal reaction angle", PostFormat::MiniStory),
        ];

        let prompt = |angle: &str| {
            vec![AgentMessage::user(format!(
                "Write an engaging tweet based on this content ({}):\n\n{}",
                angle, source
            ))]
        };

        let first_prompt = prompt(angles[0].0);
        let second_prompt = prompt(angles[1].0);
        let third_prompt = prompt(angles[2].0);
        let (first, second, third) = futures::try_join!(
            self.creator.generate(&first_prompt),
            self.creator.generate(&second_prompt),
            self.creator.generate(&third_prompt),
        )?;

        let bundles = [first, second, third]
            .into_iter()
            .zip(angles)
            .map(|(reply, (_, format))| PostBundle {
                final_post: GeneratedPost {
                    content: reply.text.trim().to_string(),
                    format,
                    // The agent embeds hashtags in the content for these modes.
                    hashtags: Vec::new(),
                    source_url: source_url.to_string(),
                    category: crate::types::PostCategory::Tech,
                },
                alternatives: Vec::new(),
            })
            .collect();

        Ok(bundles)
    }
}
