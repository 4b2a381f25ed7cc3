//! Built-in source catalog: the predefined feed categories offered to the
//! user and the mapping from feed categories to post categories. This is
//! configuration data, consumed by the store for default seeding and by the
//! service for category filtering.

use crate::types::{FeedCategoryType, PostCategory, SourceType};
use serde::{Deserialize, Serialize};

/// One feed definition inside a catalog category. Becomes a full `Source`
/// when added to the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFeed {
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub source_type: SourceType,
    pub category: PostCategory,
    pub feed_category: FeedCategoryType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedCategory {
    pub id: FeedCategoryType,
    pub name: String,
    pub description: String,
    pub feeds: Vec<CatalogFeed>,
}

/// Maps a source's feed category to the coarse post category used when
/// routing stored items into the generation pipeline.
pub fn feed_to_post_category(feed_category: FeedCategoryType) -> PostCategory {
    match feed_category {
        FeedCategoryType::TechNews => PostCategory::Tech,
        FeedCategoryType::Startup => PostCategory::Business,
        FeedCategoryType::Engineering => PostCategory::Tech,
        FeedCategoryType::AiMl => PostCategory::Tech,
        FeedCategoryType::DesignUx => PostCategory::Tech,
        FeedCategoryType::Marketing => PostCategory::Business,
        FeedCategoryType::Learning => PostCategory::Personal,
        FeedCategoryType::Science => PostCategory::Tech,
    }
}

/// Feed URLs that consistently failed during feed testing. Sources pointing
/// at them are removed when the store opens.
pub const BROKEN_FEED_URLS: &[&str] = &[
    "https://feeds.slashgear.com/slashgear",
    "https://firstround.com/review/feed.xml",
    "https://bothsidesofthetable.com/feed",
    "https://www.uber.com/blog/engineering/rss/",
    "https://openai.com/blog/rss/",
    "https://ai.googleblog.com/feeds/posts/default",
    "https://airbnb.design/feed/",
    "https://contentmarketinginstitute.com/feed/",
    "https://www.socialmediaexaminer.com/feed/",
    "https://thedecisionlab.com/feed/",
    "https://www.scotthyoung.com/feed/",
];

fn feed(
    name: &str,
    url: &str,
    category: PostCategory,
    feed_category: FeedCategoryType,
) -> CatalogFeed {
    CatalogFeed {
        name: name.to_string(),
        url: url.to_string(),
        source_type: SourceType::Rss,
        category,
        feed_category,
    }
}

/// The default category catalog shipped with the application.
pub fn default_categories() -> Vec<FeedCategory> {
    use FeedCategoryType::*;
    use PostCategory::*;

    vec![
        FeedCategory {
            id: TechNews,
            name: "Tech News".to_string(),
            description: "Technology and innovation news".to_string(),
            feeds: vec![
                feed("TechCrunch", "https://techcrunch.com/feed/", Tech, TechNews),
                feed("The Verge", "https://www.theverge.com/rss/index.xml", Tech, TechNews),
                feed("VentureBeat", "https://venturebeat.com/feed/", Tech, TechNews),
                feed("Engadget", "https://www.engadget.com/rss.xml", Tech, TechNews),
            ],
        },
        FeedCategory {
            id: Startup,
            name: "Startup & Entrepreneurship".to_string(),
            description: "Startup, entrepreneurship and business news".to_string(),
            feeds: vec![
                feed("Hacker News", "https://news.ycombinator.com/rss", Business, Startup),
                feed(
                    "TechCrunch Startups",
                    "https://techcrunch.com/startups/feed/",
                    Business,
                    Startup,
                ),
                feed("Steve Blank", "https://steveblank.com/feed/", Business, Startup),
                feed("Andrew Chen", "https://andrewchen.co/feed/", Business, Startup),
            ],
        },
        FeedCategory {
            id: Engineering,
            name: "Engineering & Dev".to_string(),
            description: "Engineering and development blogs".to_string(),
            feeds: vec![
                feed(
                    "The Pragmatic Engineer",
                    "https://blog.pragmaticengineer.com/rss/",
                    Tech,
                    Engineering,
                ),
                feed(
                    "GitHub Engineering",
                    "https://githubengineering.com/atom.xml",
                    Tech,
                    Engineering,
                ),
                feed(
                    "Spotify Engineering",
                    "https://engineering.atspotify.com/feed/",
                    Tech,
                    Engineering,
                ),
                feed("Meta Engineering", "https://engineering.fb.com/feed/", Tech, Engineering),
                feed(
                    "Airbnb Engineering",
                    "https://medium.com/feed/airbnb-engineering",
                    Tech,
                    Engineering,
                ),
                feed("Stripe Engineering", "https://stripe.com/blog/feed.rss", Tech, Engineering),
            ],
        },
        FeedCategory {
            id: AiMl,
            name: "AI & Machine Learning".to_string(),
            description: "Artificial intelligence and machine learning".to_string(),
            feeds: vec![
                feed("DeepMind", "https://deepmind.com/blog/feed/basic/", Tech, AiMl),
                feed(
                    "The Berkeley AI Research Blog",
                    "https://bair.berkeley.edu/blog/feed.xml",
                    Tech,
                    AiMl,
                ),
                feed("ML@CMU", "https://blog.ml.cmu.edu/feed/", Tech, AiMl),
                feed("Towards Data Science", "https://towardsdatascience.com/feed", Tech, AiMl),
                feed("Distill", "https://distill.pub/rss.xml", Tech, AiMl),
            ],
        },
        FeedCategory {
            id: DesignUx,
            name: "Design & UX".to_string(),
            description: "Design, UX and user interfaces".to_string(),
            feeds: vec![
                feed("UX Planet", "https://uxplanet.org/feed", Tech, DesignUx),
                feed(
                    "Nielsen Norman Group",
                    "https://www.nngroup.com/feed/rss/",
                    Tech,
                    DesignUx,
                ),
                feed("UX Collective", "https://uxdesign.cc/feed", Tech, DesignUx),
                feed(
                    "Smashing Magazine",
                    "https://www.smashingmagazine.com/feed/",
                    Tech,
                    DesignUx,
                ),
                feed("CSS-Tricks", "https://css-tricks.com/feed/", Tech, DesignUx),
            ],
        },
        FeedCategory {
            id: Marketing,
            name: "Marketing & Growth".to_string(),
            description: "Digital marketing and growth strategies".to_string(),
            feeds: vec![
                feed("Seth Godin", "https://seths.blog/feed/", Business, Marketing),
                feed(
                    "HubSpot Marketing",
                    "https://blog.hubspot.com/marketing/rss.xml",
                    Business,
                    Marketing,
                ),
                feed("Moz Blog", "https://moz.com/blog/feed", Business, Marketing),
            ],
        },
        FeedCategory {
            id: Learning,
            name: "Learning & Personal Growth".to_string(),
            description: "Learning, productivity and personal development".to_string(),
            feeds: vec![
                feed("Farnam Street", "https://fs.blog/feed/", Personal, Learning),
                feed("Ness Labs", "https://nesslabs.com/feed", Personal, Learning),
                feed("Big Think", "https://bigthink.com/feed/", Personal, Learning),
            ],
        },
        FeedCategory {
            id: Science,
            name: "Science & Innovation".to_string(),
            description: "Science, research and innovation".to_string(),
            feeds: vec![
                feed("Quanta Magazine", "https://www.quantamagazine.org/feed/", Tech, Science),
                feed("MIT News", "https://news.mit.edu/rss/research", Tech, Science),
                feed("Nature News", "https://www.nature.com/nature.rss", Tech, Science),
                feed("ScienceAlert", "https://www.sciencealert.com/rss", Tech, Science),
                feed("Singularity Hub", "https://singularityhub.com/feed/", Tech, Science),
            ],
        },
    ]
}
