//! Blog feed: one GET of a fixed URL returning a JSON array of posts,
//! plus the pure derived views the blog screens need (filters, featured
//! and recent slices, popularity tallies).

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Where the published feed lives unless the config or CLI says otherwise.
pub const DEFAULT_FEED_URL: &str =
    "https://raw.githubusercontent.com/posterndata/static/main/blog-posts.json";

/// One post as the feed publishes it. Field names on the wire are
/// camelCase; `id` is the lookup key and the only field a post cannot
/// do without. Presentational fields decode to empty defaults and get
/// placeholder text at display time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub read_time: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Post {
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }

    pub fn display_category(&self) -> &str {
        if self.category.is_empty() {
            "Uncategorized"
        } else {
            &self.category
        }
    }

    pub fn display_date(&self) -> &str {
        if self.date.is_empty() {
            "No date"
        } else {
            &self.date
        }
    }

    pub fn display_read_time(&self) -> &str {
        if self.read_time.is_empty() {
            "N/A"
        } else {
            &self.read_time
        }
    }
}

/// The two failures the blog views distinguish. Everything that can go
/// wrong between request and decoded array (connection, non-2xx status,
/// body that is not a post array) collapses into `Unavailable`;
/// `NotFound` is a lookup miss against an already-loaded feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("blog feed unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),
    #[error("post {0} not found")]
    NotFound(u64),
}

/// Fetch the whole feed. No pagination, no auth; the body must be a
/// JSON array of posts or the load fails.
pub async fn fetch_posts(client: &reqwest::Client, url: &str) -> Result<Vec<Post>, FeedError> {
    debug!("fetching blog feed from {}", url);
    let response = client.get(url).send().await?.error_for_status()?;
    let posts: Vec<Post> = response.json().await?;
    info!("blog feed loaded: {} posts", posts.len());
    Ok(posts)
}

/// Resolve a numeric article id against the loaded set.
pub fn find_post(posts: &[Post], id: u64) -> Result<&Post, FeedError> {
    posts
        .iter()
        .find(|post| post.id == id)
        .ok_or(FeedError::NotFound(id))
}

/// Filter selections for the blog list. Both filters are local UI
/// state; the feed itself is never re-fetched to filter it.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    pub category: Option<String>,
    pub tags: Vec<String>,
}

impl Filters {
    /// Select a category, or clear the selection when it is already active.
    pub fn toggle_category(&mut self, category: &str) {
        if self.category.as_deref() == Some(category) {
            self.category = None;
        } else {
            self.category = Some(category.to_string());
        }
    }

    /// Add a tag to the selection, or drop it when already selected.
    pub fn toggle_tag(&mut self, tag: &str) {
        if let Some(pos) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(pos);
        } else {
            self.tags.push(tag.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.tags.is_empty()
    }

    /// A post is listed when it matches the selected category (if any)
    /// and carries every selected tag.
    pub fn matches(&self, post: &Post) -> bool {
        let category_ok = match self.category.as_deref() {
            Some(category) => post.display_category() == category,
            None => true,
        };
        let tags_ok =
            self.tags.is_empty() || self.tags.iter().all(|tag| post.tags.contains(tag));
        category_ok && tags_ok
    }
}

/// The first two posts in feed order, shown with full excerpts.
pub fn featured(posts: &[Post]) -> &[Post] {
    &posts[..posts.len().min(2)]
}

/// Posts three through eight in feed order, shown compact.
pub fn recent(posts: &[Post]) -> &[Post] {
    &posts[posts.len().min(2)..posts.len().min(8)]
}

/// Up to six categories ranked by post count, ties in first-seen order.
pub fn popular_categories(posts: &[Post]) -> Vec<(String, usize)> {
    let mut counts = tally(posts.iter().map(|post| post.display_category()));
    counts.truncate(6);
    counts
}

/// Up to fifteen tag names ranked by use count, ties in first-seen order.
pub fn popular_tags(posts: &[Post]) -> Vec<String> {
    let mut counts = tally(posts.iter().flat_map(|post| post.tags.iter().map(String::as_str)));
    counts.truncate(15);
    counts.into_iter().map(|(tag, _)| tag).collect()
}

fn tally<'a>(names: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for name in names {
        if let Some(entry) = counts.iter_mut().find(|entry| entry.0 == name) {
            entry.1 += 1;
        } else {
            counts.push((name.to_string(), 1));
        }
    }
    // Stable sort keeps first-seen order within equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_posts() -> Vec<Post> {
        serde_json::from_value(json!([
            {
                "id": 1,
                "title": "Rotating proxies 101",
                "image": "https://img.example/1.png",
                "category": "Guides",
                "tags": ["proxies", "basics"],
                "date": "2025-05-02",
                "readTime": "6 min",
                "excerpt": "Where to start.",
                "content": "# Intro\n\nRotate **early**, rotate *often*."
            },
            {
                "id": 2,
                "title": "Price monitoring at scale",
                "image": "",
                "category": "Case Studies",
                "tags": ["pricing", "proxies"],
                "date": "2025-05-10",
                "readTime": "9 min",
                "excerpt": "A retailer's setup."
            },
            {
                "id": 3,
                "title": "Datacenter vs residential",
                "image": "",
                "category": "Guides",
                "tags": ["proxies"],
                "date": "2025-06-01",
                "readTime": "4 min",
                "excerpt": "Choosing a pool."
            }
        ]))
        .unwrap()
    }

    #[test]
    fn decodes_posts_with_absent_presentational_fields() {
        let posts: Vec<Post> = serde_json::from_value(json!([{ "id": 7 }])).unwrap();
        assert_eq!(posts[0].id, 7);
        assert_eq!(posts[0].display_title(), "Untitled");
        assert_eq!(posts[0].display_category(), "Uncategorized");
        assert_eq!(posts[0].display_date(), "No date");
        assert_eq!(posts[0].display_read_time(), "N/A");
        assert!(posts[0].content.is_none());
    }

    #[test]
    fn rejects_a_body_that_is_not_an_array() {
        let err = serde_json::from_value::<Vec<Post>>(json!({ "posts": [] }));
        assert!(err.is_err());
    }

    #[test]
    fn camel_case_read_time_maps_onto_the_field() {
        let posts = sample_posts();
        assert_eq!(posts[0].read_time, "6 min");
    }

    #[test]
    fn lookup_miss_is_not_found() {
        let posts = sample_posts();
        assert_eq!(find_post(&posts, 2).unwrap().title, "Price monitoring at scale");
        assert!(matches!(find_post(&posts, 99), Err(FeedError::NotFound(99))));
    }

    #[test]
    fn category_filter_toggles_and_matches() {
        let posts = sample_posts();
        let mut filters = Filters::default();

        filters.toggle_category("Guides");
        let listed: Vec<u64> = posts
            .iter()
            .filter(|p| filters.matches(p))
            .map(|p| p.id)
            .collect();
        assert_eq!(listed, vec![1, 3]);

        // Selecting the active category clears it.
        filters.toggle_category("Guides");
        assert!(filters.is_empty());
        assert!(posts.iter().all(|p| filters.matches(p)));
    }

    #[test]
    fn every_selected_tag_must_be_present() {
        let posts = sample_posts();
        let mut filters = Filters::default();

        filters.toggle_tag("proxies");
        assert_eq!(posts.iter().filter(|p| filters.matches(p)).count(), 3);

        filters.toggle_tag("pricing");
        let listed: Vec<u64> = posts
            .iter()
            .filter(|p| filters.matches(p))
            .map(|p| p.id)
            .collect();
        assert_eq!(listed, vec![2]);

        filters.toggle_tag("pricing");
        assert_eq!(filters.tags, vec!["proxies".to_string()]);
    }

    #[test]
    fn filters_combine_category_and_tags() {
        let posts = sample_posts();
        let mut filters = Filters::default();
        filters.toggle_category("Guides");
        filters.toggle_tag("basics");
        let listed: Vec<u64> = posts
            .iter()
            .filter(|p| filters.matches(p))
            .map(|p| p.id)
            .collect();
        assert_eq!(listed, vec![1]);
    }

    #[test]
    fn featured_and_recent_slice_feed_order() {
        let posts = sample_posts();
        assert_eq!(featured(&posts).len(), 2);
        assert_eq!(featured(&posts)[0].id, 1);
        assert_eq!(recent(&posts).len(), 1);
        assert_eq!(recent(&posts)[0].id, 3);

        let one = &posts[..1];
        assert_eq!(featured(one).len(), 1);
        assert!(recent(one).is_empty());
    }

    #[test]
    fn popularity_ranks_by_count_with_first_seen_ties() {
        let posts = sample_posts();
        assert_eq!(
            popular_categories(&posts),
            vec![("Guides".to_string(), 2), ("Case Studies".to_string(), 1)]
        );
        assert_eq!(
            popular_tags(&posts),
            vec!["proxies".to_string(), "basics".to_string(), "pricing".to_string()]
        );
    }

    #[test]
    fn popularity_caps_hold() {
        let mut many = Vec::new();
        for i in 0..20 {
            many.push(json!({
                "id": i,
                "category": format!("c{i}"),
                "tags": [format!("t{i}")]
            }));
        }
        let posts: Vec<Post> = serde_json::from_value(serde_json::Value::Array(many)).unwrap();
        assert_eq!(popular_categories(&posts).len(), 6);
        assert_eq!(popular_tags(&posts).len(), 15);
    }
}
