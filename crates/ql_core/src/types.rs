use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One element of the items endpoint's response, as sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Post {
    pub rendered_body: String,
    pub body: String,
    pub created_at: String,
    pub id: String,
    pub likes_count: i64,
    pub title: String,
    pub url: String,
}

/// Surrogate key of an [`Article`].
///
/// Generated when the article is built and never derived from its content, so
/// two entries with the same title and URL remain distinct in a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ArticleId(Uuid);

impl ArticleId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A display-ready entry of the article list.
///
/// Equality and hashing only look at [`Article::id`].
#[derive(Debug, Clone, Serialize)]
pub struct Article {
    id: ArticleId,
    title: String,
    url: String,
}

impl Article {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: ArticleId::generate(),
            title: title.into(),
            url: url.into(),
        }
    }

    pub fn id(&self) -> ArticleId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns true if the title contains `filter`, ignoring case.
    ///
    /// A missing or empty filter matches every article.
    pub fn matches(&self, filter: Option<&str>) -> bool {
        match filter {
            None => true,
            Some(filter) if filter.is_empty() => true,
            Some(filter) => self.title.to_lowercase().contains(&filter.to_lowercase()),
        }
    }
}

impl From<Post> for Article {
    fn from(post: Post) -> Self {
        Article::new(post.title, post.url)
    }
}

impl PartialEq for Article {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Article {}

impl Hash for Article {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
