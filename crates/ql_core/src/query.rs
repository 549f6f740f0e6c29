use std::cmp::Ordering;

use crate::types::Article;

/// Filters `articles` by title and sorts the survivors alphabetically.
///
/// Titles are compared case-insensitively first; titles that only differ in
/// case fall back to plain ordinal order. The sort is stable, so entries with
/// the same title keep their input order.
pub fn apply_query(articles: &[Article], filter: Option<&str>) -> Vec<Article> {
    let mut matched: Vec<Article> = articles
        .iter()
        .filter(|article| article.matches(filter))
        .cloned()
        .collect();
    matched.sort_by_cached_key(|article| title_key(article.title()));
    matched
}

/// Ordering used by [`apply_query`].
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    title_key(a).cmp(&title_key(b))
}

fn title_key(title: &str) -> (String, String) {
    (title.to_lowercase(), title.to_string())
}
