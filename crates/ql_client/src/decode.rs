use ql_core::{Article, Post, Result};

/// Parses a JSON array of posts.
///
/// Fails on the first element that does not match [`Post`]; nothing is
/// returned in that case.
pub fn decode_posts(bytes: &[u8]) -> Result<Vec<Post>> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Decodes a response body straight into articles, one per post.
pub fn decode_articles(bytes: &[u8]) -> Result<Vec<Article>> {
    let posts = decode_posts(bytes)?;
    Ok(posts.into_iter().map(Article::from).collect())
}
