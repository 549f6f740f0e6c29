pub mod config;
pub mod error;
pub mod query;
pub mod types;

pub use config::ClientConfig;
pub use error::{Error, ErrorKind, Result, UrlError};
pub use query::apply_query;
pub use types::{Article, ArticleId, Post};
