use std::sync::Arc;

use async_trait::async_trait;
use ql_core::{Article, ClientConfig, Error, Result, UrlError};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::decode::decode_articles;

#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Fetches the full article list.
    ///
    /// `filter` is part of the signature for callers that want to pass the
    /// current search text along, but implementations return the unfiltered
    /// list; narrowing it down is the job of [`ql_core::apply_query`].
    async fn fetch_articles(&self, filter: Option<&str>) -> Result<Vec<Article>>;
}

#[async_trait]
impl<S: ArticleSource + ?Sized> ArticleSource for Arc<S> {
    async fn fetch_articles(&self, filter: Option<&str>) -> Result<Vec<Article>> {
        (**self).fetch_articles(filter).await
    }
}

/// Fetches articles from the Qiita items endpoint.
#[derive(Debug, Clone)]
pub struct QiitaClient {
    client: Client,
    config: ClientConfig,
}

impl QiitaClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn request(&self) -> Result<Vec<Article>> {
        let url = self.config.request_url()?;
        debug!("📡 GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Url(UrlError::Transport(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Response(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Url(UrlError::Transport(e)))?;
        decode_articles(&body)
    }
}

#[async_trait]
impl ArticleSource for QiitaClient {
    async fn fetch_articles(&self, _filter: Option<&str>) -> Result<Vec<Article>> {
        match self.request().await {
            Ok(articles) => {
                info!("📰 Fetched {} articles", articles.len());
                Ok(articles)
            }
            Err(e) => {
                warn!("⚠️ Failed to fetch articles: {}", e);
                Err(e)
            }
        }
    }
}
