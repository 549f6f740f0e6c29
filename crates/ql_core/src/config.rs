use std::time::Duration;

use url::Url;

use crate::Result;

pub const DEFAULT_BASE_URL: &str = "https://qiita.com";
pub const DEFAULT_ENDPOINT: &str = "/api/v2/items";
pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Where and how to fetch the article list.
///
/// Built once and handed by reference to whichever client needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub endpoint: String,
    pub page: u32,
    pub per_page: u32,
    /// `None` leaves the transport's default in place.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_page(mut self, page: u32, per_page: u32) -> Self {
        self.page = page;
        self.per_page = per_page;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full request URL, including the `page` and `per_page` query.
    pub fn request_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?.join(&self.endpoint)?;
        url.query_pairs_mut()
            .append_pair("page", &self.page.to_string())
            .append_pair("per_page", &self.per_page.to_string());
        Ok(url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            timeout: None,
            user_agent: format!("ql/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
