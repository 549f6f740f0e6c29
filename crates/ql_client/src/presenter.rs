//! Presentation state for the article list.
//!
//! [`Presenter`] sits between an [`ArticleSource`] and a [`View`]. It owns the
//! loading state (published on a watch channel), the last fetched list and
//! the filter currently applied to it.
//!
//! Every fetch is tagged with a sequence number. When a fetch settles it is
//! only applied if no newer fetch has started since, so a slow response can
//! never overwrite a more recent one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ql_core::{apply_query, Article, Error, ErrorKind, Result};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::source::ArticleSource;

/// Receives what the presenter wants shown.
///
/// Calls are made with the presenter's list unlocked, so a view may read
/// [`Presenter::visible`], [`Presenter::state`] or [`Presenter::filter`].
/// Deliveries are serialized; a view must not start a search or call
/// [`Presenter::apply_filter`] from inside a callback.
pub trait View: Send + Sync {
    /// Replaces the displayed list.
    fn render(&self, articles: &[Article]);

    /// Shows a blocking error message. The displayed list stays as it was.
    fn present_error(&self, error: &Error);
}

impl<V: View + ?Sized> View for Arc<V> {
    fn render(&self, articles: &[Article]) {
        (**self).render(articles)
    }

    fn present_error(&self, error: &Error) {
        (**self).present_error(error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Fetching,
}

/// How a fetch ended, from the presenter's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The list was replaced. `shown` articles passed the filter out of `total`.
    Rendered { shown: usize, total: usize },
    /// The error was handed to the view.
    Failed(ErrorKind),
    /// A newer fetch was started before this one finished.
    Discarded,
}

#[derive(Debug)]
struct ListState {
    state: FetchState,
    latest: u64,
    articles: Vec<Article>,
    visible: Vec<Article>,
    filter: Option<String>,
}

struct Inner<S, V> {
    source: S,
    view: V,
    list: Mutex<ListState>,
    // Held while the view is called so deliveries never interleave.
    delivery: Mutex<()>,
    fetching: watch::Sender<bool>,
}

impl<S, V> Inner<S, V>
where
    S: ArticleSource,
    V: View,
{
    fn lock(&self) -> MutexGuard<'_, ListState> {
        self.list.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn deliver(&self) -> MutexGuard<'_, ()> {
        self.delivery.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) -> u64 {
        let mut list = self.lock();
        list.latest += 1;
        list.state = FetchState::Fetching;
        self.fetching.send_replace(true);
        list.latest
    }

    fn settle(&self, token: u64, filter: Option<String>, result: Result<Vec<Article>>) -> Settlement {
        let _delivery = self.deliver();
        let outcome = {
            let mut list = self.lock();
            if token != list.latest {
                debug!("Discarding result of fetch #{} (latest is #{})", token, list.latest);
                return Settlement::Discarded;
            }
            result.map(|articles| {
                list.articles = articles;
                list.filter = filter;
                list.visible = apply_query(&list.articles, list.filter.as_deref());
                (list.visible.clone(), list.articles.len())
            })
        };

        let settlement = match outcome {
            Ok((visible, total)) => {
                self.view.render(&visible);
                Settlement::Rendered {
                    shown: visible.len(),
                    total,
                }
            }
            Err(e) => {
                warn!("Fetch #{} failed: {}", token, e);
                self.view.present_error(&e);
                Settlement::Failed(e.kind())
            }
        };

        self.finish(token);
        settlement
    }

    /// Returns to idle unless a newer fetch started meanwhile.
    fn finish(&self, token: u64) {
        let mut list = self.lock();
        if token == list.latest {
            list.state = FetchState::Idle;
            self.fetching.send_replace(false);
        }
    }

    async fn run(&self, token: u64, filter: Option<String>) -> Settlement {
        info!("🔎 Fetch #{} started (filter: {:?})", token, filter);
        let result = self.source.fetch_articles(filter.as_deref()).await;
        self.settle(token, filter, result)
    }

    async fn search(&self, filter: Option<String>) -> Settlement {
        let token = self.begin();
        self.run(token, filter).await
    }
}

pub struct Presenter<S, V> {
    inner: Arc<Inner<S, V>>,
    task: Mutex<Option<JoinHandle<Settlement>>>,
}

impl<S, V> Presenter<S, V>
where
    S: ArticleSource + 'static,
    V: View + 'static,
{
    pub fn new(source: S, view: V) -> Self {
        let (fetching, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                source,
                view,
                list: Mutex::new(ListState {
                    state: FetchState::Idle,
                    latest: 0,
                    articles: Vec::new(),
                    visible: Vec::new(),
                    filter: None,
                }),
                delivery: Mutex::new(()),
                fetching,
            }),
            task: Mutex::new(None),
        }
    }

    /// Subscribes to the loading state; `true` while a fetch is in flight.
    pub fn is_fetching(&self) -> watch::Receiver<bool> {
        self.inner.fetching.subscribe()
    }

    pub fn state(&self) -> FetchState {
        self.inner.lock().state
    }

    /// The list as currently displayed.
    pub fn visible(&self) -> Vec<Article> {
        self.inner.lock().visible.clone()
    }

    pub fn filter(&self) -> Option<String> {
        self.inner.lock().filter.clone()
    }

    /// Fetches the list and displays it filtered by `filter`, on the
    /// caller's task.
    pub async fn search(&self, filter: Option<String>) -> Settlement {
        self.inner.search(filter).await
    }

    /// Starts [`Presenter::search`] on a background task owned by the
    /// presenter. A fetch still running from an earlier call is aborted.
    ///
    /// The fetch is numbered before this returns, so calls made in a row
    /// settle in call order whatever order the tasks get scheduled in.
    pub fn spawn_search(&self, filter: Option<String>) {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        let token = self.inner.begin();
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move { inner.run(token, filter).await });

        if let Some(previous) = task.replace(handle) {
            previous.abort();
        }
    }

    /// Waits for the background fetch started by [`Presenter::spawn_search`].
    ///
    /// Returns `None` when there is nothing to wait for or the fetch was
    /// aborted.
    pub async fn join(&self) -> Result<Option<Settlement>> {
        let handle = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(handle) = handle else {
            return Ok(None);
        };
        match handle.await {
            Ok(settlement) => Ok(Some(settlement)),
            Err(e) if e.is_cancelled() => Ok(None),
            Err(e) => Err(Error::from(e)),
        }
    }

    /// Re-applies `filter` to the last fetched list without fetching again.
    pub fn apply_filter(&self, filter: Option<String>) -> usize {
        let _delivery = self.inner.deliver();
        let visible = {
            let mut list = self.inner.lock();
            list.filter = filter;
            list.visible = apply_query(&list.articles, list.filter.as_deref());
            list.visible.clone()
        };
        self.inner.view.render(&visible);
        visible.len()
    }

    /// Aborts the background fetch, if any, and returns to idle.
    pub fn shutdown(&self) {
        let handle = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
            let mut list = self.inner.lock();
            // Anything still in flight must not be applied after this point.
            list.latest += 1;
            list.state = FetchState::Idle;
            self.inner.fetching.send_replace(false);
        }
    }
}

impl<S, V> Drop for Presenter<S, V> {
    fn drop(&mut self) {
        let task = self.task.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = task.take() {
            handle.abort();
        }
    }
}
