use std::io::{self, IsTerminal, Write};

use crossterm::cursor::MoveToColumn;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use ql_client::View;
use ql_core::{Article, Error};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

const LOADING: &str = "⏳ Loading articles...";

/// Prints the list to stdout and errors to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalView {
    json: bool,
}

impl TerminalView {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn format_list(&self, articles: &[Article]) -> String {
        if self.json {
            return match serde_json::to_string_pretty(articles) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize articles: {}", e);
                    String::new()
                }
            };
        }

        let mut out = String::new();
        for (i, article) in articles.iter().enumerate() {
            out.push_str(&format!("{:>3}. {}\n     {}\n", i + 1, article.title(), article.url()));
        }
        out.push_str(&format!("({} articles)", articles.len()));
        out
    }
}

impl View for TerminalView {
    fn render(&self, articles: &[Article]) {
        clear_status_line();
        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", self.format_list(articles)) {
            tracing::warn!("Failed to write list: {}", e);
        }
    }

    fn present_error(&self, error: &Error) {
        clear_status_line();
        eprintln!("❌ Error: {}", error);
    }
}

fn clear_status_line() {
    let mut stderr = io::stderr();
    if stderr.is_terminal() {
        clear_line(&mut stderr);
    }
}

/// Loading line on stderr, drawn while the presenter is fetching.
pub struct LoadingIndicator {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl LoadingIndicator {
    /// Draws on stderr, or nowhere when stderr is not a terminal.
    pub fn spawn(fetching: watch::Receiver<bool>) -> Self {
        if io::stderr().is_terminal() {
            Self::spawn_with(fetching, io::stderr())
        } else {
            Self::spawn_with(fetching, io::sink())
        }
    }

    pub fn spawn_with<W>(mut fetching: watch::Receiver<bool>, mut out: W) -> Self
    where
        W: Write + Send + 'static,
    {
        let (stop, mut stopped) = oneshot::channel();
        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = fetching.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let loading = *fetching.borrow_and_update();
                        clear_line(&mut out);
                        if loading {
                            let _ = write!(out, "{}", LOADING);
                            let _ = out.flush();
                        }
                    }
                    _ = &mut stopped => break,
                }
            }
            clear_line(&mut out);
        });
        Self { stop, task }
    }

    /// Stops drawing and waits until the line has been cleared.
    pub async fn stop(self) {
        let _ = self.stop.send(());
        if let Err(e) = self.task.await {
            tracing::debug!("Loading indicator ended abnormally: {}", e);
        }
    }
}

fn clear_line<W: Write>(out: &mut W) {
    let _ = execute!(out, MoveToColumn(0), Clear(ClearType::CurrentLine));
}
