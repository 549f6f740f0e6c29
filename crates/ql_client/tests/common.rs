// Shared fixtures for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use mockito::{Matcher, Mock, ServerGuard};
use ql_client::View;
use ql_core::{Article, ClientConfig, Error, ErrorKind};

pub const ITEMS_PATH: &str = "/api/v2/items";

pub fn post_json(id: &str, title: &str) -> String {
    format!(
        r#"{{"rendered_body":"<p>{title}</p>","body":"{title}","created_at":"2019-09-25T10:00:00+09:00","id":"{id}","likes_count":0,"title":"{title}","url":"https://qiita.com/items/{id}"}}"#
    )
}

pub fn posts_body(titles: &[&str]) -> String {
    let posts: Vec<String> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| post_json(&format!("id{}", i), title))
        .collect();
    format!("[{}]", posts.join(","))
}

pub fn config_for(server: &ServerGuard) -> ClientConfig {
    ClientConfig::new(server.url())
}

pub async fn mock_items(server: &mut ServerGuard, status: usize, body: &str) -> Mock {
    server
        .mock("GET", ITEMS_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("per_page".into(), "20".into()),
        ]))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

#[derive(Default)]
pub struct RecordingView {
    pub renders: Mutex<Vec<Vec<String>>>,
    pub errors: Mutex<Vec<(ErrorKind, String)>>,
}

impl View for RecordingView {
    fn render(&self, articles: &[Article]) {
        let titles = articles.iter().map(|a| a.title().to_string()).collect();
        self.renders.lock().unwrap().push(titles);
    }

    fn present_error(&self, error: &Error) {
        self.errors
            .lock()
            .unwrap()
            .push((error.kind(), error.to_string()));
    }
}
