mod common;

use std::sync::Arc;

use common::{config_for, mock_items, posts_body, RecordingView};
use ql_client::{FetchState, Presenter, QiitaClient, Settlement};
use ql_core::ErrorKind;

#[tokio::test]
async fn test_fetch_then_render_sorted() {
    let mut server = mockito::Server::new_async().await;
    let _mock = mock_items(&mut server, 200, &posts_body(&["Banana", "apple", "Cherry"])).await;

    let view = Arc::new(RecordingView::default());
    let presenter = Presenter::new(QiitaClient::new(config_for(&server)).unwrap(), view.clone());

    assert_eq!(
        presenter.search(None).await,
        Settlement::Rendered { shown: 3, total: 3 }
    );
    assert_eq!(
        *view.renders.lock().unwrap(),
        vec![vec!["apple", "Banana", "Cherry"]]
    );
}

#[tokio::test]
async fn test_server_error_keeps_previous_list() {
    let mut server = mockito::Server::new_async().await;
    let ok = mock_items(&mut server, 200, &posts_body(&["Banana", "apple", "Cherry"])).await;

    let view = Arc::new(RecordingView::default());
    let presenter = Presenter::new(QiitaClient::new(config_for(&server)).unwrap(), view.clone());
    presenter.search(Some("an".to_string())).await;
    ok.remove_async().await;

    let _failing = mock_items(&mut server, 500, "").await;
    let settlement = presenter.search(None).await;

    assert_eq!(settlement, Settlement::Failed(ErrorKind::Response));
    assert_eq!(presenter.state(), FetchState::Idle);
    assert!(!*presenter.is_fetching().borrow());

    let errors = view.errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, ErrorKind::Response);
    assert!(errors[0].1.contains("500"));

    assert_eq!(view.renders.lock().unwrap().len(), 1);
    let visible: Vec<String> = presenter.visible().iter().map(|a| a.title().to_string()).collect();
    assert_eq!(visible, vec!["Banana"]);
}

#[tokio::test]
async fn test_spawned_search_settles_once() {
    let mut server = mockito::Server::new_async().await;
    let mock = mock_items(&mut server, 200, &posts_body(&["rust", "Rustacean", "go"])).await;

    let view = Arc::new(RecordingView::default());
    let presenter = Presenter::new(QiitaClient::new(config_for(&server)).unwrap(), view.clone());
    let mut fetching = presenter.is_fetching();

    presenter.spawn_search(Some("RUST".to_string()));
    let settlement = presenter.join().await.unwrap();

    mock.assert_async().await;
    assert_eq!(settlement, Some(Settlement::Rendered { shown: 2, total: 3 }));
    assert_eq!(*view.renders.lock().unwrap(), vec![vec!["rust", "Rustacean"]]);
    assert!(fetching.has_changed().unwrap());
    assert!(!*fetching.borrow_and_update());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlapping_spawned_searches_settle_latest() {
    let mut server = mockito::Server::new_async().await;
    let _mock = mock_items(&mut server, 200, &posts_body(&["Banana", "apple", "Cherry"])).await;
    let client = Arc::new(QiitaClient::new(config_for(&server)).unwrap());

    for _ in 0..100 {
        let view = Arc::new(RecordingView::default());
        let presenter = Presenter::new(client.clone(), view.clone());

        presenter.spawn_search(Some("cherry".to_string()));
        presenter.spawn_search(Some("an".to_string()));
        let settlement = presenter.join().await.unwrap();

        assert_eq!(settlement, Some(Settlement::Rendered { shown: 1, total: 3 }));
        assert_eq!(presenter.state(), FetchState::Idle);
        assert!(!*presenter.is_fetching().borrow());
        assert_eq!(presenter.filter().as_deref(), Some("an"));
        assert_eq!(*view.renders.lock().unwrap(), vec![vec!["Banana"]]);
        assert!(view.errors.lock().unwrap().is_empty());
    }
}
