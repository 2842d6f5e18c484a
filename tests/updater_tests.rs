mod common;

use std::sync::Arc;

use cart_total::client::{HttpConnection, HttpTotalEndpoint, RequestFailure};
use cart_total::models::{CartPage, SelectableItem};
use cart_total::services::{CartTotalUpdater, ResponseOrdering, UpdateOutcome};

use common::{closed_base_url, json_response, TestServer};

fn page() -> Arc<CartPage> {
    Arc::new(CartPage::new(vec![
        SelectableItem::new("1", "Product A"),
        SelectableItem::new("2", "Product B"),
        SelectableItem::new("3", "Product C"),
    ]))
}

fn updater(page: Arc<CartPage>, base_url: &str) -> CartTotalUpdater {
    let connection = HttpConnection::from_url(base_url).unwrap();
    CartTotalUpdater::new(
        page,
        Arc::new(HttpTotalEndpoint::with_default_path(connection)),
        ResponseOrdering::default(),
    )
}

#[tokio::test]
async fn test_checking_items_updates_display() {
    let server = TestServer::serve(vec![
        json_response("200 OK", r#"{"total": 100}"#),
        json_response("200 OK", r#"{"total": 250}"#),
    ]);
    let updater = updater(page(), &server.base_url);

    updater.set_selected("3", true).unwrap().unwrap().await.unwrap();
    assert_eq!(updater.page().display().text(), "100");

    updater.set_selected("1", true).unwrap().unwrap().await.unwrap();
    assert_eq!(updater.page().display().text(), "250");

    assert_eq!(
        server.requests(),
        vec![
            "GET /calculate_total?selected_ids[]=3 HTTP/1.1".to_string(),
            "GET /calculate_total?selected_ids[]=1&selected_ids[]=3 HTTP/1.1".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_failed_request_keeps_last_total() {
    let server = TestServer::serve(vec![
        json_response("200 OK", r#"{"total": 42}"#),
        json_response("502 Bad Gateway", "upstream down"),
    ]);
    let updater = updater(page(), &server.base_url);

    updater.set_selected("1", true).unwrap().unwrap().await.unwrap();
    let outcome = updater.set_selected("2", true).unwrap().unwrap().await.unwrap();

    assert!(matches!(
        outcome,
        UpdateOutcome::Failed {
            error: RequestFailure::Status { code: 502 },
            ..
        }
    ));
    assert_eq!(updater.page().display().text(), "42");
}

#[tokio::test]
async fn test_unreachable_server_leaves_display_untouched() {
    let page = Arc::new(
        CartPage::new(vec![SelectableItem::new("1", "Product A")]).with_display_text("0"),
    );
    let updater = updater(page, &closed_base_url());

    let outcome = updater.set_selected("1", true).unwrap().unwrap().await.unwrap();

    assert!(matches!(outcome, UpdateOutcome::Failed { seq: 1, .. }));
    assert_eq!(updater.page().display().text(), "0");
}

#[tokio::test]
async fn test_repeated_state_sends_nothing() {
    let server = TestServer::serve(vec![json_response("200 OK", r#"{"total": 150}"#)]);
    let updater = updater(page(), &server.base_url);

    updater.set_selected("1", true).unwrap().unwrap().await.unwrap();
    assert!(updater.set_selected("1", true).unwrap().is_none());
    assert!(updater.set_selected("2", false).unwrap().is_none());

    assert_eq!(server.requests().len(), 1);
}
