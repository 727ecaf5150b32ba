//! Inventory listing, filtering and book mutations over HTTP.

mod common;

use axum::http::StatusCode;
use common::{location, MemoryStore, TestClient, TEST_PASSWORD};
use ink_core::activity::actions;
use ink_core::book::{BookStatus, INVALID_BOOK_FORM};
use ink_core::flash::messages;
use ink_core::guard::HOME_PATH;
use ink_core::roles::Role;

async fn seed_catalog(store: &MemoryStore) {
    store.seed_book("O Hobbit", "J.R.R. Tolkien", BookStatus::Raro).await;
    store.seed_book("O Senhor dos Anéis", "J.R.R. Tolkien", BookStatus::Comum).await;
    store.seed_book("Tolkien: uma biografia", "Humphrey Carpenter", BookStatus::Raro).await;
    store.seed_book("Dom Casmurro", "Machado de Assis", BookStatus::Colecao).await;
}

async fn signed_in(app: axum::Router, store: &MemoryStore) -> TestClient {
    store.seed_user("Ana Silva", "ana@x.com", Role::Staff).await;
    let mut client = TestClient::new(app);
    client.login("ana@x.com", TEST_PASSWORD).await;
    client
}

fn titles(page: &serde_json::Value) -> Vec<String> {
    page["books"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_filter_lists_everything_newest_first() {
    let (app, store, _state) = common::build_test_app();
    seed_catalog(&store).await;
    let mut client = signed_in(app, &store).await;

    let page = client.page(HOME_PATH).await;
    assert_eq!(
        titles(&page),
        vec!["Dom Casmurro", "Tolkien: uma biografia", "O Senhor dos Anéis", "O Hobbit"]
    );
    assert_eq!(page["statuses"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn search_matches_title_or_author() {
    let (app, store, _state) = common::build_test_app();
    seed_catalog(&store).await;
    let mut client = signed_in(app, &store).await;

    let page = client.page("/?search=tolkien").await;
    assert_eq!(titles(&page).len(), 3);
    assert_eq!(page["search"], "tolkien");
}

#[tokio::test]
async fn search_and_status_combine() {
    let (app, store, _state) = common::build_test_app();
    seed_catalog(&store).await;
    let mut client = signed_in(app, &store).await;

    let page = client.page("/?search=Tolkien&status=Raro").await;
    assert_eq!(titles(&page), vec!["Tolkien: uma biografia", "O Hobbit"]);
    assert_eq!(page["status"], "Raro");
}

#[tokio::test]
async fn unknown_status_is_ignored() {
    let (app, store, _state) = common::build_test_app();
    seed_catalog(&store).await;
    let mut client = signed_in(app, &store).await;

    let page = client.page("/?status=Inexistente").await;
    assert_eq!(titles(&page).len(), 4);
    assert_eq!(page["status"], serde_json::Value::Null);
}

#[tokio::test]
async fn accented_status_filters() {
    let (app, store, _state) = common::build_test_app();
    seed_catalog(&store).await;
    let mut client = signed_in(app, &store).await;

    let page = client.page("/?status=Cole%C3%A7%C3%A3o").await;
    assert_eq!(titles(&page), vec!["Dom Casmurro"]);
}

#[tokio::test]
async fn edit_loads_the_selected_book() {
    let (app, store, _state) = common::build_test_app();
    let book = store.seed_book("O Hobbit", "J.R.R. Tolkien", BookStatus::Raro).await;
    let mut client = signed_in(app, &store).await;

    let page = client.page(&format!("/?edit={}", book.id)).await;
    assert_eq!(page["editing"]["title"], "O Hobbit");
}

#[tokio::test]
async fn malformed_edit_id_redirects_with_warning() {
    let (app, store, _state) = common::build_test_app();
    let mut client = signed_in(app, &store).await;

    let response = client.get("/?edit=abc").await;
    assert_eq!(location(&response), HOME_PATH);
    let page = client.page(HOME_PATH).await;
    assert_eq!(page["flash"]["message"], messages::INVALID_ID);
    assert_eq!(page["flash"]["level"], "warning");

    let response = client.get("/?edit=42").await;
    assert_eq!(location(&response), HOME_PATH);
    let page = client.page(HOME_PATH).await;
    assert_eq!(page["flash"]["message"], messages::BOOK_NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_update_and_delete_a_book() {
    let (app, store, _state) = common::build_test_app();
    let mut client = signed_in(app, &store).await;

    let token = client.csrf_token(HOME_PATH).await;
    let response = client
        .post_form(
            "/books",
            &[
                ("title", "O Hobbit"),
                ("author", "J.R.R. Tolkien"),
                ("publisher", "HarperCollins"),
                ("quantity", "3"),
                ("price", "59,90"),
                ("status", "Raro"),
                ("csrf_token", &token),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let page = client.page(HOME_PATH).await;
    assert_eq!(page["flash"]["message"], messages::BOOK_CREATED);
    let book = &page["books"][0];
    assert_eq!(book["price"], 59.9);
    assert_eq!(book["quantity"], 3);
    let id = book["id"].as_i64().unwrap().to_string();

    client
        .post_form(
            "/books",
            &[
                ("id", &id),
                ("title", "O Hobbit"),
                ("author", "J.R.R. Tolkien"),
                ("publisher", "HarperCollins"),
                ("quantity", "5"),
                ("price", "64.5"),
                ("status", "Autografado"),
                ("csrf_token", &token),
            ],
        )
        .await;
    let page = client.page(HOME_PATH).await;
    assert_eq!(page["flash"]["message"], messages::BOOK_UPDATED);
    assert_eq!(page["books"][0]["status"], "Autografado");
    assert_eq!(page["books"][0]["quantity"], 5);

    client
        .post_form(&format!("/books/{id}/delete"), &[("csrf_token", &token)])
        .await;
    let page = client.page(HOME_PATH).await;
    assert_eq!(page["flash"]["message"], messages::BOOK_DELETED);
    assert_eq!(store.book_count().await, 0);

    let entries = store.wait_for_activity(8).await;
    let mutations: Vec<_> = entries
        .iter()
        .map(|e| e.action.as_str())
        .filter(|a| a.starts_with("book_"))
        .collect();
    assert_eq!(
        mutations,
        vec![actions::BOOK_CREATE, actions::BOOK_UPDATE, actions::BOOK_DELETE]
    );
}

#[tokio::test]
async fn invalid_book_form_is_rejected() {
    let (app, store, _state) = common::build_test_app();
    let mut client = signed_in(app, &store).await;
    let token = client.csrf_token(HOME_PATH).await;

    client
        .post_form(
            "/books",
            &[
                ("title", "O Hobbit"),
                ("author", ""),
                ("publisher", "HarperCollins"),
                ("quantity", "0"),
                ("price", "abc"),
                ("status", "Raro"),
                ("csrf_token", &token),
            ],
        )
        .await;

    let page = client.page(HOME_PATH).await;
    assert_eq!(page["flash"]["message"], INVALID_BOOK_FORM);
    assert_eq!(store.book_count().await, 0);
}

#[tokio::test]
async fn book_mutation_without_csrf_token_is_rejected() {
    let (app, store, _state) = common::build_test_app();
    let book = store.seed_book("O Hobbit", "J.R.R. Tolkien", BookStatus::Raro).await;
    let mut client = signed_in(app, &store).await;

    client
        .post_form(&format!("/books/{}/delete", book.id), &[])
        .await;

    let page = client.page(HOME_PATH).await;
    assert_eq!(page["flash"]["message"], messages::CSRF_MISMATCH);
    assert_eq!(store.book_count().await, 1);
}

#[tokio::test]
async fn deleting_a_missing_book_reports_not_found() {
    let (app, store, _state) = common::build_test_app();
    let mut client = signed_in(app, &store).await;
    let token = client.csrf_token(HOME_PATH).await;

    client
        .post_form("/books/77/delete", &[("csrf_token", &token)])
        .await;

    let page = client.page(HOME_PATH).await;
    assert_eq!(page["flash"]["message"], messages::BOOK_NOT_FOUND);
}

#[tokio::test]
async fn anonymous_book_mutation_is_sent_to_login() {
    let (app, store, _state) = common::build_test_app();
    store.seed_book("O Hobbit", "J.R.R. Tolkien", BookStatus::Raro).await;
    let mut client = TestClient::new(app);

    let response = client.post_form("/books/1/delete", &[]).await;
    assert_eq!(location(&response), "/login");
    assert_eq!(store.book_count().await, 1);
}
