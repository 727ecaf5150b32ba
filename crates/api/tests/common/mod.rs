#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use ink_api::activity::ActivityLogger;
use ink_api::auth::password::hash_password;
use ink_api::config::{ServerConfig, SessionConfig};
use ink_api::router::build_app_router;
use ink_api::state::AppState;
use ink_api::store::{ActivitySink, BookStore, CredentialStore};
use ink_core::activity::ActivityEntry;
use ink_core::book::{BookDraft, BookStatus};
use ink_core::filter::FilterCriteria;
use ink_core::roles::Role;
use ink_core::types::DbId;
use ink_db::models::activity::ActivityLog;
use ink_db::models::book::Book;
use ink_db::models::user::{CreateUser, User};
use tokio::sync::Mutex;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "senha123";

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    books: Vec<Book>,
    activity: Vec<ActivityLog>,
    next_user_id: DbId,
    next_book_id: DbId,
    next_activity_id: DbId,
}

/// Backing store for HTTP tests. Mirrors the PostgreSQL semantics the
/// handlers rely on: unique emails, case-insensitive substring search and
/// newest-first ordering.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    /// Make `record_login` fail.
    pub fail_record_login: AtomicBool,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl MemoryStore {
    pub async fn user_by_email(&self, email: &str) -> Option<User> {
        let tables = self.tables.lock().await;
        tables.users.iter().find(|u| u.email == email).cloned()
    }

    pub async fn activity(&self) -> Vec<ActivityLog> {
        self.tables.lock().await.activity.clone()
    }

    pub async fn user_count(&self) -> usize {
        self.tables.lock().await.users.len()
    }

    pub async fn book_count(&self) -> usize {
        self.tables.lock().await.books.len()
    }

    /// Insert a user with [`TEST_PASSWORD`].
    pub async fn seed_user(&self, name: &str, email: &str, role: Role) -> User {
        let password_hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
        CredentialStore::create(
            self,
            &CreateUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
                role,
            },
        )
        .await
        .expect("user creation should succeed")
    }

    pub async fn seed_book(&self, title: &str, author: &str, status: BookStatus) -> Book {
        let draft = BookDraft {
            title: title.to_string(),
            author: author.to_string(),
            publisher: "Editora Teste".to_string(),
            quantity: 1,
            price: 49.9,
            status,
        };
        BookStore::create(self, &draft)
            .await
            .expect("book creation should succeed")
    }

    /// Wait until the activity writer has persisted at least `count` entries.
    pub async fn wait_for_activity(&self, count: usize) -> Vec<ActivityLog> {
        for _ in 0..100 {
            let entries = self.activity().await;
            if entries.len() >= count {
                return entries;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected at least {count} activity entries");
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(self.user_by_email(email).await)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error> {
        Ok(self.user_by_email(email).await.is_some())
    }

    async fn create(&self, input: &CreateUser) -> Result<User, sqlx::Error> {
        let mut tables = self.tables.lock().await;
        if tables.users.iter().any(|u| u.email == input.email) {
            return Err(sqlx::Error::Protocol("duplicate email".into()));
        }
        tables.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: tables.next_user_id,
            name: input.name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            role: input.role,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn record_login(&self, id: DbId) -> Result<(), sqlx::Error> {
        if self.fail_record_login.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        let mut tables = self.tables.lock().await;
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == id) {
            user.last_login_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn update_password(&self, id: DbId, password_hash: &str) -> Result<bool, sqlx::Error> {
        let mut tables = self.tables.lock().await;
        Ok(match tables.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                true
            }
            None => false,
        })
    }

    async fn search(
        &self,
        criteria: &FilterCriteria<Role>,
        active: Option<bool>,
    ) -> Result<Vec<User>, sqlx::Error> {
        let tables = self.tables.lock().await;
        let mut users: Vec<User> = tables
            .users
            .iter()
            .filter(|u| {
                criteria
                    .search()
                    .map_or(true, |term| contains_ci(&u.name, term) || contains_ci(&u.email, term))
            })
            .filter(|u| criteria.value().map_or(true, |role| u.role == role))
            .filter(|u| active.map_or(true, |a| u.is_active == a))
            .cloned()
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }

    async fn set_active(&self, id: DbId, active: bool) -> Result<bool, sqlx::Error> {
        let mut tables = self.tables.lock().await;
        Ok(match tables.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.is_active = active;
                true
            }
            None => false,
        })
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tables = self.tables.lock().await;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        Ok(tables.users.len() < before)
    }

    async fn count(&self, role: Option<Role>, active: Option<bool>) -> Result<i64, sqlx::Error> {
        let tables = self.tables.lock().await;
        let n = tables
            .users
            .iter()
            .filter(|u| role.map_or(true, |r| u.role == r))
            .filter(|u| active.map_or(true, |a| u.is_active == a))
            .count();
        Ok(n as i64)
    }

    async fn list_dormant(&self, days: i32) -> Result<Vec<User>, sqlx::Error> {
        let cutoff = Utc::now() - chrono::Duration::days(i64::from(days));
        let tables = self.tables.lock().await;
        let mut users: Vec<User> = tables
            .users
            .iter()
            .filter(|u| u.last_login_at.map_or(true, |t| t < cutoff))
            .cloned()
            .collect();
        users.sort_by_key(|u| u.last_login_at);
        Ok(users)
    }

    async fn admin_exists(&self) -> Result<bool, sqlx::Error> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().any(|u| u.role == Role::Admin))
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn create(&self, draft: &BookDraft) -> Result<Book, sqlx::Error> {
        let mut tables = self.tables.lock().await;
        tables.next_book_id += 1;
        let now = Utc::now();
        let book = Book {
            id: tables.next_book_id,
            title: draft.title.clone(),
            author: draft.author.clone(),
            publisher: draft.publisher.clone(),
            quantity: draft.quantity,
            price: draft.price,
            status: draft.status,
            created_at: now,
            updated_at: now,
        };
        tables.books.push(book.clone());
        Ok(book)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Book>, sqlx::Error> {
        let tables = self.tables.lock().await;
        Ok(tables.books.iter().find(|b| b.id == id).cloned())
    }

    async fn update(&self, id: DbId, draft: &BookDraft) -> Result<bool, sqlx::Error> {
        let mut tables = self.tables.lock().await;
        Ok(match tables.books.iter_mut().find(|b| b.id == id) {
            Some(book) => {
                book.title = draft.title.clone();
                book.author = draft.author.clone();
                book.publisher = draft.publisher.clone();
                book.quantity = draft.quantity;
                book.price = draft.price;
                book.status = draft.status;
                book.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tables = self.tables.lock().await;
        let before = tables.books.len();
        tables.books.retain(|b| b.id != id);
        Ok(tables.books.len() < before)
    }

    async fn search(&self, criteria: &FilterCriteria<BookStatus>) -> Result<Vec<Book>, sqlx::Error> {
        let tables = self.tables.lock().await;
        let mut books: Vec<Book> = tables
            .books
            .iter()
            .filter(|b| {
                criteria
                    .search()
                    .map_or(true, |term| contains_ci(&b.title, term) || contains_ci(&b.author, term))
            })
            .filter(|b| criteria.value().map_or(true, |status| b.status == status))
            .cloned()
            .collect();
        books.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(books)
    }
}

#[async_trait]
impl ActivitySink for MemoryStore {
    async fn append(&self, entry: &ActivityEntry) -> Result<(), sqlx::Error> {
        let mut tables = self.tables.lock().await;
        tables.next_activity_id += 1;
        let row = ActivityLog {
            id: tables.next_activity_id,
            actor_id: entry.actor_id,
            actor_name: entry.actor_name.clone(),
            action: entry.action.clone(),
            details: entry.details.clone(),
            ip_address: entry.ip_address.clone(),
            user_agent: entry.user_agent.clone(),
            occurred_at: entry.occurred_at,
            created_at: Utc::now(),
        };
        tables.activity.push(row);
        Ok(())
    }

    async fn recent_for_actor(
        &self,
        actor_id: DbId,
        limit: i64,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let tables = self.tables.lock().await;
        Ok(tables
            .activity
            .iter()
            .rev()
            .filter(|a| a.actor_id == Some(actor_id))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        session: SessionConfig::default(),
        activity_channel_capacity: 64,
        admin: None,
    }
}

/// Build the full application router over a fresh [`MemoryStore`], using the
/// same middleware stack production uses.
pub fn build_test_app() -> (Router, Arc<MemoryStore>, AppState) {
    build_test_app_with(test_config())
}

/// [`build_test_app`] with a caller-supplied configuration.
pub fn build_test_app_with(config: ServerConfig) -> (Router, Arc<MemoryStore>, AppState) {
    let store = Arc::new(MemoryStore::default());
    let (activity, _writer) = ActivityLogger::spawn(store.clone(), config.activity_channel_capacity);
    let state = AppState::new(config, store.clone(), store.clone(), store.clone(), activity);
    (build_app_router(state.clone()), store, state)
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

/// Minimal browser: remembers the session cookie between requests.
pub struct TestClient {
    app: Router,
    cookie_name: String,
    session_id: Option<String>,
}

impl TestClient {
    pub fn new(app: Router) -> Self {
        Self {
            app,
            cookie_name: SessionConfig::default().cookie_name,
            session_id: None,
        }
    }

    /// Current session identifier, if the server issued one.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn set_session_id(&mut self, id: Option<String>) {
        self.session_id = id;
    }

    pub async fn get(&mut self, uri: &str) -> Response {
        let request = self.request(Method::GET, uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> Response {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", url_encode(k), url_encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let request = self
            .request(Method::POST, uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Fetch a page and return its `data` object.
    pub async fn page(&mut self, uri: &str) -> serde_json::Value {
        let response = self.get(uri).await;
        assert_eq!(response.status(), 200, "GET {uri} should render a page");
        body_json(response).await["data"].clone()
    }

    /// CSRF token issued by `uri`.
    pub async fn csrf_token(&mut self, uri: &str) -> String {
        self.page(uri).await["csrf_token"]
            .as_str()
            .expect("page should carry a csrf token")
            .to_string()
    }

    /// Log in through the form and return the response.
    pub async fn login(&mut self, email: &str, password: &str) -> Response {
        let token = self.csrf_token("/login").await;
        self.post_form(
            "/login",
            &[("email", email), ("password", password), ("csrf_token", &token)],
        )
        .await
    }

    fn request(&self, method: Method, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.session_id {
            Some(id) => builder.header(COOKIE, format!("{}={id}", self.cookie_name)),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> Response {
        let response = self.app.clone().oneshot(request).await.unwrap();
        for value in response.headers().get_all(SET_COOKIE) {
            let value = value.to_str().unwrap();
            let Some((pair, attributes)) = value.split_once(';') else {
                continue;
            };
            let Some((name, id)) = pair.split_once('=') else {
                continue;
            };
            if name != self.cookie_name {
                continue;
            }
            self.session_id = if attributes.contains("Max-Age=0") {
                None
            } else {
                Some(id.to_string())
            };
        }
        response
    }
}

fn url_encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}

/// Send a GET request without any session cookie.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

/// The `Location` header of a redirect.
pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(LOCATION)
        .expect("redirect should carry a Location header")
        .to_str()
        .unwrap()
}
