#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

use petnest::config::{AccountDisclosure, Config};
use petnest::db::{MemoryStore, Store};
use petnest::email::Notifier;
use petnest::models::{Listing, NewListing};
use petnest::storage::DiskImageStore;

pub const JWT_SECRET: &str = "test-jwt-secret-that-is-long-enough";
pub const RESET_URL_BASE: &str = "http://localhost:3000";
pub const MAX_BODY_SIZE: usize = 32 * 1024;
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake";

/// Captures reset links instead of sending mail. Can be switched to fail.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
    attempted: Mutex<Option<String>>,
    fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Plaintext token from the most recent reset link.
    pub fn last_token(&self) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .last()
            .and_then(|(_, url)| url.rsplit('/').next().map(str::to_string))
    }

    /// Token from the most recent send, including one that failed.
    pub fn last_attempted_token(&self) -> Option<String> {
        self.attempted
            .lock()
            .unwrap()
            .as_deref()
            .and_then(|url| url.rsplit('/').next().map(str::to_string))
    }

    pub fn last_recipient(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(to, _)| to.clone())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_password_reset(&self, to_email: &str, reset_url: &str) -> Result<(), String> {
        *self.attempted.lock().unwrap() = Some(reset_url.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err("smtp relay refused connection".to_string());
        }
        self.sent
            .lock()
            .unwrap()
            .push((to_email.to_string(), reset_url.to_string()));
        Ok(())
    }
}

/// Insert a listing straight into the store, bypassing uploads.
pub async fn seed_listing(store: &dyn Store, name: &str) -> Listing {
    store
        .create_listing(NewListing {
            name: name.to_string(),
            age: 2,
            breed: "Mixed".to_string(),
            owner_name: "Shelter".to_string(),
            owner_contact: "shelter@example.com".to_string(),
            description: format!("{name} is looking for a home"),
            images: vec![],
        })
        .await
        .expect("seed listing")
}

pub fn test_config(base_url: &str, upload_dir: PathBuf, disclosure: AccountDisclosure) -> Config {
    Config {
        database_url: "memory".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: base_url.to_string(),
        reset_url_base: RESET_URL_BASE.to_string(),
        upload_dir,
        max_body_size: MAX_BODY_SIZE,
        account_disclosure: disclosure,
        log_level: "warn".to_string(),
        smtp: None,
    }
}

pub fn temp_upload_dir() -> PathBuf {
    std::env::temp_dir().join(format!("petnest_test_{}", Uuid::now_v7().simple()))
}

/// A running test server backed by an in-memory store.
pub struct TestApp {
    pub addr: SocketAddr,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub client: Client,
    pub upload_dir: PathBuf,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn sign_up(&self, username: &str, email: &str, password: &str) -> (Value, StatusCode) {
        self.post_json(
            "/api/v1/auth/sign-up",
            &json!({ "username": username, "email": email, "password": password }),
        )
        .await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> (Value, StatusCode) {
        self.post_json(
            "/api/v1/auth/sign-in",
            &json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Sign up a default user, return the session token.
    pub async fn bootstrap(&self) -> String {
        let (body, status) = self.sign_up("alice", "alice@test.com", "password123").await;
        assert_eq!(status, StatusCode::OK, "bootstrap sign-up failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn seed_listings(&self, count: usize) -> Vec<Listing> {
        let mut listings = Vec::with_capacity(count);
        for i in 1..=count {
            listings.push(seed_listing(self.store.as_ref(), &format!("Pet {i}")).await);
        }
        listings
    }

    /// Create a listing through the multipart endpoint with one PNG image.
    pub async fn create_listing(&self, token: Option<&str>, name: &str, age: &str) -> (Value, StatusCode) {
        self.create_listing_with_image(token, name, age, "rex photo.png", "image/png", PNG_BYTES)
            .await
    }

    pub async fn create_listing_with_image(
        &self,
        token: Option<&str>,
        name: &str,
        age: &str,
        filename: &str,
        mime: &str,
        bytes: &[u8],
    ) -> (Value, StatusCode) {
        let image = Part::bytes(bytes.to_vec())
            .file_name(filename.to_string())
            .mime_str(mime)
            .unwrap();
        let form = Form::new()
            .text("name", name.to_string())
            .text("age", age.to_string())
            .text("breed", "Beagle")
            .text("owner_name", "Sam")
            .text("owner_contact", "sam@example.com")
            .text("description", "Friendly and house trained")
            .part("images", image);

        let mut req = self.client.post(self.url("/api/v1/listings")).multipart(form);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await.expect("create listing request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn get(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated GET request.
    pub async fn get_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated PUT request without a body.
    pub async fn put_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("put request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an authenticated DELETE request.
    pub async fn delete_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("delete request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(AccountDisclosure::Generic).await
}

/// Spawn a test app on a random port with a fresh store and upload dir.
pub async fn spawn_app_with(disclosure: AccountDisclosure) -> TestApp {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    let upload_dir = temp_upload_dir();
    let config = test_config(&format!("http://{addr}"), upload_dir.clone(), disclosure);

    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let images = Arc::new(DiskImageStore::new(upload_dir.clone(), &config.base_url));

    let app = petnest::build_app(store.clone(), notifier.clone(), images, config);

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        store,
        notifier,
        client: Client::new(),
        upload_dir,
    }
}

/// Remove the upload directory once a test is done.
pub async fn cleanup(app: TestApp) {
    let _ = tokio::fs::remove_dir_all(&app.upload_dir).await;
}
