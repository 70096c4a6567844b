//! Integration tests for the HTTP wrapper and the API functions, run
//! against a local mock server.

use gopress_cli::api::{self, admin};
use gopress_cli::notify::RecordingNotifier;
use gopress_cli::models::{Credentials, ListParams};
use gopress_cli::storage::{KeyValueStore, MemoryStore};
use gopress_cli::{ApiError, ApiRequest, Config, HttpClient, TokenStore};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock server on its own runtime plus a blocking client pointed at it.
/// The client is called from the plain test thread, outside the runtime.
struct Harness {
    server: MockServer,
    client: HttpClient,
    tokens: TokenStore,
    backend: Arc<MemoryStore>,
    notices: Arc<RecordingNotifier>,
    rt: Runtime,
}

impl Harness {
    fn new() -> Self {
        Self::with_timeout(Duration::from_secs(10))
    }

    fn with_timeout(timeout: Duration) -> Self {
        let rt = Runtime::new().unwrap();
        let server = rt.block_on(MockServer::start());

        let mut config = Config::new(format!("{}/api/v1/", server.uri()));
        config.timeout = timeout;

        let backend = Arc::new(MemoryStore::new());
        let tokens = TokenStore::load(backend.clone());
        let notices = Arc::new(RecordingNotifier::new());
        let client = HttpClient::new(&config, tokens.clone(), notices.clone()).unwrap();

        Harness {
            server,
            client,
            tokens,
            backend,
            notices,
            rt,
        }
    }

    fn mount(&self, mock: Mock) {
        self.rt.block_on(mock.mount(&self.server));
    }

    fn authorization_headers(&self) -> Vec<Option<String>> {
        self.rt
            .block_on(self.server.received_requests())
            .unwrap_or_default()
            .iter()
            .map(|r| {
                r.headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            })
            .collect()
    }
}

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(json!({"code": 200, "message": "success", "data": data}))
}

fn fail(code: i64, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(json!({"code": code, "message": message, "data": null}))
}

fn credentials() -> Credentials {
    Credentials {
        username: "admin".into(),
        password: "password123".into(),
    }
}

#[test]
fn test_login_returns_full_envelope() {
    let h = Harness::new();
    h.mount(
        Mock::given(method("POST"))
            .and(path("/api/v1/login"))
            .and(body_json(json!({"username": "admin", "password": "password123"})))
            .respond_with(ok(json!({"token": "jwt-token"}))),
    );

    let res = api::login(&h.client, &credentials()).unwrap();
    assert_eq!(res.status, 200);
    assert_eq!(res.envelope.code, 200);
    assert_eq!(res.message(), "success");
    assert_eq!(res.data().token, "jwt-token");

    // storing the token is the caller's job
    assert_eq!(h.tokens.get(), None);
    assert!(h.notices.notices().is_empty());
}

#[test]
fn test_register_posts_to_signup() {
    let h = Harness::new();
    h.mount(
        Mock::given(method("POST"))
            .and(path("/api/v1/signup"))
            .respond_with(ok(Value::Null)),
    );

    let res = api::register(&h.client, &credentials()).unwrap();
    assert_eq!(res.into_data(), Value::Null);
}

#[test]
fn test_success_envelope_is_returned_whole() {
    let h = Harness::new();
    h.mount(
        Mock::given(method("GET"))
            .and(path("/api/v1/anything"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": {"id": 1}})),
            ),
    );

    let res = h.client.send::<Value>(ApiRequest::get("anything")).unwrap();
    assert_eq!(res.envelope.code, 200);
    assert_eq!(res.envelope.message, "");
    assert_eq!(res.envelope.data, json!({"id": 1}));
}

#[test]
fn test_bearer_token_attached_only_when_logged_in() {
    let h = Harness::new();
    h.mount(
        Mock::given(method("GET"))
            .and(path("/api/v1/me"))
            .respond_with(ok(json!({"user_id": 1, "username": "admin"}))),
    );

    api::me(&h.client).unwrap();
    h.tokens.set(Some("t1".into())).unwrap();
    let profile = api::me(&h.client).unwrap().into_data();
    assert_eq!(profile.username, "admin");
    h.tokens.clear().unwrap();
    api::me(&h.client).unwrap();

    assert_eq!(
        h.authorization_headers(),
        vec![None, Some("Bearer t1".to_string()), None]
    );
}

#[test]
fn test_unauthorized_envelope_leaves_session_alone() {
    let h = Harness::new();
    h.tokens.set(Some("expired".into())).unwrap();
    h.mount(
        Mock::given(method("GET"))
            .and(path("/api/v1/admin/categories"))
            .and(header("authorization", "Bearer expired"))
            .respond_with(fail(401, "unauthorized")),
    );

    let err = admin::list_categories(&h.client).unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "unauthorized");

    assert_eq!(h.tokens.get().as_deref(), Some("expired"));
    assert_eq!(h.backend.get("token").unwrap().as_deref(), Some("expired"));

    let notices = h.notices.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "unauthorized");
    assert_eq!(notices[0].duration, Duration::from_secs(5));
}

#[test]
fn test_business_error_without_message_uses_fallback() {
    let h = Harness::new();
    h.mount(
        Mock::given(method("POST"))
            .and(path("/api/v1/signup"))
            .respond_with(fail(500, "")),
    );

    let err = api::register(&h.client, &credentials()).unwrap_err();
    assert!(matches!(err, ApiError::Business { code: 500, .. }));
    assert_eq!(h.notices.messages(), vec!["Error"]);
}

#[test]
fn test_timeout_is_a_transport_error() {
    let h = Harness::with_timeout(Duration::from_millis(200));
    h.mount(
        Mock::given(method("GET"))
            .and(path("/api/v1/posts/1"))
            .respond_with(fail(500, "never seen").set_delay(Duration::from_secs(2))),
    );

    let err = api::get_post(&h.client, 1).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "{err:?}");
    assert!(err.is_transport());

    let messages = h.notices.messages();
    assert_eq!(messages.len(), 1);
    assert_ne!(messages[0], "never seen");
}

#[test]
fn test_connection_refused_is_a_transport_error() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let tokens = TokenStore::load(Arc::new(MemoryStore::new()));
    let notices = Arc::new(RecordingNotifier::new());
    let config = Config::new(format!("http://127.0.0.1:{port}"));
    let client = HttpClient::new(&config, tokens, notices.clone()).unwrap();

    let err = api::list_posts(&client, &ListParams::default()).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(notices.notices().len(), 1);
}

#[test]
fn test_http_error_status_skips_envelope() {
    let h = Harness::new();
    h.mount(
        Mock::given(method("GET"))
            .and(path("/api/v1/posts"))
            .respond_with(
                ResponseTemplate::new(502).set_body_json(json!({"code": 200, "data": {}})),
            ),
    );

    let err = api::list_posts(&h.client, &ListParams::default()).unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 502 }));
    assert_eq!(h.notices.messages(), vec!["Request failed with status code 502"]);
}

#[test]
fn test_list_posts_passes_query_through() {
    let h = Harness::new();
    h.mount(
        Mock::given(method("GET"))
            .and(path("/api/v1/posts"))
            .and(query_param("page", "2"))
            .and(query_param("pageSize", "5"))
            .and(query_param("keyword", "rust"))
            .respond_with(ok(json!({
                "post": [
                    {"ID": 6, "Title": "Ownership", "User": {"ID": 1, "Username": "admin"}},
                    {"ID": 7, "Title": "Borrowing"}
                ],
                "total_count": 7
            }))),
    );

    let params = ListParams::new(2, 5).with("keyword", "rust");
    let list = api::list_posts(&h.client, &params).unwrap().into_data();
    assert_eq!(list.total_count, 7);
    assert_eq!(list.page_count(5), 2);
    assert_eq!(list.posts[0].author(), Some("admin"));
    assert_eq!(list.posts[1].title, "Borrowing");
}

#[test]
fn test_get_post_interpolates_id() {
    let h = Harness::new();
    h.mount(
        Mock::given(method("GET"))
            .and(path("/api/v1/posts/42"))
            .respond_with(ok(json!({
                "ID": 42,
                "Title": "Hello GoPress",
                "Content": "First post body",
                "Status": 1,
                "CategoryID": 3,
                "Category": {"ID": 3, "Name": "News"},
                "Tags": []
            }))),
    );

    let post = api::get_post(&h.client, 42).unwrap().into_data();
    assert_eq!(post.id, 42);
    assert_eq!(post.category.map(|c| c.name), Some("News".to_string()));
}

#[test]
fn test_unexpected_data_shape_is_a_decode_error() {
    let h = Harness::new();
    h.mount(
        Mock::given(method("POST"))
            .and(path("/api/v1/login"))
            .respond_with(ok(json!({"jwt": "wrong-key"}))),
    );

    let err = api::login(&h.client, &credentials()).unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
    assert_eq!(h.notices.notices().len(), 1);
}

#[test]
fn test_admin_term_crud_paths() {
    let h = Harness::new();
    h.tokens.set(Some("t1".into())).unwrap();
    h.mount(
        Mock::given(method("POST"))
            .and(path("/api/v1/admin/tags"))
            .and(body_json(json!({"name": "async"})))
            .respond_with(ok(json!({"ID": 9, "Name": "async"}))),
    );
    h.mount(
        Mock::given(method("PUT"))
            .and(path("/api/v1/admin/categories/3"))
            .and(body_json(json!({"name": "Rust"})))
            .respond_with(ok(json!({"ID": 3, "Name": "Rust"}))),
    );
    h.mount(
        Mock::given(method("DELETE"))
            .and(path("/api/v1/admin/posts/5"))
            .respond_with(ok(Value::Null)),
    );

    let tag = admin::create_term(&h.client, admin::Taxonomy::Tags, "async").unwrap().into_data();
    assert_eq!(tag.id, 9);
    let category = admin::update_term(&h.client, admin::Taxonomy::Categories, 3, "Rust")
        .unwrap()
        .into_data();
    assert_eq!(category.name, "Rust");
    admin::delete_post(&h.client, 5).unwrap();

    assert!(h
        .authorization_headers()
        .iter()
        .all(|h| h.as_deref() == Some("Bearer t1")));
}
