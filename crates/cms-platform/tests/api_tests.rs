//! REST API Tests
//!
//! Drives the composed router with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use cms_platform::shared::middleware::PRINCIPAL_HEADER;
use cms_platform::{
    BlogOption, CmsPlatform, InMemoryStore, Layout, MediaUrlResolver, Page, RecordingEventPublisher, Repository,
    Tag, TsidGenerator,
};

struct TestApp {
    store: InMemoryStore,
    platform: CmsPlatform<cms_platform::InMemoryUnitOfWork>,
}

impl TestApp {
    fn new() -> Self {
        cms_common::logging::init_test_logging();
        let store = InMemoryStore::new();
        let platform = CmsPlatform::in_memory(
            store.clone(),
            Arc::new(RecordingEventPublisher::new()),
            MediaUrlResolver::new("https://cdn.example.com"),
        );
        Self { store, platform }
    }

    fn router(&self) -> Router {
        self.platform.router()
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder()
            .method(method)
            .uri(uri)
            .header(PRINCIPAL_HEADER, "editor-1");
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self.router().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

#[tokio::test]
async fn test_put_get_delete_page_properties() {
    let app = TestApp::new();
    let id = TsidGenerator::generate();

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/pages/{}/properties", id),
            Some(json!({
                "pageUrl": "/products/",
                "title": "Products",
                "isPublished": true,
                "tags": ["catalog"],
                "metaData": { "metaTitle": "All products" }
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(id));
    assert_eq!(body["version"], json!(1));

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/pages/{}/properties?includeTags=true&includeMetaData=true", id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"]["title"], json!("Products"));
    assert_eq!(body["page"]["isPublished"], json!(true));
    assert_eq!(body["page"]["createdBy"], json!("editor-1"));
    assert_eq!(body["metaData"]["metaTitle"], json!("All products"));
    assert_eq!(body["tags"][0]["name"], json!("catalog"));

    let (status, body) = app
        .send(Method::GET, "/api/pages/properties?pageUrl=products", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"]["id"], json!(id));

    let (status, body) = app
        .send(Method::DELETE, &format!("/api/pages/{}/properties?version=1", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], json!(true));

    let (status, body) = app
        .send(Method::GET, &format!("/api/pages/{}/properties", id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("NOT_FOUND"));
}

#[tokio::test]
async fn test_stale_put_returns_conflict_with_details() {
    let app = TestApp::new();
    let id = TsidGenerator::generate();
    let uri = format!("/api/pages/{}/properties", id);

    app.send(Method::PUT, &uri, Some(json!({ "pageUrl": "/a/", "title": "A" })))
        .await;

    let (status, body) = app
        .send(
            Method::PUT,
            &uri,
            Some(json!({ "pageUrl": "/a/", "title": "A2", "version": 7 })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], json!("CONFLICT"));
    assert_eq!(body["details"]["version"], json!(1));
}

#[tokio::test]
async fn test_delete_with_wrong_version_returns_conflict() {
    let app = TestApp::new();
    let id = TsidGenerator::generate();
    let uri = format!("/api/pages/{}/properties", id);
    app.send(Method::PUT, &uri, Some(json!({ "pageUrl": "/b/", "title": "B" })))
        .await;

    let (status, _) = app.send(Method::DELETE, &format!("{}?version=4", uri), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.send(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_put_without_page_url_is_bad_request() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/pages/{}/properties", TsidGenerator::generate()),
            Some(json!({ "pageUrl": "  ", "title": "Contact" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_put_without_title_is_accepted() {
    let app = TestApp::new();
    let id = TsidGenerator::generate();
    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/pages/{}/properties", id),
            Some(json!({ "pageUrl": "/c/" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.send(Method::GET, &format!("/api/pages/{}/properties", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"]["title"], json!(""));
}

#[tokio::test]
async fn test_tag_endpoints() {
    let app = TestApp::new();
    let tag = Tag::new("releases");
    app.store.seed(&tag).unwrap();

    let (status, body) = app.send(Method::GET, &format!("/api/tags/{}", tag.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], json!("releases"));
    assert_eq!(body["version"], json!(1));

    let (status, body) = app.send(Method::GET, "/api/tags?tagName=releases", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(tag.id));

    let (status, _) = app
        .send(Method::GET, &format!("/api/tags/{}", TsidGenerator::generate()), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .send(Method::PUT, "/api/tags/T-42", Some(json!({ "name": "ignored" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!("T-42"));

    let (status, body) = app.send(Method::POST, "/api/tags/T-43", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!("T-43"));
}

#[tokio::test]
async fn test_blog_templates_and_default_template() {
    let app = TestApp::new();
    let layout = Layout::new("Blog", "~/Views/Blog.cshtml");
    app.store.seed(&layout).unwrap();
    let mut master = Page::new(TsidGenerator::generate());
    master.title = "Blog master".into();
    master.page_url = "/blog-master/".into();
    master.is_master_page = true;
    app.store.seed(&master).unwrap();

    let (status, body) = app.send(Method::GET, "/blog/options/templates", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["data"][0]["isMasterPage"], json!(false));
    assert_eq!(body["data"][1]["isMasterPage"], json!(true));
    assert_eq!(body["data"][0]["isActive"], json!(false));

    let (_, body) = app
        .send(
            Method::POST,
            "/blog/options/default-template",
            Some(json!({ "templateId": layout.id, "masterPageId": master.id })),
        )
        .await;
    assert_eq!(body["success"], json!(true));

    let (_, body) = app.send(Method::GET, "/blog/options/templates", None).await;
    assert_eq!(body["data"][0]["isActive"], json!(false));
    assert_eq!(body["data"][1]["isActive"], json!(true));

    let (_, body) = app
        .send(
            Method::POST,
            "/blog/options/default-template",
            Some(json!({ "templateId": layout.id })),
        )
        .await;
    assert_eq!(body["success"], json!(true));

    let options = Repository::<BlogOption>::new(app.platform.backend())
        .find_all()
        .await
        .unwrap();
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].default_layout_id.as_deref(), Some(layout.id.as_str()));
    assert_eq!(options[0].default_master_page_id, None);

    let (_, body) = app
        .send(
            Method::POST,
            "/blog/options/default-template",
            Some(json!({ "templateId": TsidGenerator::generate() })),
        )
        .await;
    assert_eq!(body["success"], json!(false));
}
