use std::sync::{Arc, Mutex};

use actix_web::{App, http::StatusCode, test, web};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

use folio_core::ContentGenerator;
use folio_core::GenerationSettings;
use folio_core::domain::{NewPost, Post, PostType};
use folio_core::error::GenerationError;
use folio_core::ports::{
    CompletionClient, CompletionRequest, EmailMessage, MailError, Mailer, PostRepository,
};
use folio_infra::InMemoryPostRepository;

use super::configure_routes;
use crate::mail::Outbox;
use crate::state::AppState;

const SECRET: &str = "cron-secret";

const REPLY: &str = r#"{
    "title": "Shipping small batches",
    "content": "Body",
    "excerpt": "Why small batches win",
    "metrics": {"percentage": 30, "description": "shorter lead time"},
    "sources": [{"title": "Radar", "url": "https://www.thoughtworks.com/radar"}],
    "caseStudyLink": "null"
}"#;

struct StubCompletion;

#[async_trait]
impl CompletionClient for StubCompletion {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, GenerationError> {
        Ok(REPLY.to_string())
    }
}

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: EmailMessage) -> Result<String, MailError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(message);
        Ok(format!("email_{}", sent.len()))
    }
}

fn post(title: &str, age: Duration) -> Post {
    NewPost {
        title: title.to_string(),
        content: "Body".into(),
        excerpt: "Excerpt".into(),
        post_type: PostType::Blog,
        topic: "DevOps".into(),
        metrics: None,
        sources: vec![],
        case_study_link: None,
    }
    .into_post(Uuid::new_v4(), Utc::now() - age)
}

struct Fixture {
    state: AppState,
    mailer: Arc<RecordingMailer>,
}

fn fixture(posts: Vec<Post>) -> Fixture {
    let repo: Arc<dyn PostRepository> = Arc::new(InMemoryPostRepository::with_posts(posts));
    let generator = ContentGenerator::new(
        Arc::new(StubCompletion),
        repo.clone(),
        GenerationSettings::default(),
    );
    let mailer = Arc::new(RecordingMailer::default());
    let state = AppState {
        posts: repo,
        generator: Some(Arc::new(generator)),
        outbox: Some(Outbox::new(
            mailer.clone(),
            "Site <noreply@example.com>",
            "owner@example.com",
        )),
        cron_secret: Some(Arc::from(SECRET)),
        rate_limiter: None,
    };
    Fixture { state, mailer }
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_routes),
        )
        .await
    };
}

async fn json_body(resp: actix_web::dev::ServiceResponse) -> Value {
    test::read_body_json(resp).await
}

#[actix_web::test]
async fn test_health() {
    let app = app!(fixture(vec![]).state);
    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["status"], "ok");
}

#[actix_web::test]
async fn test_list_newest_first_with_paging() {
    let app = app!(
        fixture(vec![
            post("oldest", Duration::days(3)),
            post("newest", Duration::hours(1)),
            post("middle", Duration::days(1)),
        ])
        .state
    );

    let req = test::TestRequest::get().uri("/api/blog?limit=2").to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    let titles: Vec<&str> = body["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["newest", "middle"]);

    let req = test::TestRequest::get()
        .uri("/api/blog?limit=10&offset=2")
        .to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert_eq!(body["posts"][0]["title"], "oldest");
    assert_eq!(body["posts"][0]["type"], "blog");
    assert!(body["posts"][0]["createdAt"].is_string());
}

#[actix_web::test]
async fn test_list_clamps_limit() {
    let posts = (0..60)
        .map(|i| post(&format!("p{i}"), Duration::minutes(i)))
        .collect();
    let app = app!(fixture(posts).state);

    let req = test::TestRequest::get().uri("/api/blog?limit=500").to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert_eq!(body["posts"].as_array().unwrap().len(), 50);

    let req = test::TestRequest::get().uri("/api/blog?limit=0").to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert_eq!(body["posts"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_negative_offset_is_rejected() {
    let app = app!(fixture(vec![]).state);
    let req = test::TestRequest::get().uri("/api/blog?offset=-1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_get_by_id_both_forms() {
    let existing = post("findable", Duration::hours(2));
    let id = existing.id;
    let app = app!(fixture(vec![existing]).state);

    let req = test::TestRequest::get()
        .uri(&format!("/api/blog/{id}"))
        .to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert_eq!(body["post"]["title"], "findable");

    let req = test::TestRequest::get()
        .uri(&format!("/api/blog?id={id}"))
        .to_request();
    let body = json_body(test::call_service(&app, req).await).await;
    assert_eq!(body["post"]["id"], id.to_string());
}

#[actix_web::test]
async fn test_get_unknown_and_malformed_ids() {
    let app = app!(fixture(vec![]).state);

    let req = test::TestRequest::get()
        .uri(&format!("/api/blog/{}", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(resp).await["detail"], "Post not found");

    let req = test::TestRequest::get().uri("/api/blog/not-a-uuid").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_generate_honours_requested_type_and_topic() {
    let fx = fixture(vec![]);
    let repo = fx.state.posts.clone();
    let app = app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/blog/generate")
        .set_json(json!({"topic": "Security", "type": "case-study"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["post"]["type"], "case-study");
    assert_eq!(body["post"]["topic"], "Security");
    assert_eq!(
        body["post"]["caseStudyLink"],
        "https://www.thoughtworks.com/radar"
    );
    assert_eq!(repo.list(10, 0).await.unwrap().len(), 1);
}

#[actix_web::test]
async fn test_generate_with_empty_body_picks_at_random() {
    let app = app!(fixture(vec![]).state);
    let req = test::TestRequest::post().uri("/api/blog/generate").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert!(!body["post"]["topic"].as_str().unwrap().is_empty());
}

#[actix_web::test]
async fn test_generate_rejects_unknown_type() {
    let app = app!(fixture(vec![]).state);
    let req = test::TestRequest::post()
        .uri("/api/blog/generate")
        .set_json(json!({"type": "podcast"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_generate_unavailable_without_generator() {
    let mut state = fixture(vec![]).state;
    state.generator = None;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/blog/generate")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn test_cron_requires_secret() {
    let app = app!(fixture(vec![]).state);

    let req = test::TestRequest::get()
        .uri("/api/cron/generate-content")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let req = test::TestRequest::get()
        .uri("/api/cron/generate-content")
        .insert_header(("Authorization", "Bearer wrong"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn test_cron_rejects_everyone_without_configured_secret() {
    let mut state = fixture(vec![]).state;
    state.cron_secret = None;
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/cron/generate-content")
        .insert_header(("Authorization", "Bearer "))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn test_cron_skips_when_recent_post_exists() {
    let app = app!(fixture(vec![post("fresh", Duration::days(1))]).state);

    let req = test::TestRequest::get()
        .uri("/api/cron/generate-content")
        .insert_header(("Authorization", format!("Bearer {SECRET}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["daysSinceLastPost"], 1);
    assert!(body.get("post").is_none());
}

#[actix_web::test]
async fn test_cron_generates_when_stale() {
    let app = app!(fixture(vec![post("stale", Duration::days(3))]).state);

    let req = test::TestRequest::get()
        .uri("/api/cron/generate-content")
        .insert_header(("Authorization", format!("Bearer {SECRET}")))
        .to_request();
    let body = json_body(test::call_service(&app, req).await).await;

    assert_eq!(body["message"], "Content generated successfully");
    assert_eq!(body["post"]["title"], "Shipping small batches");
    assert!(body["post"]["id"].is_string());
}

#[actix_web::test]
async fn test_contact_sends_to_owner() {
    let fx = fixture(vec![]);
    let mailer = fx.mailer.clone();
    let app = app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/contact")
        .set_json(json!({
            "name": "Grace",
            "email": "grace@example.org",
            "subject": "Project",
            "message": "Let's talk"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["emailId"], "email_1");

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent[0].to, vec!["owner@example.com".to_string()]);
    assert_eq!(sent[0].reply_to.as_deref(), Some("grace@example.org"));
}

#[actix_web::test]
async fn test_contact_validation() {
    let fx = fixture(vec![]);
    let mailer = fx.mailer.clone();
    let app = app!(fx.state);

    for body in [
        json!({"name": "Grace", "email": "grace@example.org", "subject": "Hi"}),
        json!({"name": "Grace", "email": "not-an-email", "subject": "Hi", "message": "m"}),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/contact")
            .set_json(body)
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );
    }
    assert!(mailer.sent.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn test_lead_sends_notification_and_welcome() {
    let fx = fixture(vec![]);
    let mailer = fx.mailer.clone();
    let app = app!(fx.state);

    let req = test::TestRequest::post()
        .uri("/api/send-lead")
        .set_json(json!({
            "leadData": {
                "name": "Linus",
                "email": "linus@example.org",
                "projectType": "website",
                "budget": "professional",
                "timeline": "1-3months",
                "description": "A new site"
            }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["success"], true);
    assert!(body["leadNotificationId"].is_string());
    assert!(body["welcomeEmailId"].is_string());

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    let notification = sent
        .iter()
        .find(|m| m.to == vec!["owner@example.com".to_string()])
        .unwrap();
    assert!(notification.subject.starts_with("MEDIUM Priority Lead"));
    assert!(sent.iter().any(|m| m.to == vec!["linus@example.org".to_string()]));
}

#[actix_web::test]
async fn test_lead_without_payload_is_rejected() {
    let app = app!(fixture(vec![]).state);
    let req = test::TestRequest::post()
        .uri("/api/send-lead")
        .set_json(json!({}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn test_lead_unavailable_without_mail() {
    let mut state = fixture(vec![]).state;
    state.outbox = None;
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/send-lead")
        .set_json(json!({"leadData": {"name": "A", "email": "a@b.co", "description": "d"}}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[cfg(feature = "rate-limit")]
#[actix_web::test]
async fn test_contact_is_rate_limited_per_client() {
    use folio_core::ports::RateLimiter;
    use folio_infra::{InMemoryRateLimiter, RateLimitConfig};

    let mut state = fixture(vec![]).state;
    let limiter: Arc<dyn RateLimiter> = Arc::new(InMemoryRateLimiter::new(RateLimitConfig {
        max_requests: 1,
        window: std::time::Duration::from_secs(60),
    }));
    state.rate_limiter = Some(limiter);
    let app = app!(state);

    let contact = || {
        test::TestRequest::post()
            .uri("/api/contact")
            .peer_addr("203.0.113.9:4000".parse().unwrap())
            .set_json(json!({
                "name": "Grace",
                "email": "grace@example.org",
                "subject": "Hi",
                "message": "m"
            }))
            .to_request()
    };

    assert_eq!(test::call_service(&app, contact()).await.status(), StatusCode::OK);
    let resp = test::call_service(&app, contact()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key("Retry-After"));
}
