//! Route handlers for the marketplace API.

pub mod chat;
pub mod courses;
pub mod health;
pub mod stats;
pub mod users;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Catalog
        .route(
            "/api/courses",
            get(courses::list_courses).post(courses::create_course),
        )
        .route("/api/courses/:id", get(courses::get_course))
        .route("/api/categories", get(courses::list_categories))
        // Assistant
        .route("/api/courses/:id/assistant", post(chat::prepare))
        .route("/api/courses/:id/chat", post(chat::ask))
        .route(
            "/api/courses/:id/chat/:session",
            get(chat::history).delete(chat::clear_history),
        )
        // Accounts
        .route("/api/users", post(users::register))
        .route("/api/users/sign-in", post(users::sign_in))
        .route("/api/users/:id", get(users::get_user))
        // Stats
        .route("/api/stats", get(stats::stats_api))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use base64::Engine;
    use course_service::{InMemoryIdentityProvider, ResponseGenerator, NOT_LOADED_REPLY};
    use database::Database;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use storage::{MemoryObjectStore, StoredMaterialUploader};
    use tower::ServiceExt;

    use super::*;

    async fn app() -> Router {
        let db = Database::in_memory().await.unwrap();
        let store = Arc::new(MemoryObjectStore::new());
        let uploader = Arc::new(StoredMaterialUploader::new(store, db.clone()));
        let state = AppState::new(
            db,
            uploader,
            Arc::new(InMemoryIdentityProvider::new()),
            ResponseGenerator::mock(),
        );
        router().with_state(state)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn tutor_body(email: &str) -> Value {
        json!({
            "name": "Ada Lovelace",
            "email": email,
            "password": "engines",
            "role": "tutor",
            "tutor_info": {
                "teachingExperience": "Ten years of tutoring",
                "expertise": "Analytical engines",
                "qualifications": "Self taught"
            }
        })
    }

    fn course_body(author_id: &str) -> Value {
        let transcript = base64::engine::general_purpose::STANDARD
            .encode("JavaScript is a programming language for the web.");
        json!({
            "author_id": author_id,
            "title": "JavaScript 101",
            "description": "Start here",
            "category": "Web",
            "level": "Beginner",
            "price": 10.0,
            "lessons": [
                {"title": "Intro", "duration": "05:00", "video": {"type": "upload", "filename": "intro.mp4"}}
            ],
            "materials": [
                {
                    "title": "Transcript",
                    "type": "transcript",
                    "file": {"filename": "t.txt", "contentType": "text/plain", "data": transcript}
                }
            ]
        })
    }

    #[tokio::test]
    async fn test_health() {
        let app = app().await;
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_register_and_sign_in() {
        let app = app().await;

        let (status, user) = send(&app, "POST", "/api/users", Some(tutor_body("ada@example.com"))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(user["role"], "tutor");

        let (status, _) = send(&app, "POST", "/api/users", Some(tutor_body("ada@example.com"))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, signed_in) = send(
            &app,
            "POST",
            "/api/users/sign-in",
            Some(json!({"email": "ada@example.com", "password": "engines"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(signed_in["id"], user["id"]);

        let (status, body) = send(
            &app,
            "POST",
            "/api/users/sign-in",
            Some(json!({"email": "ada@example.com", "password": "wrong"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_create_list_and_chat() {
        let app = app().await;
        let (_, user) = send(&app, "POST", "/api/users", Some(tutor_body("ada@example.com"))).await;
        let author_id = user["id"].as_str().unwrap().to_string();

        let (status, course) = send(&app, "POST", "/api/courses", Some(course_body(&author_id))).await;
        assert_eq!(status, StatusCode::CREATED);
        let course_id = course["id"].as_str().unwrap().to_string();
        assert_eq!(course["instructor"], "Ada Lovelace");

        let (status, listed) = send(&app, "GET", "/api/courses?category=Web&level=Beginner", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (_, listed) = send(&app, "GET", "/api/courses?category=Design", None).await;
        assert!(listed.as_array().unwrap().is_empty());

        // A filter form submitting its untouched fields still lists everything.
        let (status, listed) = send(
            &app,
            "GET",
            "/api/courses?search=&category=&level=&min_price=&max_price=",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (status, _) = send(&app, "GET", "/api/courses?level=Expert", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let chat_uri = format!("/api/courses/{}/chat", course_id);
        let question = json!({"session": "s1", "question": "What is JavaScript?"});

        let (_, reply) = send(&app, "POST", &chat_uri, Some(question.clone())).await;
        assert_eq!(reply["reply"], NOT_LOADED_REPLY);

        let (status, prepared) = send(
            &app,
            "POST",
            &format!("/api/courses/{}/assistant", course_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(prepared["ready"], true);

        let (_, reply) = send(&app, "POST", &chat_uri, Some(question)).await;
        assert!(reply["reply"]
            .as_str()
            .unwrap()
            .contains("JavaScript is a programming language"));

        let (_, history) = send(&app, "GET", &format!("{}/s1", chat_uri), None).await;
        assert_eq!(history.as_array().unwrap().len(), 2);

        let (status, _) = send(&app, "DELETE", &format!("{}/s1", chat_uri), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, history) = send(&app, "GET", &format!("{}/s1", chat_uri), None).await;
        assert!(history.as_array().unwrap().is_empty());

        let (_, stats) = send(&app, "GET", "/api/stats", None).await;
        assert_eq!(stats["course_count"], 1);
        assert_eq!(stats["tutor_count"], 1);
        assert_eq!(stats["student_count"], 0);
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let app = app().await;

        let (status, _) = send(&app, "GET", "/api/courses/course_missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let student = json!({
            "name": "Sam",
            "email": "sam@example.com",
            "password": "secret1",
            "role": "student"
        });
        let (_, user) = send(&app, "POST", "/api/users", Some(student)).await;
        let student_id = user["id"].as_str().unwrap().to_string();

        let (status, _) = send(&app, "POST", "/api/courses", Some(course_body(&student_id))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (_, tutor) = send(&app, "POST", "/api/users", Some(tutor_body("ada@example.com"))).await;
        let mut bad = course_body(tutor["id"].as_str().unwrap());
        bad["price"] = json!(-5.0);
        let (status, _) = send(&app, "POST", "/api/courses", Some(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let mut garbled = course_body(tutor["id"].as_str().unwrap());
        garbled["materials"][0]["file"]["data"] = json!("not base64!");
        let (status, body) = send(&app, "POST", "/api/courses", Some(garbled)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("base64"));
    }
}
