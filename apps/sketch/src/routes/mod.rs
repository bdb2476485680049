pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;
use crate::wizard::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Wizard API
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route("/api/v1/sessions/:id/start", post(handlers::handle_start))
        .route("/api/v1/sessions/:id/roles", get(handlers::handle_list_roles))
        .route("/api/v1/sessions/:id/role", post(handlers::handle_choose_role))
        .route("/api/v1/sessions/:id/skills", put(handlers::handle_set_skill))
        .route("/api/v1/sessions/:id/submit", post(handlers::handle_submit))
        .route("/api/v1/sessions/:id/back", post(handlers::handle_back))
        .route("/api/v1/sessions/:id/restart", post(handlers::handle_restart))
        .route(
            "/api/v1/sessions/:id/completed",
            post(handlers::handle_toggle_completed),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::evaluation_client::{EvaluationError, EvaluationService};
    use crate::models::{EvaluationResult, Role, SkillProfile};
    use crate::wizard::store::SessionStore;

    /// Canned evaluation backend. `failure` turns every call into an API error.
    struct StubEvaluator {
        failure: Option<(u16, &'static str)>,
    }

    impl StubEvaluator {
        fn error(&self) -> Option<EvaluationError> {
            self.failure.map(|(status, message)| EvaluationError::Api {
                status,
                message: message.to_string(),
            })
        }
    }

    #[async_trait]
    impl EvaluationService for StubEvaluator {
        async fn roles(&self) -> Result<Vec<Role>, EvaluationError> {
            if let Some(e) = self.error() {
                return Err(e);
            }
            Ok(vec![serde_json::from_value(json!({
                "id": "SDE", "label": "SDE", "description": "Core CS & Systems",
                "skills": ["DSA", "OS"]
            }))
            .unwrap()])
        }

        async fn evaluate(
            &self,
            _role_id: &str,
            profile: &SkillProfile,
        ) -> Result<EvaluationResult, EvaluationError> {
            if let Some(e) = self.error() {
                return Err(e);
            }
            let dsa = profile.get("DSA").copied().unwrap_or(0.0);
            Ok(serde_json::from_value(json!({
                "role_requirements_full": {
                    "DSA": { "weight": 0.20, "required": 0.8 },
                    "OS": { "weight": 0.10, "required": 0.5 }
                },
                "gaps": { "DSA": (0.8 - dsa).max(0.0), "OS": 0.5 },
                "plan": {
                    "weeks": { "1": ["res_neetcode", "dangling"], "2": [] },
                    "selected_resources": [
                        { "id": "res_neetcode", "title": "NeetCode 150", "priority": "high",
                          "icon_type": "code", "covered_skills": ["DSA"] }
                    ]
                }
            }))
            .unwrap())
        }
    }

    fn app(failure: Option<(u16, &'static str)>) -> Router {
        build_router(AppState {
            config: Config::default(),
            evaluator: Arc::new(StubEvaluator { failure }),
            sessions: SessionStore::default(),
        })
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn new_session(app: &Router) -> String {
        let (status, view) = call(app, Method::POST, "/api/v1/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(view["screen"], "landing");
        view["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(None);
        let (status, body) = call(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["active_sessions"], 0);
        assert_eq!(body["session_ttl_secs"], 1800);
    }

    #[tokio::test]
    async fn test_full_wizard_flow() {
        let app = app(None);
        let id = new_session(&app).await;
        let base = format!("/api/v1/sessions/{id}");

        let (_, view) = call(&app, Method::POST, &format!("{base}/start"), None).await;
        assert_eq!(view["screen"], "role_select");

        let (status, roles) = call(&app, Method::GET, &format!("{base}/roles"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(roles["roles"][0]["skills"], json!(["DSA", "OS"]));
        assert_eq!(roles["banner"], Value::Null);

        let (_, view) = call(
            &app,
            Method::POST,
            &format!("{base}/role"),
            Some(json!({ "role_id": "SDE" })),
        )
        .await;
        assert_eq!(view["screen"], "skill_input");
        assert_eq!(view["skills"], json!([{ "skill": "DSA", "value": 0 }, { "skill": "OS", "value": 0 }]));

        let (_, view) = call(
            &app,
            Method::PUT,
            &format!("{base}/skills"),
            Some(json!({ "skill": "DSA", "value": 50 })),
        )
        .await;
        assert_eq!(view["skills"][0]["value"], 50);

        let (status, view) = call(&app, Method::POST, &format!("{base}/submit"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["screen"], "results");
        assert_eq!(view["submitting"], false);

        let presentation = &view["results"]["presentation"];
        assert_eq!(presentation["radar"], json!([
            { "skill": "DSA", "value": 50.0 },
            { "skill": "OS", "value": 0.0 }
        ]));
        assert_eq!(presentation["importance"][0]["skill"], "DSA");
        assert_eq!(presentation["weeks"][0]["resources"].as_array().unwrap().len(), 1);
        assert_eq!(presentation["weeks"][1]["resources"], json!([]));
        assert_eq!(
            presentation["weeks"][0]["resources"][0]["explanation"],
            "High priority: Covers critical skills (DSA) with 20% role weight and 30% skill gap"
        );

        let (status, toggled) = call(
            &app,
            Method::POST,
            &format!("{base}/completed"),
            Some(json!({ "week": "1", "resource_id": "res_neetcode" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(toggled["completed"], true);
        assert_eq!(toggled["view"]["results"]["presentation"], *presentation);

        let (_, view) = call(&app, Method::POST, &format!("{base}/restart"), None).await;
        assert_eq!(view["screen"], "landing");
        assert_eq!(view["selected_role"], Value::Null);
        assert!(view.get("results").is_none());
    }

    #[tokio::test]
    async fn test_submit_failure_becomes_banner() {
        let app = app(Some((400, "Unknown role: SDE")));
        let id = new_session(&app).await;
        let base = format!("/api/v1/sessions/{id}");

        call(&app, Method::POST, &format!("{base}/start"), None).await;
        let (_, roles) = call(&app, Method::GET, &format!("{base}/roles"), None).await;
        // Built-in catalog when the service fails.
        assert_eq!(roles["roles"].as_array().unwrap().len(), 2);
        assert_eq!(roles["banner"], "Unknown role: SDE");

        call(
            &app,
            Method::POST,
            &format!("{base}/role"),
            Some(json!({ "role_id": "SDE" })),
        )
        .await;
        let (status, view) = call(&app, Method::POST, &format!("{base}/submit"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["screen"], "skill_input");
        assert_eq!(view["banner"], "Unknown role: SDE");
        assert_eq!(view["submitting"], false);
    }

    #[tokio::test]
    async fn test_invalid_transition_is_conflict() {
        let app = app(None);
        let id = new_session(&app).await;

        let (status, body) = call(&app, Method::POST, &format!("/api/v1/sessions/{id}/submit"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "INVALID_TRANSITION");

        let (status, _) = call(&app, Method::POST, &format!("/api/v1/sessions/{id}/back"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let app = app(None);
        let (status, body) = call(
            &app,
            Method::GET,
            "/api/v1/sessions/00000000-0000-0000-0000-000000000000",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_session_expires_to_not_found() {
        let app = build_router(AppState {
            config: Config::default(),
            evaluator: Arc::new(StubEvaluator { failure: None }),
            sessions: SessionStore::new(Duration::from_secs(60)),
        });
        let id = new_session(&app).await;
        let uri = format!("/api/v1/sessions/{id}");

        let (status, _) = call(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);

        tokio::time::advance(Duration::from_secs(61)).await;
        let (status, body) = call(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_delete_session() {
        let app = app(None);
        let id = new_session(&app).await;
        let uri = format!("/api/v1/sessions/{id}");

        let (status, _) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_empty_role_id_rejected() {
        let app = app(None);
        let id = new_session(&app).await;
        call(&app, Method::POST, &format!("/api/v1/sessions/{id}/start"), None).await;
        let (status, body) = call(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/role"),
            Some(json!({ "role_id": " " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
