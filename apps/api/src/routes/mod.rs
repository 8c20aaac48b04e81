pub mod events;
pub mod health;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::require_api_token;
use crate::checklist::handlers as checklist;
use crate::contractors::handlers as contractors;
use crate::dashboard::handlers as dashboard;
use crate::drafting::handlers as drafting;
use crate::intake::handlers as intake;
use crate::state::AppState;
use crate::workflow::{analysis, award, feedback, handlers as workflow, invitations, proposals, selection};

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/proposal/submit/:rfp_id",
            get(proposals::handle_submission_page).post(proposals::handle_submit_proposal),
        );

    let protected = Router::new()
        // Intake and registry
        .route(
            "/api/v1/rfps",
            get(intake::handle_list_rfps).post(intake::handle_create_rfp),
        )
        .route(
            "/api/v1/rfps/:id",
            get(intake::handle_get_rfp)
                .patch(intake::handle_update_rfp)
                .delete(intake::handle_delete_rfp),
        )
        .route(
            "/api/v1/rfps/:id/documents",
            post(intake::handle_upload_documents),
        )
        .route("/api/v1/rfps/:id/events", get(events::handle_rfp_events))
        // Workflow
        .route("/api/v1/rfps/:id/workflow", get(workflow::handle_get_workflow))
        .route(
            "/api/v1/rfps/:id/stages/:stage/complete",
            post(workflow::handle_complete_stage),
        )
        .route("/api/v1/rfps/:id/selection", get(selection::handle_selection))
        .route(
            "/api/v1/rfps/:id/invitations",
            get(invitations::handle_list_invitations).post(selection::handle_invite),
        )
        .route(
            "/api/v1/rfps/:id/invitations/:cid/draft",
            post(invitations::handle_draft_invitation),
        )
        .route(
            "/api/v1/rfps/:id/invitations/:cid/send",
            post(invitations::handle_send_invitation),
        )
        .route(
            "/api/v1/rfps/:id/release/:cid/draft",
            post(invitations::handle_draft_release),
        )
        .route(
            "/api/v1/rfps/:id/proposals",
            get(proposals::handle_list_proposals).post(proposals::handle_add_proposal),
        )
        .route(
            "/api/v1/rfps/:id/reminders/:cid/draft",
            post(proposals::handle_draft_reminder),
        )
        .route(
            "/api/v1/rfps/:id/proposals/:pid/analyze",
            post(analysis::handle_analyze_proposal),
        )
        .route(
            "/api/v1/rfps/:id/analysis/compare",
            post(analysis::handle_compare_proposals),
        )
        .route("/api/v1/rfps/:id/award/draft", post(award::handle_draft_award))
        .route("/api/v1/rfps/:id/award", post(award::handle_finalize_award))
        .route(
            "/api/v1/rfps/:id/feedback/lessons",
            post(feedback::handle_lessons_learned),
        )
        // Checklist
        .route(
            "/api/v1/rfps/:id/checklist",
            get(checklist::handle_get_checklist).put(checklist::handle_save_checklist),
        )
        // Drafting
        .route(
            "/api/v1/rfps/:id/clarifications",
            get(drafting::handle_list_clarifications),
        )
        .route(
            "/api/v1/rfps/:id/clarifications/:cid/answer",
            post(drafting::handle_answer_clarification),
        )
        .route("/api/v1/templates", get(drafting::handle_list_templates))
        .route("/api/v1/guide", post(drafting::handle_user_guide))
        // Contractors
        .route(
            "/api/v1/contractors",
            get(contractors::handle_list_contractors).post(contractors::handle_create_contractor),
        )
        .route(
            "/api/v1/contractors/:id",
            get(contractors::handle_get_contractor).put(contractors::handle_update_contractor),
        )
        // Dashboard and reference data
        .route("/api/v1/dashboard", get(dashboard::handle_dashboard))
        .route("/api/v1/dashboard/gantt", get(dashboard::handle_gantt))
        .route("/api/v1/dashboard/map", get(dashboard::handle_map))
        .route("/api/v1/metros", get(dashboard::handle_list_metros))
        .route("/api/v1/metros/:code", get(dashboard::handle_get_metro))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_token,
        ));

    public.merge(protected).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::testing::{test_state, TEST_TOKEN};

    fn app() -> Router {
        build_router(test_state(vec![]).state)
    }

    fn authed(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {TEST_TOKEN}"));
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_requires_bearer_token() {
        let response = app()
            .oneshot(Request::get("/api/v1/rfps").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app()
            .oneshot(
                Request::get("/api/v1/rfps")
                    .header(header::AUTHORIZATION, "Bearer wrong")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_then_read_rfp() {
        let app = app();
        let form = json!({
            "projectName": "NYC Data Center Expansion",
            "scopeOfWork": "Install backup generators",
            "metroCode": "nyc",
            "contractorType": "Electrical",
            "estimatedBudget": "500000",
            "projectStartDate": "2025-01-01"
        });

        let response = app
            .clone()
            .oneshot(authed("POST", "/api/v1/rfps", Some(form)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["status"], "Draft");
        assert_eq!(created["metroCode"], "NYC");
        assert_eq!(created["eoiSent"], json!([]));

        let id = created["id"].as_str().unwrap();
        let response = app
            .oneshot(authed("GET", &format!("/api/v1/rfps/{id}"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["projectStartDate"], "2025-01-01");
    }

    #[tokio::test]
    async fn test_invalid_intake_reports_field_errors() {
        let response = app()
            .oneshot(authed(
                "POST",
                "/api/v1/rfps",
                Some(json!({ "projectName": "X", "estimatedBudget": -1 })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        let fields: Vec<&str> = body["error"]["details"]["fields"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|f| f["field"].as_str())
            .collect();
        assert!(fields.contains(&"estimatedBudget"));
        assert!(fields.contains(&"scopeOfWork"));
    }

    #[tokio::test]
    async fn test_unsaved_checklist_returns_seeded_defaults() {
        let app = app();
        let response = app
            .clone()
            .oneshot(authed(
                "POST",
                "/api/v1/rfps",
                Some(json!({
                    "projectName": "P", "scopeOfWork": "S", "metroCode": "DFW",
                    "contractorType": "Mechanical", "estimatedBudget": 10
                })),
            ))
            .await
            .unwrap();
        let id = body_json(response).await["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(authed("GET", &format!("/api/v1/rfps/{id}/checklist"), None))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["seeded"], true);
        assert_eq!(body["items"].as_array().unwrap().len(), 9);
    }

    #[tokio::test]
    async fn test_unknown_metro_is_not_found() {
        let response = app()
            .oneshot(authed("GET", "/api/v1/metros/zzz", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_public_submission_page_needs_no_token() {
        let harness = test_state(vec![]);
        let rfp = crate::models::rfp::Rfp::new(crate::testing::sample_fields());
        harness.state.store.insert_rfp(&rfp).await.unwrap();

        let response = build_router(harness.state)
            .oneshot(
                Request::get(format!("/proposal/submit/{}", rfp.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["projectName"], rfp.project_name);
    }
}
