//! Read-only lookup of a user's projects and their legal entities.

use lambda_http::{Body, Request, RequestExt, Response};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::{respond, screen_method};
use crate::http::{error_response, CorsPolicy};
use crate::store::ProjectStore;

const USER_HEADER: &str = "X-User-Email";

/// Header first, then the `email` query parameter.
fn user_email(event: &Request) -> Option<String> {
    let from_header = event
        .headers()
        .get(USER_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());

    from_header.or_else(|| {
        event
            .query_string_parameters()
            .first("email")
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
    })
}

/// Handle a projects lookup
pub async fn handle_user_projects<S>(event: &Request, store: &S) -> Response<Body>
where
    S: ProjectStore + ?Sized,
{
    if let Some(response) = screen_method(event, "GET", &CorsPolicy::USER_LOOKUP) {
        return response;
    }

    let Some(email) = user_email(event) else {
        tracing::info!("projects lookup without user email");
        return error_response(400, "User email is required");
    };

    respond("user-data", load_projects(&email, store).await)
}

async fn load_projects<S>(email: &str, store: &S) -> Result<Value, ApiError>
where
    S: ProjectStore + ?Sized,
{
    let projects = store.projects_for_user(email).await?;

    tracing::info!(count = projects.len(), "loaded user projects");

    Ok(json!({
        "userEmail": email,
        "projects": projects,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::handlers::test_support::{body_json, request};
    use crate::store::testing::StaticProjectStore;
    use crate::store::UserProjectRow;

    fn store() -> StaticProjectStore {
        StaticProjectStore {
            rows: vec![
                UserProjectRow {
                    project_id: 2,
                    title: Some("Склад Подольск".to_string()),
                    status: Some("in_progress".to_string()),
                    user_role: Some("viewer".to_string()),
                    ..Default::default()
                },
                UserProjectRow {
                    project_id: 1,
                    title: Some("Офис на Тверской".to_string()),
                    budget: Some(1200000.0),
                    user_role: Some("owner".to_string()),
                    legal_entity_id: Some(5),
                    legal_entity_name: Some("ООО Вектор".to_string()),
                    kpp: Some("770101001".to_string()),
                    director_name: Some("Петров П.П.".to_string()),
                    ..Default::default()
                },
            ],
            fail: false,
        }
    }

    fn get_with_query(email: &str) -> Request {
        let mut params = HashMap::new();
        params.insert("email".to_string(), email.to_string());
        request("GET", "").with_query_string_parameters(params)
    }

    #[tokio::test]
    async fn test_projects_with_and_without_legal_entity() {
        let response = handle_user_projects(&get_with_query("client@site.ru"), &store()).await;

        assert_eq!(response.status(), 200);
        let body = body_json(&response);
        assert_eq!(body["userEmail"], "client@site.ru");

        let projects = body["projects"].as_array().unwrap();
        assert_eq!(projects.len(), 2);

        assert_eq!(projects[0]["project"]["id"], 2);
        assert!(projects[0]["legalEntity"].is_null());
        assert!(projects[0]["project"]["budget"].is_null());

        assert_eq!(projects[1]["project"]["id"], 1);
        assert_eq!(projects[1]["project"]["userRole"], "owner");
        assert_eq!(projects[1]["legalEntity"]["name"], "ООО Вектор");
        assert_eq!(projects[1]["legalEntity"]["directorName"], "Петров П.П.");
    }

    #[tokio::test]
    async fn test_header_wins_over_query() {
        let mut event = get_with_query("query@site.ru");
        event
            .headers_mut()
            .insert("x-user-email", "header@site.ru".parse().unwrap());

        let response = handle_user_projects(&event, &store()).await;
        assert_eq!(body_json(&response)["userEmail"], "header@site.ru");
    }

    #[tokio::test]
    async fn test_repeated_lookup_is_stable() {
        let store = store();
        let first = body_json(&handle_user_projects(&get_with_query("client@site.ru"), &store).await);
        let second = body_json(&handle_user_projects(&get_with_query("client@site.ru"), &store).await);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_email_is_400() {
        let response = handle_user_projects(&request("GET", ""), &store()).await;
        assert_eq!(response.status(), 400);
        assert_eq!(body_json(&response)["error"], "User email is required");

        let response = handle_user_projects(&get_with_query(""), &store()).await;
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_store_failure_is_500() {
        let failing = StaticProjectStore { rows: vec![], fail: true };
        let response = handle_user_projects(&get_with_query("client@site.ru"), &failing).await;

        assert_eq!(response.status(), 500);
        assert_eq!(
            body_json(&response)["error"],
            sqlx::Error::PoolTimedOut.to_string()
        );
    }

    #[tokio::test]
    async fn test_preflight_and_wrong_method() {
        let response = handle_user_projects(&request("OPTIONS", ""), &store()).await;
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers().get("Access-Control-Allow-Headers").unwrap(),
            "Content-Type, X-User-Email"
        );
        assert!(matches!(response.body(), Body::Empty));

        let response = handle_user_projects(&request("POST", "{}"), &store()).await;
        assert_eq!(response.status(), 405);
        assert_eq!(body_json(&response)["error"], "Method not allowed");
    }
}
