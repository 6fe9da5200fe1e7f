use std::error::Error;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use rbac_console_application::{RbacApi, RoleWorkflow, UserWorkflow};
use rbac_console_core::NonEmptyString;
use rbac_console_domain::{NewRole, NewUser, PermissionList, RoleId, UserId};
use rbac_console_infrastructure::InMemoryRbacApi;
use tower::ServiceExt;

use super::build_router;
use crate::state::AppState;

type TestResult = Result<(), Box<dyn Error + Send + Sync>>;

fn app_with(api: Arc<InMemoryRbacApi>) -> Router {
    let api: Arc<dyn RbacApi> = api;
    build_router(AppState {
        roles: RoleWorkflow::new(api.clone()),
        users: UserWorkflow::new(api),
    })
}

fn get(uri: &str) -> Result<Request<Body>, axum::http::Error> {
    Request::builder().method("GET").uri(uri).body(Body::empty())
}

fn form_post(uri: &str, body: &str) -> Result<Request<Body>, axum::http::Error> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_owned()))
}

async fn send(
    app: &Router,
    request: Request<Body>,
) -> Result<(StatusCode, String), Box<dyn Error + Send + Sync>> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok((status, String::from_utf8(bytes.to_vec())?))
}

async fn seed_role(
    api: &InMemoryRbacApi,
    name: &str,
    permissions: &str,
) -> Result<RoleId, Box<dyn Error + Send + Sync>> {
    api.create_role(NewRole {
        name: NonEmptyString::new(name)?,
        permissions: PermissionList::parse(permissions)?,
    })
    .await?;

    let roles = api.list_roles().await?;
    let role = roles
        .iter()
        .find(|role| role.name() == name)
        .ok_or("seeded role missing")?;
    Ok(role.id().clone())
}

async fn seed_user(
    api: &InMemoryRbacApi,
    email: &str,
    role: &RoleId,
) -> Result<UserId, Box<dyn Error + Send + Sync>> {
    api.create_user(NewUser {
        name: NonEmptyString::new("Alice")?,
        email: NonEmptyString::new(email)?,
        role: role.clone(),
    })
    .await?;

    let users = api.list_users().await?;
    let user = users
        .iter()
        .find(|user| user.email() == email)
        .ok_or("seeded user missing")?;
    Ok(user.id().clone())
}

#[tokio::test]
async fn health_reports_ok() -> TestResult {
    let app = app_with(Arc::new(InMemoryRbacApi::new()));

    let (status, body) = send(&app, get("/health")?).await?;

    assert_eq!(status, StatusCode::OK);
    let payload: serde_json::Value = serde_json::from_str(&body)?;
    assert_eq!(payload, serde_json::json!({ "status": "ok" }));
    Ok(())
}

#[tokio::test]
async fn landing_links_role_and_user_pages() -> TestResult {
    let app = app_with(Arc::new(InMemoryRbacApi::new()));

    let (status, body) = send(&app, get("/")?).await?;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Role-Based Access Control System"));
    assert!(body.contains("href=\"/roles\""));
    assert!(body.contains("href=\"/users\""));
    Ok(())
}

#[tokio::test]
async fn added_role_is_rendered_after_refetch() -> TestResult {
    let app = app_with(Arc::new(InMemoryRbacApi::new()));

    let (_, body) = send(&app, get("/roles")?).await?;
    assert!(body.contains("No roles available."));

    let (status, body) = send(
        &app,
        form_post("/roles", "name=Admin&permissions=manage%2Cview")?,
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.matches("<tr><td>").count(), 1);
    assert!(body.contains("<td>Admin</td><td>manage, view</td>"));
    Ok(())
}

#[tokio::test]
async fn invalid_role_form_shows_messages() -> TestResult {
    let api = Arc::new(InMemoryRbacApi::new());
    let app = app_with(api.clone());

    let (status, body) = send(&app, form_post("/roles", "name=&permissions=+")?).await?;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("Role name is required."));
    assert!(body.contains("Permissions are required."));
    assert!(api.list_roles().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn role_delete_waits_for_confirmation() -> TestResult {
    let api = Arc::new(InMemoryRbacApi::new());
    let role_id = seed_role(&api, "Admin", "manage").await?;
    let app = app_with(api.clone());
    send(&app, get("/roles")?).await?;

    let (_, body) = send(&app, form_post(&format!("/roles/{role_id}/delete"), "")?).await?;
    assert!(body.contains("Are you sure you want to delete the role Admin?"));

    let (_, body) = send(&app, form_post("/roles/delete/cancel", "")?).await?;
    assert!(!body.contains("Are you sure"));
    assert_eq!(api.list_roles().await?.len(), 1);

    let (_, body) = send(&app, form_post(&format!("/roles/{role_id}/delete"), "")?).await?;
    assert!(body.contains(&format!(
        "<input type=\"hidden\" name=\"role_id\" value=\"{role_id}\">"
    )));
    let (status, body) = send(
        &app,
        form_post("/roles/delete/confirm", &format!("role_id={role_id}"))?,
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No roles available."));
    assert!(api.list_roles().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn permissions_editor_updates_role() -> TestResult {
    let api = Arc::new(InMemoryRbacApi::new());
    let role_id = seed_role(&api, "Admin", "manage").await?;
    let app = app_with(api);
    send(&app, get("/roles")?).await?;

    let (_, body) = send(
        &app,
        form_post(&format!("/roles/{role_id}/permissions"), "")?,
    )
    .await?;
    assert!(body.contains("Edit Permissions"));
    assert!(body.contains("value=\"manage\""));
    assert!(body.contains(&format!("name=\"role_id\" value=\"{role_id}\"")));

    let (status, body) = send(
        &app,
        form_post(
            "/roles/permissions",
            &format!("role_id={role_id}&permissions=manage%2C+audit"),
        )?,
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("Edit Permissions"));
    assert!(body.contains("<td>manage, audit</td>"));
    Ok(())
}

#[tokio::test]
async fn unknown_role_editor_is_not_found() -> TestResult {
    let app = app_with(Arc::new(InMemoryRbacApi::new()));
    send(&app, get("/roles")?).await?;

    let (status, _) = send(&app, form_post("/roles/missing/permissions", "")?).await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn added_user_is_listed_with_role_name() -> TestResult {
    let api = Arc::new(InMemoryRbacApi::new());
    let role_id = seed_role(&api, "Admin", "manage").await?;
    let app = app_with(api);

    let (_, body) = send(&app, get("/users")?).await?;
    assert!(body.contains("No users available."));
    assert!(body.contains(">Admin</option>"));

    let (status, body) = send(
        &app,
        form_post(
            "/users",
            &format!("name=Bob&email=bob%40example.com&role={role_id}"),
        )?,
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<td>Bob</td><td>bob@example.com</td><td>Admin</td>"));
    assert!(body.contains("<option value=\"Active\" selected>Active</option>"));
    Ok(())
}

#[tokio::test]
async fn invalid_user_form_shows_messages() -> TestResult {
    let app = app_with(Arc::new(InMemoryRbacApi::new()));

    let (status, body) = send(&app, form_post("/users", "name=&email=&role=")?).await?;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("Name is required"));
    assert!(body.contains("Email is required"));
    assert!(body.contains("Role is required"));
    Ok(())
}

#[tokio::test]
async fn status_change_applies_without_confirmation() -> TestResult {
    let api = Arc::new(InMemoryRbacApi::new());
    let role_id = seed_role(&api, "Admin", "manage").await?;
    let user_id = seed_user(&api, "alice@example.com", &role_id).await?;
    let app = app_with(api.clone());
    send(&app, get("/users")?).await?;

    let (status, body) = send(
        &app,
        form_post(&format!("/users/{user_id}/status"), "status=Inactive")?,
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<option value=\"Inactive\" selected>Inactive</option>"));
    assert!(!body.contains("Are you sure"));
    Ok(())
}

#[tokio::test]
async fn unknown_status_is_rejected() -> TestResult {
    let api = Arc::new(InMemoryRbacApi::new());
    let role_id = seed_role(&api, "Admin", "manage").await?;
    let user_id = seed_user(&api, "alice@example.com", &role_id).await?;
    let app = app_with(api);

    let (status, _) = send(
        &app,
        form_post(&format!("/users/{user_id}/status"), "status=Suspended")?,
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn role_editor_reassigns_user() -> TestResult {
    let api = Arc::new(InMemoryRbacApi::new());
    let admin = seed_role(&api, "Admin", "manage").await?;
    let viewer = seed_role(&api, "Viewer", "view").await?;
    let user_id = seed_user(&api, "alice@example.com", &admin).await?;
    let app = app_with(api);
    send(&app, get("/users")?).await?;

    let (_, body) = send(&app, form_post(&format!("/users/{user_id}/role"), "")?).await?;
    assert!(body.contains("Change User Role"));
    assert!(body.contains(&format!("<option value=\"{admin}\" selected>Admin</option>")));

    let (status, body) = send(
        &app,
        form_post("/users/role", &format!("user_id={user_id}&role={viewer}"))?,
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("Change User Role"));
    assert!(body.contains("<td>alice@example.com</td><td>Viewer</td>"));
    Ok(())
}

#[tokio::test]
async fn user_delete_waits_for_confirmation() -> TestResult {
    let api = Arc::new(InMemoryRbacApi::new());
    let role_id = seed_role(&api, "Admin", "manage").await?;
    let user_id = seed_user(&api, "alice@example.com", &role_id).await?;
    let app = app_with(api.clone());
    send(&app, get("/users")?).await?;

    let (_, body) = send(&app, form_post(&format!("/users/{user_id}/delete"), "")?).await?;
    assert!(body.contains("Are you sure you want to delete this user?"));
    assert_eq!(api.list_users().await?.len(), 1);

    let (_, body) = send(
        &app,
        form_post("/users/delete/confirm", &format!("user_id={user_id}"))?,
    )
    .await?;

    assert!(body.contains("No users available."));
    assert!(api.list_users().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn role_confirmation_for_another_role_deletes_nothing() -> TestResult {
    let api = Arc::new(InMemoryRbacApi::new());
    let admin = seed_role(&api, "Admin", "manage").await?;
    let viewer = seed_role(&api, "Viewer", "view").await?;
    let app = app_with(api.clone());
    send(&app, get("/roles")?).await?;

    send(&app, form_post(&format!("/roles/{viewer}/delete"), "")?).await?;
    let (status, body) = send(
        &app,
        form_post("/roles/delete/confirm", &format!("role_id={admin}"))?,
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Are you sure you want to delete the role Viewer?"));
    assert_eq!(api.list_roles().await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn user_confirmation_without_pending_delete_deletes_nothing() -> TestResult {
    let api = Arc::new(InMemoryRbacApi::new());
    let role_id = seed_role(&api, "Admin", "manage").await?;
    let user_id = seed_user(&api, "alice@example.com", &role_id).await?;
    let other = seed_user(&api, "carol@example.com", &role_id).await?;
    let app = app_with(api.clone());
    send(&app, get("/users")?).await?;

    send(&app, form_post(&format!("/users/{other}/delete"), "")?).await?;
    let (status, body) = send(
        &app,
        form_post("/users/delete/confirm", &format!("user_id={user_id}"))?,
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(&format!(
        "<input type=\"hidden\" name=\"user_id\" value=\"{other}\">"
    )));
    assert_eq!(api.list_users().await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn permissions_for_another_role_change_nothing() -> TestResult {
    let api = Arc::new(InMemoryRbacApi::new());
    let admin = seed_role(&api, "Admin", "manage").await?;
    let viewer = seed_role(&api, "Viewer", "view").await?;
    let app = app_with(api.clone());
    send(&app, get("/roles")?).await?;

    send(&app, form_post(&format!("/roles/{viewer}/permissions"), "")?).await?;
    let (status, body) = send(
        &app,
        form_post(
            "/roles/permissions",
            &format!("role_id={admin}&permissions=audit"),
        )?,
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Edit Permissions"));
    assert!(body.contains("<td>Admin</td><td>manage</td>"));
    Ok(())
}

#[tokio::test]
async fn role_actions_load_roles_on_first_request() -> TestResult {
    let api = Arc::new(InMemoryRbacApi::new());
    let role_id = seed_role(&api, "Admin", "manage").await?;
    let app = app_with(api);

    let (status, body) = send(&app, form_post(&format!("/roles/{role_id}/delete"), "")?).await?;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Are you sure you want to delete the role Admin?"));
    Ok(())
}

#[tokio::test]
async fn user_actions_load_users_on_first_request() -> TestResult {
    let api = Arc::new(InMemoryRbacApi::new());
    let role_id = seed_role(&api, "Admin", "manage").await?;
    let user_id = seed_user(&api, "alice@example.com", &role_id).await?;
    let app = app_with(api);

    let (status, body) = send(&app, form_post(&format!("/users/{user_id}/role"), "")?).await?;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Change User Role"));
    assert!(body.contains(&format!("<option value=\"{role_id}\" selected>Admin</option>")));
    Ok(())
}
