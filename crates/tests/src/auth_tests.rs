use crate::fixtures::seed::REALTOR_PASSWORD;
use crate::fixtures::test_app::TestApp;
use serde_json::{Value, json};

#[tokio::test]
async fn realtor_registration_starts_pending() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/api/realtor-auth/register"))
        .json(&json!({
            "email": "Ada@Realty.test",
            "password": REALTOR_PASSWORD,
            "full_name": "Ada Realty",
            "phone": "+2348000000000",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["email"], "ada@realty.test");
    assert_eq!(json["status"], "pending");
    assert!(json["approved_at"].is_null());
    assert!(json.get("password_hash").is_none());
}

#[tokio::test]
async fn pending_login_flags_needs_approval() {
    let app = TestApp::spawn().await;
    app.register_realtor("pending@realty.test").await;

    let resp = app
        .client
        .post(app.url("/api/realtor-auth/login"))
        .json(&json!({ "email": "pending@realty.test", "password": REALTOR_PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    assert!(json["token"].is_string());
    assert_eq!(json["expires_in"], app.settings.jwt.token_ttl_secs);
    assert_eq!(json["needs_approval"], true);
    assert_eq!(json["realtor"]["status"], "pending");
}

#[tokio::test]
async fn duplicate_realtor_email_is_rejected() {
    let app = TestApp::spawn().await;
    app.register_realtor("dup@realty.test").await;

    let resp = app
        .client
        .post(app.url("/api/realtor-auth/register"))
        .json(&json!({
            "email": "DUP@realty.test",
            "password": REALTOR_PASSWORD,
            "full_name": "Someone Else",
            "phone": "+2348000000001",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "error");
    assert!(json["message"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn wrong_password_is_unauthenticated() {
    let app = TestApp::spawn().await;
    app.register_realtor("ada@realty.test").await;

    let resp = app
        .client
        .post(app.url("/api/realtor-auth/login"))
        .json(&json!({ "email": "ada@realty.test", "password": "not-the-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);

    let resp = app
        .client
        .post(app.url("/api/realtor-auth/login"))
        .json(&json!({ "email": "nobody@realty.test", "password": "whatever123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
async fn realtor_me_and_profile_update() {
    let app = TestApp::spawn().await;
    let realtor = app.register_realtor("ada@realty.test").await;

    let resp = app.auth_get("/api/realtor-auth/me", &realtor.token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let me: Value = resp.json().await.unwrap();
    assert_eq!(me["id"], realtor.id.as_str());
    assert!(me["last_login_at"].is_string());

    let resp = app
        .auth_put("/api/realtor-auth/profile", &realtor.token)
        .json(&json!({ "business_name": "Ada Premium Homes" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["business_name"], "Ada Premium Homes");
    assert_eq!(updated["full_name"], "Ada Realty");
}

#[tokio::test]
async fn bootstrap_admin_can_log_in() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let resp = app.auth_get("/api/admin-auth/me", &token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["email"], "root@hostelhub.test");
    assert_eq!(json["role"], "super-admin");
}

#[tokio::test]
async fn tokens_are_scoped_to_their_role() {
    let app = TestApp::spawn().await;
    let realtor = app.register_realtor("ada@realty.test").await;
    let admin = app.admin_token().await;

    let resp = app.auth_get("/api/admin-auth/me", &realtor.token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 403);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "wrong_role");

    let resp = app.auth_get("/api/realtor-auth/me", &admin).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn only_super_admins_create_admins() {
    let app = TestApp::spawn().await;
    let root = app.admin_token().await;

    let resp = app
        .auth_post("/api/admin-auth/admins", &root)
        .json(&json!({
            "email": "ops@hostelhub.test",
            "password": "OpsPass123!",
            "full_name": "Ops Admin",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["role"], "admin");

    let resp = app
        .client
        .post(app.url("/api/admin-auth/login"))
        .json(&json!({ "email": "ops@hostelhub.test", "password": "OpsPass123!" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let login: Value = resp.json().await.unwrap();
    let ops_token = login["token"].as_str().unwrap();

    let resp = app
        .auth_post("/api/admin-auth/admins", ops_token)
        .json(&json!({
            "email": "another@hostelhub.test",
            "password": "Another123!",
            "full_name": "Another Admin",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn student_register_login_and_me() {
    let app = TestApp::spawn().await;
    let student = app.register_student("chidi@uni.test").await;

    let resp = app.auth_get("/api/student-auth/me", &student.token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let me: Value = resp.json().await.unwrap();
    assert_eq!(me["id"], student.id.as_str());
    assert_eq!(me["email"], "chidi@uni.test");

    let resp = app
        .client
        .post(app.url("/api/student-auth/login"))
        .json(&json!({ "email": "chidi@uni.test", "password": "Student123!" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert!(json["token"].is_string());
}
