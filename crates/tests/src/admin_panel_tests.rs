use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn realtor_listing_filters_by_status() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    app.register_realtor("one@realty.test").await;
    app.register_realtor("two@realty.test").await;
    let active = app.register_realtor("three@realty.test").await;
    app.approve_realtor(&admin, &active.id).await;

    let pending: Value = app
        .auth_get("/api/admin-panel/realtors?status=pending", &admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(pending["total"], 2);
    for realtor in pending["items"].as_array().unwrap() {
        assert_eq!(realtor["status"], "pending");
    }

    let everyone: Value = app
        .auth_get("/api/admin-panel/realtors", &admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(everyone["total"], 3);

    let resp = app
        .auth_get("/api/admin-panel/realtors?status=banned", &admin)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn realtor_detail_includes_hostels() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let realtor = app.active_realtor("ada@realty.test").await;
    app.create_hostel(&realtor.token, "Sunrise Lodge", "North Gate", 50000).await;

    let detail: Value = app
        .auth_get(&format!("/api/admin-panel/realtors/{}", realtor.id), &admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["realtor"]["email"], "ada@realty.test");
    assert_eq!(detail["hostels"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn overview_counts_everything() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    app.register_realtor("pending@realty.test").await;
    let realtor = app.active_realtor("ada@realty.test").await;
    let hostel_id = app
        .create_hostel(&realtor.token, "Sunrise Lodge", "North Gate", 50000)
        .await;
    app.submit_application(&hostel_id, "chidi@uni.test").await;

    let resp = app
        .auth_get("/api/admin-panel/overview", &admin)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let overview: Value = resp.json().await.unwrap();
    assert_eq!(overview["realtors"]["pending"], 1);
    assert_eq!(overview["realtors"]["active"], 1);
    assert_eq!(overview["realtors"]["total"], 2);
    assert_eq!(overview["hostels"], 1);
    assert_eq!(overview["applications"]["pending"], 1);
    assert_eq!(overview["applications"]["total"], 1);
}

#[tokio::test]
async fn admin_can_delete_any_hostel() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let realtor = app.active_realtor("ada@realty.test").await;
    let hostel_id = app
        .create_hostel(&realtor.token, "Sunrise Lodge", "North Gate", 50000)
        .await;

    let resp = app
        .auth_delete(&format!("/api/admin-panel/hostels/{}", hostel_id), &admin)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_delete(&format!("/api/admin-panel/hostels/{}", hostel_id), &admin)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn admin_panel_requires_admin_token() {
    let app = TestApp::spawn().await;
    let realtor = app.active_realtor("ada@realty.test").await;

    let resp = app
        .client
        .get(app.url("/api/admin-panel/overview"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);

    let resp = app
        .auth_get("/api/admin-panel/realtors", &realtor.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}
