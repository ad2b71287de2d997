use crate::fixtures::test_app::TestApp;
use serde_json::{Value, json};

#[tokio::test]
async fn create_and_fetch_hostel() {
    let app = TestApp::spawn().await;
    let realtor = app.active_realtor("ada@realty.test").await;

    let resp = app
        .auth_post("/api/hostels", &realtor.token)
        .json(&json!({
            "name": "Sunrise Lodge",
            "location": "North Gate",
            "price": 50000,
            "images": ["https://cdn.test/1.jpg"],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["available"], true);
    assert_eq!(created["realtor_id"], realtor.id.as_str());
    assert_eq!(created["views"], 0);
    let id = created["id"].as_str().unwrap();

    let first: Value = app
        .client
        .get(app.url(&format!("/api/hostels/{}", id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["name"], "Sunrise Lodge");
    assert_eq!(first["views"], 1);

    let second: Value = app
        .client
        .get(app.url(&format!("/api/hostels/{}", id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["views"], 2);
}

#[tokio::test]
async fn invalid_hostel_payload_is_rejected() {
    let app = TestApp::spawn().await;
    let realtor = app.active_realtor("ada@realty.test").await;

    let resp = app
        .auth_post("/api/hostels", &realtor.token)
        .json(&json!({ "name": "", "location": "North Gate", "price": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "validation");
}

#[tokio::test]
async fn public_listing_filters() {
    let app = TestApp::spawn().await;
    let realtor = app.active_realtor("ada@realty.test").await;
    app.create_hostel(&realtor.token, "Sunrise Lodge", "North Gate", 50000).await;
    app.create_hostel(&realtor.token, "Palm Court", "south gate", 80000).await;
    let hidden = app
        .create_hostel(&realtor.token, "Cedar House", "North Gate Annex", 40000)
        .await;
    app.auth_patch(&format!("/api/hostels/{}/availability", hidden), &realtor.token)
        .send()
        .await
        .unwrap();

    let all: Value = app
        .client
        .get(app.url("/api/hostels"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all["total"], 3);

    let north: Value = app
        .client
        .get(app.url("/api/hostels?location=north%20gate&available=true"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(north["total"], 1);
    assert_eq!(north["items"][0]["name"], "Sunrise Lodge");

    let cheap: Value = app
        .client
        .get(app.url("/api/hostels?max_price=50000"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cheap["total"], 2);

    let paged: Value = app
        .client
        .get(app.url("/api/hostels?per_page=2&page=2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(paged["items"].as_array().unwrap().len(), 1);
    assert_eq!(paged["total_pages"], 2);

    let resp = app
        .client
        .get(app.url("/api/hostels?page=18446744073709551615"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let far: Value = resp.json().await.unwrap();
    assert!(far["items"].as_array().unwrap().is_empty());
    assert_eq!(far["total"], 3);
}

#[tokio::test]
async fn owner_updates_and_toggles_availability() {
    let app = TestApp::spawn().await;
    let realtor = app.active_realtor("ada@realty.test").await;
    let id = app
        .create_hostel(&realtor.token, "Sunrise Lodge", "North Gate", 50000)
        .await;

    let resp = app
        .auth_put(&format!("/api/hostels/{}", id), &realtor.token)
        .json(&json!({ "price": 55000, "features": ["water", "wifi"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["price"], 55000);
    assert_eq!(updated["name"], "Sunrise Lodge");
    assert_eq!(updated["features"], json!(["water", "wifi"]));

    let path = format!("/api/hostels/{}/availability", id);
    let off: Value = app
        .auth_patch(&path, &realtor.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(off["id"], id.as_str());
    assert_eq!(off["available"], false);

    let on: Value = app
        .auth_patch(&path, &realtor.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(on["available"], true);
}

#[tokio::test]
async fn other_realtors_cannot_touch_a_hostel() {
    let app = TestApp::spawn().await;
    let owner = app.active_realtor("owner@realty.test").await;
    let intruder = app.active_realtor("intruder@realty.test").await;
    let id = app
        .create_hostel(&owner.token, "Sunrise Lodge", "North Gate", 50000)
        .await;

    let resp = app
        .auth_put(&format!("/api/hostels/{}", id), &intruder.token)
        .json(&json!({ "price": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    let resp = app
        .auth_delete(&format!("/api/hostels/{}", id), &intruder.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    let mine: Vec<Value> = app
        .auth_get("/api/hostels/mine", &intruder.token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(mine.is_empty());

    let resp = app
        .auth_delete(&format!("/api/hostels/{}", id), &owner.token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .client
        .get(app.url(&format!("/api/hostels/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn malformed_hostel_id_is_a_bad_request() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .get(app.url("/api/hostels/not-an-id"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
}
