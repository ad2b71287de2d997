use serde_json::{Value, json};

use super::test_app::{ADMIN_EMAIL, ADMIN_PASSWORD, TestApp};

pub const REALTOR_PASSWORD: &str = "Realtor123!";
pub const STUDENT_PASSWORD: &str = "Student123!";

pub struct SeededRealtor {
    pub id: String,
    pub email: String,
    pub token: String,
}

pub struct SeededStudent {
    pub id: String,
    pub email: String,
    pub token: String,
}

/// Student details as submitted with an application.
pub fn student_info(email: &str) -> Value {
    json!({
        "full_name": "Chidi Okafor",
        "email": email,
        "phone": "+2348011112222",
        "student_id": "UNI/2024/0042",
        "academic_level": "300",
        "department": "Computer Science",
    })
}

impl TestApp {
    pub fn auth_get(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_post(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_put(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .put(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_patch(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .patch(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_delete(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    /// Log in as the bootstrap super-admin.
    pub async fn admin_token(&self) -> String {
        let resp = self
            .client
            .post(self.url("/api/admin-auth/login"))
            .json(&json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
            .send()
            .await
            .expect("Admin login request failed");
        assert_eq!(resp.status().as_u16(), 200, "Admin login failed");

        let json: Value = resp.json().await.unwrap();
        json["token"].as_str().unwrap().to_string()
    }

    /// Register a realtor and log in. The account is left `pending`.
    pub async fn register_realtor(&self, email: &str) -> SeededRealtor {
        let resp = self
            .client
            .post(self.url("/api/realtor-auth/register"))
            .json(&json!({
                "email": email,
                "password": REALTOR_PASSWORD,
                "full_name": "Ada Realty",
                "phone": "+2348000000000",
                "whatsapp": "+2348000000000",
                "business_name": "Ada Homes",
            }))
            .send()
            .await
            .expect("Register request failed");
        assert_eq!(
            resp.status().as_u16(),
            201,
            "Register failed: {}",
            resp.text().await.unwrap_or_default()
        );

        self.login_realtor(email).await
    }

    pub async fn login_realtor(&self, email: &str) -> SeededRealtor {
        let resp = self
            .client
            .post(self.url("/api/realtor-auth/login"))
            .json(&json!({ "email": email, "password": REALTOR_PASSWORD }))
            .send()
            .await
            .expect("Login request failed");
        assert_eq!(resp.status().as_u16(), 200, "Realtor login failed");

        let json: Value = resp.json().await.unwrap();
        SeededRealtor {
            id: json["realtor"]["id"].as_str().unwrap().to_string(),
            email: email.to_string(),
            token: json["token"].as_str().unwrap().to_string(),
        }
    }

    pub async fn approve_realtor(&self, admin_token: &str, realtor_id: &str) -> Value {
        let resp = self
            .auth_put(
                &format!("/api/admin-panel/realtors/{}/approve", realtor_id),
                admin_token,
            )
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 200, "Approve failed");
        resp.json().await.unwrap()
    }

    /// Register a realtor and have the bootstrap admin approve it.
    pub async fn active_realtor(&self, email: &str) -> SeededRealtor {
        let realtor = self.register_realtor(email).await;
        let admin = self.admin_token().await;
        self.approve_realtor(&admin, &realtor.id).await;
        realtor
    }

    /// Create a hostel as `token`'s realtor and return its id.
    pub async fn create_hostel(&self, token: &str, name: &str, location: &str, price: i64) -> String {
        let resp = self
            .auth_post("/api/hostels", token)
            .json(&json!({
                "name": name,
                "location": location,
                "price": price,
                "description": "Self-contained rooms close to campus",
                "features": ["water", "security"],
            }))
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        let json: Value = resp.json().await.unwrap();
        assert_eq!(status, 201, "Create hostel failed: {json}");
        json["id"].as_str().unwrap().to_string()
    }

    /// Submit an application anonymously and return the response body.
    pub async fn submit_application(&self, hostel_id: &str, student_email: &str) -> Value {
        let resp = self
            .client
            .post(self.url("/api/applications/submit"))
            .json(&json!({
                "hostel_id": hostel_id,
                "student_info": student_info(student_email),
                "accommodation": { "room_type": "single", "duration": "1 session" },
            }))
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        let json: Value = resp.json().await.unwrap();
        assert_eq!(status, 201, "Submit failed: {json}");
        json
    }

    pub async fn get_application(&self, application_id: &str) -> Value {
        let resp = self
            .client
            .get(self.url(&format!("/api/applications/{}", application_id)))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 200, "Get application failed");
        resp.json().await.unwrap()
    }

    pub async fn register_student(&self, email: &str) -> SeededStudent {
        let resp = self
            .client
            .post(self.url("/api/student-auth/register"))
            .json(&json!({
                "email": email,
                "password": STUDENT_PASSWORD,
                "full_name": "Chidi Okafor",
                "department": "Computer Science",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 201, "Student register failed");

        let json: Value = resp.json().await.unwrap();
        SeededStudent {
            id: json["student"]["id"].as_str().unwrap().to_string(),
            email: email.to_string(),
            token: json["token"].as_str().unwrap().to_string(),
        }
    }
}
