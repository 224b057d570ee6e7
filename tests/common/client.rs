//! HTTP client for end-to-end tests
//!
//! High-level wrapper around reqwest with one method per server endpoint.
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::json;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    // ========================================================================
    // Ingestion endpoint
    // ========================================================================

    /// POST /api/listen with a plain JSON body
    pub async fn post_listen(&self, track_id: &str, event_type: &str) -> Response {
        self.client
            .post(format!("{}/api/listen", self.base_url))
            .json(&json!({"trackId": track_id, "eventType": event_type}))
            .send()
            .await
            .expect("Listen request failed")
    }

    /// POST /api/listen with classification headers set
    pub async fn post_listen_with_context(
        &self,
        track_id: &str,
        event_type: &str,
        user_agent: &str,
        country: &str,
        forwarded_for: &str,
    ) -> Response {
        self.client
            .post(format!("{}/api/listen", self.base_url))
            .header("User-Agent", user_agent)
            .header("X-Vercel-IP-Country", country)
            .header("X-Forwarded-For", forwarded_for)
            .json(&json!({"trackId": track_id, "eventType": event_type}))
            .send()
            .await
            .expect("Listen request failed")
    }

    /// POST /api/listen with a raw body, for malformed-payload tests
    pub async fn post_listen_raw(&self, body: &str) -> Response {
        self.client
            .post(format!("{}/api/listen", self.base_url))
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("Listen request failed")
    }

    // ========================================================================
    // Report endpoint
    // ========================================================================

    /// GET /api/stats, optionally with a bearer token
    pub async fn get_stats(&self, token: Option<&str>) -> Response {
        let mut request = self.client.get(format!("{}/api/stats", self.base_url));
        if let Some(token) = token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        request.send().await.expect("Stats request failed")
    }

    // ========================================================================
    // Catalog endpoints
    // ========================================================================

    /// GET /api/artists
    pub async fn get_artists(&self) -> Response {
        self.client
            .get(format!("{}/api/artists", self.base_url))
            .send()
            .await
            .expect("Artists request failed")
    }

    /// GET /api/artist/{slug}
    pub async fn get_artist(&self, slug: &str) -> Response {
        self.client
            .get(format!("{}/api/artist/{}", self.base_url, slug))
            .send()
            .await
            .expect("Artist request failed")
    }

    /// GET an arbitrary path, e.g. a static /music asset
    pub async fn get_path(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("Asset request failed")
    }
}
