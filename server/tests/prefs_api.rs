//! Preference API integration tests
//!
//! Drives the router directly with `tower::ServiceExt::oneshot` against an
//! in-memory snapshot store.

#![allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]

use async_trait::async_trait;
use axum::{
	body::Body,
	http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

use tonehub::{AppState, ServerMode, TonehubOpts};
use tonehub_types::error::ThResult;
use tonehub_types::store_adapter::SnapshotStore;
use tonehub_types::value::Snapshot;

#[derive(Debug, Default)]
struct MemSnapshotStore {
	snapshots: Mutex<HashMap<Box<str>, Snapshot>>,
}

#[async_trait]
impl SnapshotStore for MemSnapshotStore {
	async fn load(&self, namespace: &str) -> ThResult<Option<Snapshot>> {
		Ok(self.snapshots.lock().get(namespace).cloned())
	}

	async fn persist(&self, namespace: &str, snapshot: &Snapshot) -> ThResult<()> {
		self.snapshots.lock().insert(namespace.into(), snapshot.clone());
		Ok(())
	}
}

fn test_app() -> tonehub::App {
	let opts = TonehubOpts {
		mode: ServerMode::Standalone,
		snapshot_store: Some(Arc::new(MemSnapshotStore::default())),
		..TonehubOpts::default()
	};
	AppState::new(opts).expect("failed to build app")
}

fn put_request(path: &str, body: &str) -> Request<Body> {
	Request::builder()
		.method("PUT")
		.uri(path)
		.header(header::CONTENT_TYPE, "application/json")
		.body(Body::from(body.to_string()))
		.expect("bad request")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
	let bytes = response.into_body().collect().await.expect("body read failed").to_bytes();
	serde_json::from_slice(&bytes).expect("bad json body")
}

#[tokio::test]
async fn set_then_get_round_trips() {
	let app = test_app();
	let router = tonehub::routes::init(app.clone());

	let response = router
		.clone()
		.oneshot(put_request("/api/prefs/server/maxBitrate", "{\"value\": 320}"))
		.await
		.expect("request failed");
	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	assert_eq!(body["data"]["accepted"], serde_json::json!(true));
	assert_eq!(body["data"]["value"], serde_json::json!(320));

	let response = router
		.oneshot(
			Request::builder()
				.uri("/api/prefs/server/maxBitrate")
				.body(Body::empty())
				.expect("bad request"),
		)
		.await
		.expect("request failed");
	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	assert_eq!(body["data"], serde_json::json!(320));
}

#[tokio::test]
async fn missing_pref_answers_404() {
	let router = tonehub::routes::init(test_app());
	let response = router
		.oneshot(
			Request::builder()
				.uri("/api/prefs/server/unknown")
				.body(Body::empty())
				.expect("bad request"),
		)
		.await
		.expect("request failed");
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rejected_set_answers_422_and_keeps_value() {
	let app = test_app();
	let router = tonehub::routes::init(app.clone());

	router
		.clone()
		.oneshot(put_request("/api/prefs/server/language", "{\"value\": \"EN\"}"))
		.await
		.expect("request failed");

	let namespace = app.prefs.namespace("server").await.expect("namespace failed");
	namespace.set_readonly(true);

	let response = router
		.clone()
		.oneshot(put_request("/api/prefs/server/language", "{\"value\": \"DE\"}"))
		.await
		.expect("request failed");
	assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
	let body = body_json(response).await;
	assert_eq!(body["data"]["accepted"], serde_json::json!(false));
	assert_eq!(body["data"]["value"], serde_json::json!("EN"));
}

#[tokio::test]
async fn list_excludes_internal_names() {
	let app = test_app();
	let router = tonehub::routes::init(app.clone());

	router
		.clone()
		.oneshot(put_request("/api/prefs/server/language", "{\"value\": \"EN\"}"))
		.await
		.expect("request failed");

	let response = router
		.oneshot(
			Request::builder()
				.uri("/api/prefs/server")
				.body(Body::empty())
				.expect("bad request"),
		)
		.await
		.expect("request failed");
	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	assert_eq!(body["total"], serde_json::json!(1));
	assert_eq!(body["data"]["language"], serde_json::json!("EN"));
}

#[tokio::test]
async fn delete_removes_the_pref() {
	let app = test_app();
	let router = tonehub::routes::init(app.clone());

	router
		.clone()
		.oneshot(put_request("/api/prefs/server/language", "{\"value\": \"EN\"}"))
		.await
		.expect("request failed");

	let response = router
		.clone()
		.oneshot(
			Request::builder()
				.method("DELETE")
				.uri("/api/prefs/server/language")
				.body(Body::empty())
				.expect("bad request"),
		)
		.await
		.expect("request failed");
	assert_eq!(response.status(), StatusCode::NO_CONTENT);

	let response = router
		.oneshot(
			Request::builder()
				.uri("/api/prefs/server/language")
				.body(Body::empty())
				.expect("bad request"),
		)
		.await
		.expect("request failed");
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// vim: ts=4
