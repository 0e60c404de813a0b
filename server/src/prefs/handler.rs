//! Preference management handlers
//!
//! The HTTP face of the preference engine. A request may address the
//! global scope of a namespace or, with the `client` query parameter, a
//! client-bound scope.

use axum::{
	Json,
	extract::{Path, Query, State},
	http::StatusCode,
};
use serde::Deserialize;

use tonehub_prefs::PrefScope;
use tonehub_types::value::PrefValue;

use crate::{prelude::*, types::ApiResponse};

/// Scope selector: absent `client` means the global scope
#[derive(Debug, Deserialize)]
pub struct ScopeQuery {
	pub client: Option<Box<str>>,
	pub account: Option<Box<str>>,
}

async fn resolve_scope(app: &App, namespace: &str, query: &ScopeQuery) -> ThResult<PrefScope> {
	match &query.client {
		Some(client_id) => {
			let client = ClientCtx {
				client_id: client_id.clone(),
				account_id: query.account.clone(),
			};
			app.prefs.client(namespace, client).await
		}
		None => app.prefs.global(namespace).await,
	}
}

/// GET /api/prefs/{ns} - Enumerate a scope's preferences
/// Internal names are never enumerated.
pub async fn list_prefs(
	State(app): State<App>,
	Path(namespace): Path<String>,
	Query(query): Query<ScopeQuery>,
) -> ThResult<(StatusCode, Json<ApiResponse<std::collections::HashMap<Box<str>, PrefValue>>>)> {
	let scope = resolve_scope(&app, &namespace, &query).await?;
	let all = scope.all();
	let total = all.len();
	Ok((StatusCode::OK, Json(ApiResponse::with_total(all, total))))
}

/// GET /api/prefs/{ns}/{name} - Get one preference value
pub async fn get_pref(
	State(app): State<App>,
	Path((namespace, name)): Path<(String, String)>,
	Query(query): Query<ScopeQuery>,
) -> ThResult<(StatusCode, Json<ApiResponse<PrefValue>>)> {
	let scope = resolve_scope(&app, &namespace, &query).await?;
	let value = scope.get(&name).await?.ok_or(Error::NotFound)?;
	Ok((StatusCode::OK, Json(ApiResponse::new(value))))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePrefRequest {
	pub value: PrefValue,
}

/// Response for a processed set
#[derive(serde::Serialize)]
pub struct SetPrefResponse {
	pub name: String,
	pub value: Option<PrefValue>,
	pub accepted: bool,
}

/// PUT /api/prefs/{ns}/{name} - Update a preference
/// A validation or readonly rejection answers 422 with the retained value.
pub async fn update_pref(
	State(app): State<App>,
	Path((namespace, name)): Path<(String, String)>,
	Query(query): Query<ScopeQuery>,
	Json(req): Json<UpdatePrefRequest>,
) -> ThResult<(StatusCode, Json<ApiResponse<SetPrefResponse>>)> {
	let scope = resolve_scope(&app, &namespace, &query).await?;
	let outcome = scope.set(&name, req.value).await?;

	let status =
		if outcome.accepted { StatusCode::OK } else { StatusCode::UNPROCESSABLE_ENTITY };
	if !outcome.accepted {
		info!("Rejected set of '{}.{}'", namespace, name);
	}

	let response =
		SetPrefResponse { name, value: outcome.value, accepted: outcome.accepted };
	Ok((status, Json(ApiResponse::new(response))))
}

/// DELETE /api/prefs/{ns}/{name} - Remove a preference
pub async fn delete_pref(
	State(app): State<App>,
	Path((namespace, name)): Path<(String, String)>,
	Query(query): Query<ScopeQuery>,
) -> ThResult<StatusCode> {
	let scope = resolve_scope(&app, &namespace, &query).await?;
	scope.remove(&[name.as_str()]).await?;
	Ok(StatusCode::NO_CONTENT)
}

// vim: ts=4
