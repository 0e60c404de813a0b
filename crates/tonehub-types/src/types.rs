//! Small shared types: timestamps and client identity.

use serde::{Deserialize, Serialize};

/// Unix timestamp in seconds
pub type Timestamp = i64;

/// Timestamp sentinel planted by a timestamp wipe. Forces the next `set`
/// on the entry to refresh the stored modification time.
pub const WIPED_TIMESTAMP: Timestamp = -1;

/// Current unix time in seconds
pub fn now() -> Timestamp {
	std::time::SystemTime::now()
		.duration_since(std::time::UNIX_EPOCH)
		.map(|d| d.as_secs() as i64)
		.unwrap_or(0)
}

/// Identity of a connected client, as seen by a client-bound scope.
///
/// The `account_id` is the owning account in the remote row store; a remote
/// lookup that finds no client rows falls back to the account's rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCtx {
	#[serde(rename = "clientId")]
	pub client_id: Box<str>,
	#[serde(rename = "accountId")]
	pub account_id: Option<Box<str>>,
}

impl ClientCtx {
	pub fn new(client_id: impl Into<Box<str>>) -> Self {
		Self { client_id: client_id.into(), account_id: None }
	}

	pub fn with_account(client_id: impl Into<Box<str>>, account_id: impl Into<Box<str>>) -> Self {
		Self { client_id: client_id.into(), account_id: Some(account_id.into()) }
	}
}

// vim: ts=4
