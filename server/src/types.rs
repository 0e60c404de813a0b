//! Common HTTP types

use serde::Serialize;

/// Standard API response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
	pub data: T,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub total: Option<usize>,
}

impl<T: Serialize> ApiResponse<T> {
	pub fn new(data: T) -> Self {
		Self { data, total: None }
	}

	pub fn with_total(data: T, total: usize) -> Self {
		Self { data, total: Some(total) }
	}
}

// vim: ts=4
