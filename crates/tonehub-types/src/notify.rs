//! Change-notification bus contract.
//!
//! After every successful, value-changing `set` the engine publishes one
//! event here. Delivery is fire-and-forget: the bus gives no acknowledgment
//! and the engine never waits on it.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::value::PrefValue;

/// Topic carried by every preference-set event
pub const PREFSET_TOPIC: &str = "prefset";

/// Addressee of a notification event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotifyTarget {
	Global,
	Client(Box<str>),
}

/// Event published after a successful, value-changing `set`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefSetEvent {
	pub target: NotifyTarget,
	pub topic: Box<str>,
	pub namespace: Box<str>,
	pub name: Box<str>,
	#[serde(rename = "newValue")]
	pub value: PrefValue,
}

impl PrefSetEvent {
	pub fn new(
		target: NotifyTarget,
		namespace: impl Into<Box<str>>,
		name: impl Into<Box<str>>,
		value: PrefValue,
	) -> Self {
		Self {
			target,
			topic: PREFSET_TOPIC.into(),
			namespace: namespace.into(),
			name: name.into(),
			value,
		}
	}
}

/// Fire-and-forget notification sink
pub trait NotifyBus: Send + Sync + Debug {
	fn publish(&self, event: PrefSetEvent);
}

// vim: ts=4
