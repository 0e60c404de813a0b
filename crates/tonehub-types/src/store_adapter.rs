//! Persistence collaborator traits.
//!
//! Two interchangeable durability strategies sit behind these traits: a
//! local snapshot store writing one durable snapshot per mutation, and a
//! remote row store holding per-client, per-index rows. The engine picks
//! one of them once, when a namespace is constructed.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::ThResult;
use crate::value::Snapshot;

/// Local durable store: one snapshot per namespace.
///
/// `persist` must be durable when it returns; the engine blocks the
/// triggering `set`/`init`/`remove` on it and does not retry on failure.
#[async_trait]
pub trait SnapshotStore: Send + Sync + Debug {
	/// Load the last persisted snapshot, `None` if the namespace has
	/// never been persisted.
	async fn load(&self, namespace: &str) -> ThResult<Option<Snapshot>>;

	/// Durably write the namespace's current snapshot
	async fn persist(&self, namespace: &str, snapshot: &Snapshot) -> ThResult<()>;
}

/// One row of a remotely stored preference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefRow {
	/// Declared sequence index of the row (0 for scalar rows)
	pub idx: i64,
	/// Row text; composite values carry a structured-value marker prefix
	pub value: Box<str>,
}

/// Remote row store: per-client, per-key rows.
///
/// A sequence is one row per index; a scalar or marker-encoded composite
/// is a single row. Writes replace the key's full row set.
#[async_trait]
pub trait RowStore: Send + Sync + Debug {
	async fn read_rows(&self, client_id: &str, key: &str) -> ThResult<Vec<PrefRow>>;

	async fn write_scalar(&self, client_id: &str, key: &str, value: &str) -> ThResult<()>;

	async fn write_sequence(&self, client_id: &str, key: &str, values: &[Box<str>]) -> ThResult<()>;

	async fn clear_rows(&self, client_id: &str, key: &str) -> ThResult<()>;
}

// vim: ts=4
