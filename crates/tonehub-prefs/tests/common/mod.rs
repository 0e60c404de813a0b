//! In-memory store adapters for engine tests.
//!
//! Both stores count their calls so tests can prove that redundant writes
//! are suppressed and that persistence happens exactly once per mutation.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tonehub_types::error::{Error, ThResult};
use tonehub_types::store_adapter::{PrefRow, RowStore, SnapshotStore};
use tonehub_types::value::Snapshot;

#[derive(Debug, Default)]
pub struct MemSnapshotStore {
	snapshots: Mutex<HashMap<Box<str>, Snapshot>>,
	pub persist_calls: AtomicUsize,
	pub fail_persist: AtomicBool,
}

impl MemSnapshotStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn persist_count(&self) -> usize {
		self.persist_calls.load(Ordering::SeqCst)
	}

	pub fn fail_next_persists(&self, fail: bool) {
		self.fail_persist.store(fail, Ordering::SeqCst);
	}
}

#[async_trait]
impl SnapshotStore for MemSnapshotStore {
	async fn load(&self, namespace: &str) -> ThResult<Option<Snapshot>> {
		Ok(self.snapshots.lock().get(namespace).cloned())
	}

	async fn persist(&self, namespace: &str, snapshot: &Snapshot) -> ThResult<()> {
		if self.fail_persist.load(Ordering::SeqCst) {
			return Err(Error::Io(std::io::Error::other("disk full")));
		}
		self.persist_calls.fetch_add(1, Ordering::SeqCst);
		self.snapshots.lock().insert(namespace.into(), snapshot.clone());
		Ok(())
	}
}

#[derive(Debug, Default)]
pub struct MemRowStore {
	rows: Mutex<HashMap<(Box<str>, Box<str>), Vec<PrefRow>>>,
	pub write_calls: AtomicUsize,
}

impl MemRowStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn write_count(&self) -> usize {
		self.write_calls.load(Ordering::SeqCst)
	}

	pub fn seed(&self, client_id: &str, key: &str, values: &[&str]) {
		let rows = values
			.iter()
			.enumerate()
			.map(|(idx, value)| PrefRow { idx: idx as i64, value: (*value).into() })
			.collect();
		self.rows.lock().insert((client_id.into(), key.into()), rows);
	}

	pub fn rows_for(&self, client_id: &str, key: &str) -> Vec<PrefRow> {
		self.rows
			.lock()
			.get(&(client_id.into(), key.into()))
			.cloned()
			.unwrap_or_default()
	}
}

#[async_trait]
impl RowStore for MemRowStore {
	async fn read_rows(&self, client_id: &str, key: &str) -> ThResult<Vec<PrefRow>> {
		Ok(self.rows_for(client_id, key))
	}

	async fn write_scalar(&self, client_id: &str, key: &str, value: &str) -> ThResult<()> {
		self.write_calls.fetch_add(1, Ordering::SeqCst);
		self.rows
			.lock()
			.insert((client_id.into(), key.into()), vec![PrefRow { idx: 0, value: value.into() }]);
		Ok(())
	}

	async fn write_sequence(&self, client_id: &str, key: &str, values: &[Box<str>]) -> ThResult<()> {
		self.write_calls.fetch_add(1, Ordering::SeqCst);
		let rows = values
			.iter()
			.enumerate()
			.map(|(idx, value)| PrefRow { idx: idx as i64, value: value.clone() })
			.collect();
		self.rows.lock().insert((client_id.into(), key.into()), rows);
		Ok(())
	}

	async fn clear_rows(&self, client_id: &str, key: &str) -> ThResult<()> {
		self.rows.lock().remove(&(client_id.into(), key.into()));
		Ok(())
	}
}

// vim: ts=4
