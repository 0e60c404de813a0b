//! Store strategy: the single point where the two deployment modes differ.
//!
//! A namespace is constructed with one strategy and never branches on the
//! deployment mode inline; it consults the strategy's capability accessors
//! and calls its operations. Local mode persists whole-namespace snapshots;
//! remote mode reads and writes per-client rows and treats them as the
//! durable form, so snapshot persistence is a no-op there.

use std::sync::Arc;

use tonehub_types::prelude::*;
use tonehub_types::store_adapter::{PrefRow, RowStore, SnapshotStore};
use tonehub_types::value::JSON_MARKER;

/// The designated default namespace: its keys are stored bare in the
/// remote row store, every other namespace is folded into the key.
pub const DEFAULT_NAMESPACE: &str = "server";

/// Durability strategy of one namespace, chosen at construction
#[derive(Debug, Clone)]
pub enum StoreStrategy {
	Local(Arc<dyn SnapshotStore>),
	Remote(Arc<dyn RowStore>),
}

impl StoreStrategy {
	pub fn local(store: Arc<dyn SnapshotStore>) -> Self {
		StoreStrategy::Local(store)
	}

	pub fn remote(rows: Arc<dyn RowStore>) -> Self {
		StoreStrategy::Remote(rows)
	}

	pub fn is_remote(&self) -> bool {
		matches!(self, StoreStrategy::Remote(_))
	}

	/// Local entries carry a last-modified time; remote entries do not
	/// (timestamp queries answer 0 there).
	pub fn tracks_timestamps(&self) -> bool {
		matches!(self, StoreStrategy::Local(_))
	}

	/// Wholesale `clear()` is a remote-mode operation only
	pub fn supports_clear(&self) -> bool {
		matches!(self, StoreStrategy::Remote(_))
	}

	/// In remote mode a preference that holds a sequence keeps that shape:
	/// a later scalar `set` is wrapped into a one-element sequence.
	pub fn sequence_shape_sticky(&self) -> bool {
		matches!(self, StoreStrategy::Remote(_))
	}

	/// Load the namespace's persisted snapshot, if the strategy has one
	pub async fn load(&self, namespace: &str) -> ThResult<Option<Snapshot>> {
		match self {
			StoreStrategy::Local(store) => store.load(namespace).await,
			StoreStrategy::Remote(_) => Ok(None),
		}
	}

	/// Durably record the namespace's current state. Failures propagate
	/// untouched to the public call that triggered the write.
	pub async fn persist(&self, namespace: &str, snapshot: &Snapshot) -> ThResult<()> {
		match self {
			StoreStrategy::Local(store) => store.persist(namespace, snapshot).await,
			// Rows are the durable form in remote mode
			StoreStrategy::Remote(_) => Ok(()),
		}
	}

	/// Remote lookup for a client-bound scope: client rows first, then the
	/// owning account's rows. Zero rows means the value is undefined.
	pub async fn fetch(
		&self,
		client: &ClientCtx,
		namespace: &str,
		name: &str,
	) -> ThResult<Option<PrefValue>> {
		let StoreStrategy::Remote(rows) = self else {
			return Ok(None);
		};

		let key = storage_key(namespace, name);
		let mut found = rows.read_rows(&client.client_id, &key).await?;
		if found.is_empty() {
			if let Some(account_id) = &client.account_id {
				found = rows.read_rows(account_id, &key).await?;
			}
		}

		Ok(reconstruct(name, found))
	}

	/// Write a client-bound value to the remote row store: a sequence as
	/// one row per index, a mapping as one marker-encoded row, a scalar as
	/// one row.
	pub async fn store(
		&self,
		client: &ClientCtx,
		namespace: &str,
		name: &str,
		value: &PrefValue,
	) -> ThResult<()> {
		let StoreStrategy::Remote(rows) = self else {
			return Ok(());
		};

		let key = storage_key(namespace, name);
		match value {
			PrefValue::Sequence(seq) => {
				let texts: Vec<Box<str>> = seq.iter().map(Scalar::to_row_text).collect();
				rows.write_sequence(&client.client_id, &key, &texts).await
			}
			PrefValue::Mapping(_) => {
				let encoded = format!("{}{}", JSON_MARKER, serde_json::to_string(value)?);
				rows.write_scalar(&client.client_id, &key, &encoded).await
			}
			PrefValue::Scalar(s) => {
				rows.write_scalar(&client.client_id, &key, &s.to_row_text()).await
			}
		}
	}

	/// Drop a client-bound key's rows from the remote row store
	pub async fn clear_key(&self, client: &ClientCtx, namespace: &str, name: &str) -> ThResult<()> {
		match self {
			StoreStrategy::Local(_) => Ok(()),
			StoreStrategy::Remote(rows) => {
				rows.clear_rows(&client.client_id, &storage_key(namespace, name)).await
			}
		}
	}
}

/// Fold the namespace into the storage key, except for the default
/// namespace which uses the bare preference name.
pub fn storage_key(namespace: &str, name: &str) -> Box<str> {
	if namespace == DEFAULT_NAMESPACE {
		name.into()
	} else {
		format!("{}.{}", namespace, name).into()
	}
}

/// Rebuild a value from its row set
fn reconstruct(name: &str, mut rows: Vec<PrefRow>) -> Option<PrefValue> {
	match rows.len() {
		0 => None,
		1 => Some(decode_row(name, &rows[0].value)),
		_ => {
			rows.sort_by_key(|row| row.idx);
			Some(PrefValue::Sequence(
				rows.iter().map(|row| Scalar::from_row_text(&row.value)).collect(),
			))
		}
	}
}

/// Decode one row's text. A structured-value marker introduces JSON; a
/// decode failure is logged and degrades to an empty string rather than
/// propagating.
fn decode_row(name: &str, text: &str) -> PrefValue {
	if let Some(encoded) = text.strip_prefix(JSON_MARKER) {
		match serde_json::from_str::<PrefValue>(encoded) {
			Ok(value) => value,
			Err(err) => {
				error!("Failed to decode structured value for '{}': {}", name, err);
				PrefValue::Scalar(Scalar::Str("".into()))
			}
		}
	} else {
		PrefValue::Scalar(Scalar::from_row_text(text))
	}
}

#[cfg(test)]
#[allow(clippy::panic)]
mod test {
	use super::*;

	#[test]
	fn default_namespace_uses_bare_key() {
		assert_eq!(storage_key("server", "maxBitrate").as_ref(), "maxBitrate");
		assert_eq!(storage_key("plugin.shuffle", "mode").as_ref(), "plugin.shuffle.mode");
	}

	#[test]
	fn single_row_is_scalar() {
		let rows = vec![PrefRow { idx: 0, value: "320".into() }];
		assert_eq!(reconstruct("maxBitrate", rows), Some(PrefValue::Scalar(Scalar::Int(320))));
	}

	#[test]
	fn rows_rebuild_sequence_by_index() {
		let rows = vec![
			PrefRow { idx: 2, value: "c".into() },
			PrefRow { idx: 0, value: "a".into() },
			PrefRow { idx: 1, value: "b".into() },
		];
		assert_eq!(
			reconstruct("favorites", rows),
			Some(PrefValue::Sequence(vec![
				Scalar::Str("a".into()),
				Scalar::Str("b".into()),
				Scalar::Str("c".into()),
			]))
		);
	}

	#[test]
	fn marked_row_decodes_mapping() {
		let rows = vec![PrefRow { idx: 0, value: "json:{\"shuffle\":1}".into() }];
		let Some(PrefValue::Mapping(map)) = reconstruct("playerState", rows) else {
			panic!("expected mapping");
		};
		assert_eq!(map.get("shuffle"), Some(&Scalar::Int(1)));
	}

	#[test]
	fn bad_marked_row_degrades_to_empty_string() {
		let rows = vec![PrefRow { idx: 0, value: "json:{not json".into() }];
		assert_eq!(
			reconstruct("playerState", rows),
			Some(PrefValue::Scalar(Scalar::Str("".into())))
		);
	}
}

// vim: ts=4
