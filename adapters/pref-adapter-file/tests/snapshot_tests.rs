//! Snapshot store round-trip tests

#![allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]

use tempfile::TempDir;

use tonehub_pref_adapter_file::PrefAdapterFile;
use tonehub_types::store_adapter::SnapshotStore;
use tonehub_types::value::{Entry, PrefValue, Scalar, Snapshot};

async fn create_test_adapter() -> (PrefAdapterFile, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let adapter = PrefAdapterFile::new(temp_dir.path().into())
		.await
		.expect("Failed to create adapter");
	(adapter, temp_dir)
}

fn sample_snapshot() -> Snapshot {
	let mut snapshot = Snapshot::default();
	snapshot
		.prefs
		.insert("maxBitrate".into(), Entry::new(PrefValue::from(320i64), 1700000000));
	snapshot.prefs.insert(
		"favorites".into(),
		Entry::new(
			PrefValue::Sequence(vec![Scalar::Str("a".into()), Scalar::Str("b".into())]),
			1700000001,
		),
	);
	let mut client = tonehub_types::value::EntryMap::new();
	client.insert("volume".into(), Entry::new(PrefValue::from(70i64), 0));
	snapshot.clients.insert("00:04:20:12:34:56".into(), client);
	snapshot
}

#[tokio::test]
async fn persist_then_load_round_trips() {
	let (adapter, _temp) = create_test_adapter().await;
	let snapshot = sample_snapshot();

	adapter.persist("server", &snapshot).await.expect("persist failed");
	let loaded = adapter.load("server").await.expect("load failed").expect("missing snapshot");

	assert_eq!(loaded.prefs, snapshot.prefs);
	assert_eq!(loaded.clients, snapshot.clients);
}

#[tokio::test]
async fn missing_namespace_loads_none() {
	let (adapter, _temp) = create_test_adapter().await;
	assert!(adapter.load("server").await.expect("load failed").is_none());
}

#[tokio::test]
async fn latest_persist_wins() {
	let (adapter, _temp) = create_test_adapter().await;

	adapter.persist("server", &sample_snapshot()).await.expect("persist failed");

	let mut updated = Snapshot::default();
	updated
		.prefs
		.insert("maxBitrate".into(), Entry::new(PrefValue::from(192i64), 1700000002));
	adapter.persist("server", &updated).await.expect("persist failed");

	let loaded = adapter.load("server").await.expect("load failed").expect("missing snapshot");
	assert_eq!(loaded.prefs.len(), 1);
	assert_eq!(
		loaded.prefs.get("maxBitrate").map(|e| e.value.clone()),
		Some(PrefValue::from(192i64))
	);
}

#[tokio::test]
async fn namespaces_are_isolated() {
	let (adapter, _temp) = create_test_adapter().await;

	adapter.persist("server", &sample_snapshot()).await.expect("persist failed");
	assert!(adapter.load("plugin.shuffle").await.expect("load failed").is_none());
}

#[tokio::test]
async fn corrupt_snapshot_is_an_error() {
	let (adapter, temp) = create_test_adapter().await;
	tokio::fs::write(temp.path().join("server.prefs.json"), b"{not json")
		.await
		.expect("write failed");

	assert!(adapter.load("server").await.is_err());
}

// vim: ts=4
