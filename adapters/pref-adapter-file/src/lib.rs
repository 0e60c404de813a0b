//! Filesystem snapshot store.
//!
//! Persists one JSON snapshot file per namespace under a base directory.
//! Every persist writes the full snapshot to a temporary file, syncs it,
//! and renames it over the previous one, so a crash mid-write leaves the
//! last complete snapshot intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{
	fs::{File, create_dir_all, rename},
	io::{AsyncReadExt, AsyncWriteExt},
};

use tonehub_types::prelude::*;
use tonehub_types::store_adapter::SnapshotStore;

/// Path of a namespace's snapshot file. Namespace names must not escape
/// the base directory.
fn snapshot_path(base_dir: &Path, namespace: &str) -> ThResult<PathBuf> {
	if namespace.is_empty() || namespace.contains(['/', '\\', '\0']) {
		Err(Error::Parse)?
	}
	Ok(base_dir.join(format!("{}.prefs.json", namespace)))
}

fn tmp_path(base_dir: &Path, namespace: &str) -> ThResult<PathBuf> {
	let mut path = snapshot_path(base_dir, namespace)?;
	path.set_extension("json.tmp");
	Ok(path)
}

#[derive(Debug)]
pub struct PrefAdapterFile {
	base_dir: Box<Path>,
}

impl PrefAdapterFile {
	pub async fn new(base_dir: Box<Path>) -> Result<Self, Error> {
		create_dir_all(&base_dir).await?;
		Ok(Self { base_dir })
	}
}

#[async_trait]
impl SnapshotStore for PrefAdapterFile {
	/// Reads the last persisted snapshot of a namespace
	async fn load(&self, namespace: &str) -> ThResult<Option<Snapshot>> {
		let path = snapshot_path(&self.base_dir, namespace)?;
		let mut file = match File::open(&path).await {
			Ok(file) => file,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
			Err(err) => return Err(err.into()),
		};

		let mut buf = String::new();
		file.read_to_string(&mut buf).await?;
		let snapshot = serde_json::from_str(&buf)
			.inspect_err(|err| warn!("Corrupt snapshot for '{}': {}", namespace, err))?;
		Ok(Some(snapshot))
	}

	/// Durably writes a namespace snapshot via tmpfile and rename
	async fn persist(&self, namespace: &str, snapshot: &Snapshot) -> ThResult<()> {
		let tmp = tmp_path(&self.base_dir, namespace)?;
		let mut file = File::create(&tmp).await?;
		file.write_all(&serde_json::to_vec(snapshot)?).await?;
		file.sync_all().await?;
		drop(file);

		rename(&tmp, snapshot_path(&self.base_dir, namespace)?).await?;
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn namespace_names_cannot_escape_base_dir() {
		let base = Path::new("/data/prefs");
		assert!(snapshot_path(base, "server").is_ok());
		assert!(snapshot_path(base, "plugin.shuffle").is_ok());
		assert!(snapshot_path(base, "../etc").is_err());
		assert!(snapshot_path(base, "").is_err());
	}
}

// vim: ts=4
