use std::{env, path, sync::Arc};

use tonehub::{ServerMode, TonehubOpts};
use tonehub_pref_adapter_file::PrefAdapterFile;
use tonehub_pref_adapter_sqlite::PrefAdapterSqlite;

pub struct Config {
	pub listen: String,
	pub db_dir: path::PathBuf,
	pub remote: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
	let config = Config {
		listen: env::var("LISTEN").unwrap_or("127.0.0.1:9000".to_string()),
		db_dir: path::PathBuf::from(env::var("DB_DIR").unwrap_or("./data".to_string())),
		remote: env::var("REMOTE_PREFS").is_ok(),
	};

	let opts = if config.remote {
		let row_store = Arc::new(PrefAdapterSqlite::new(config.db_dir.join("prefs.db")).await.unwrap());
		TonehubOpts {
			listen: config.listen.into(),
			mode: ServerMode::Remote,
			snapshot_store: None,
			row_store: Some(row_store),
		}
	} else {
		let snapshot_store =
			Arc::new(PrefAdapterFile::new(config.db_dir.into_boxed_path()).await.unwrap());
		TonehubOpts {
			listen: config.listen.into(),
			mode: ServerMode::Standalone,
			snapshot_store: Some(snapshot_store),
			row_store: None,
		}
	};

	tonehub::run(opts).await.unwrap();
}

// vim: ts=4
