//! App state type

use std::sync::Arc;

use tonehub_prefs::bus::BroadcastBus;
use tonehub_prefs::{PrefService, StoreStrategy};
use tonehub_types::error::Error;
use tonehub_types::store_adapter::{RowStore, SnapshotStore};

use crate::prelude::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Deployment variant: where preference values durably live
#[derive(Debug, Clone, Copy)]
pub enum ServerMode {
	Standalone,
	Remote,
}

#[derive(Debug, Clone)]
pub struct TonehubOpts {
	pub listen: Box<str>,
	pub mode: ServerMode,
	pub snapshot_store: Option<Arc<dyn SnapshotStore>>,
	pub row_store: Option<Arc<dyn RowStore>>,
}

impl Default for TonehubOpts {
	fn default() -> Self {
		Self {
			listen: "127.0.0.1:9000".into(),
			mode: ServerMode::Standalone,
			snapshot_store: None,
			row_store: None,
		}
	}
}

pub struct AppState {
	pub opts: TonehubOpts,
	pub prefs: Arc<PrefService>,
	pub bus: Arc<BroadcastBus>,
}

pub type App = Arc<AppState>;

impl AppState {
	/// Assemble the app from its opts. The store strategy is chosen here,
	/// once, from the deployment mode.
	pub fn new(opts: TonehubOpts) -> ThResult<App> {
		let bus = Arc::new(BroadcastBus::default());
		let strategy = match opts.mode {
			ServerMode::Standalone => StoreStrategy::local(
				opts.snapshot_store
					.clone()
					.ok_or_else(|| Error::ConfigError("No snapshot store configured".into()))?,
			),
			ServerMode::Remote => StoreStrategy::remote(
				opts.row_store
					.clone()
					.ok_or_else(|| Error::ConfigError("No row store configured".into()))?,
			),
		};
		let prefs = Arc::new(PrefService::new(strategy, bus.clone()));

		Ok(Arc::new(AppState { opts, prefs, bus }))
	}
}

// vim: ts=4
