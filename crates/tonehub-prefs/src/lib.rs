//! Namespaced preference engine.
//!
//! A namespace owns one full value mapping, its validator and on-change
//! registries, and a readonly flag; durability is delegated to a store
//! strategy chosen once at namespace construction. Callers work through
//! [`PrefScope`] views, either global or bound to one client identity,
//! obtained from a [`PrefService`].
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use tonehub_prefs::{PrefService, StoreStrategy, bus::BroadcastBus};
//! # async fn demo(snapshot_store: Arc<dyn tonehub_types::store_adapter::SnapshotStore>) -> tonehub_types::error::ThResult<()> {
//! let bus = Arc::new(BroadcastBus::new(64));
//! let service = PrefService::new(StoreStrategy::local(snapshot_store), bus);
//! let prefs = service.global("server").await?;
//! prefs.set("maxBitrate", 320i64).await?;
//! # Ok(())
//! # }
//! ```

pub mod bus;
pub mod namespace;
pub mod scope;
pub mod service;
pub mod strategy;

pub use namespace::{Namespace, OnChangeFn, ValidatorFn};
pub use scope::{PrefDefaults, PrefScope, SetOutcome};
pub use service::PrefService;
pub use strategy::{DEFAULT_NAMESPACE, StoreStrategy};

// vim: ts=4
