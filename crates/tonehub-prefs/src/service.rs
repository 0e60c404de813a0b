//! Preference service: lazy namespace roots and scope handout.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use tonehub_types::notify::NotifyBus;
use tonehub_types::prelude::*;

use crate::namespace::Namespace;
use crate::scope::PrefScope;
use crate::strategy::StoreStrategy;

/// Owns the store strategy, the notification bus, and the namespace cache.
/// A namespace root is created lazily on first access and lives for the
/// process lifetime; scopes are cheap views created per logical session.
pub struct PrefService {
	strategy: StoreStrategy,
	bus: Arc<dyn NotifyBus>,
	namespaces: RwLock<HashMap<Box<str>, Arc<Namespace>>>,
}

impl std::fmt::Debug for PrefService {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PrefService")
			.field("strategy", &self.strategy)
			.field("namespaces", &self.namespaces.read().len())
			.finish_non_exhaustive()
	}
}

impl PrefService {
	pub fn new(strategy: StoreStrategy, bus: Arc<dyn NotifyBus>) -> Self {
		Self { strategy, bus, namespaces: RwLock::new(HashMap::new()) }
	}

	/// Get or lazily create a namespace root. The first access loads the
	/// persisted snapshot through the store strategy.
	pub async fn namespace(&self, name: &str) -> ThResult<Arc<Namespace>> {
		if let Some(namespace) = self.namespaces.read().get(name) {
			return Ok(namespace.clone());
		}

		let namespace =
			Arc::new(Namespace::new(name, self.strategy.clone(), self.bus.clone()));
		namespace.load().await?;

		// A concurrent creation may have won the race; keep the first one
		let mut namespaces = self.namespaces.write();
		Ok(namespaces.entry(name.into()).or_insert(namespace).clone())
	}

	/// The global scope of a namespace
	pub async fn global(&self, name: &str) -> ThResult<PrefScope> {
		Ok(PrefScope::global(self.namespace(name).await?))
	}

	/// A scope bound to one client identity
	pub async fn client(&self, name: &str, client: ClientCtx) -> ThResult<PrefScope> {
		Ok(PrefScope::client(self.namespace(name).await?, client))
	}
}

// vim: ts=4
