//! Namespace root: owner of one namespace's values and registries.

use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tonehub_types::notify::NotifyBus;
use tonehub_types::prelude::*;

use crate::scope::PrefScope;
use crate::strategy::StoreStrategy;

/// Validator contract: `(name, new_value, params, old_value, scope)`.
/// Absent validator means always valid.
pub type ValidatorFn = Box<
	dyn Fn(&str, &PrefValue, &serde_json::Value, Option<&PrefValue>, &PrefScope) -> bool
		+ Send
		+ Sync,
>;

/// On-change contract: `(name, new_value, scope)`, run synchronously in
/// registration order after a successful, value-changing `set`.
pub type OnChangeFn = Box<dyn Fn(&str, &PrefValue, &PrefScope) + Send + Sync>;

struct Validator {
	params: serde_json::Value,
	check: ValidatorFn,
}

/// Owns one namespace's full value mapping, the per-client mappings, the
/// validator and on-change registries, and the readonly flag. Registries
/// are explicit per-namespace objects, constructed with the namespace and
/// torn down with the process; nothing here is ambient global state.
///
/// Created lazily on first access through
/// [`PrefService`](crate::PrefService) and cached for the process lifetime.
pub struct Namespace {
	name: Box<str>,
	entries: Arc<RwLock<EntryMap>>,
	clients: RwLock<HashMap<Box<str>, Arc<RwLock<EntryMap>>>>,
	validators: RwLock<HashMap<Box<str>, Validator>>,
	on_change: RwLock<HashMap<Box<str>, Vec<OnChangeFn>>>,
	sequence_prefs: RwLock<HashSet<Box<str>>>,
	readonly: AtomicBool,
	strategy: StoreStrategy,
	bus: Arc<dyn NotifyBus>,
}

impl Debug for Namespace {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Namespace")
			.field("name", &self.name)
			.field("readonly", &self.readonly.load(Ordering::Relaxed))
			.field("strategy", &self.strategy)
			.finish_non_exhaustive()
	}
}

impl Namespace {
	pub(crate) fn new(name: &str, strategy: StoreStrategy, bus: Arc<dyn NotifyBus>) -> Self {
		Self {
			name: name.into(),
			entries: Arc::new(RwLock::new(EntryMap::new())),
			clients: RwLock::new(HashMap::new()),
			validators: RwLock::new(HashMap::new()),
			on_change: RwLock::new(HashMap::new()),
			sequence_prefs: RwLock::new(HashSet::new()),
			readonly: AtomicBool::new(false),
			strategy,
			bus,
		}
	}

	/// Restore the namespace from its persisted snapshot, if any
	pub(crate) async fn load(&self) -> ThResult<()> {
		let Some(snapshot) = self.strategy.load(&self.name).await? else {
			return Ok(());
		};

		debug!("Loaded {} entries for namespace '{}'", snapshot.prefs.len(), self.name);
		*self.entries.write() = snapshot.prefs;
		let mut clients = self.clients.write();
		for (client_id, entries) in snapshot.clients {
			clients.insert(client_id, Arc::new(RwLock::new(entries)));
		}
		Ok(())
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub(crate) fn strategy(&self) -> &StoreStrategy {
		&self.strategy
	}

	pub(crate) fn bus(&self) -> &Arc<dyn NotifyBus> {
		&self.bus
	}

	pub fn is_readonly(&self) -> bool {
		self.readonly.load(Ordering::Relaxed)
	}

	/// Coarse, whole-namespace write protection
	pub fn set_readonly(&self, readonly: bool) {
		self.readonly.store(readonly, Ordering::Relaxed);
	}

	/// Register a validator for a preference name. The validator gates
	/// every public `set`; `params` is handed back to it on each call.
	pub fn register_validator<F>(&self, name: &str, params: serde_json::Value, check: F)
	where
		F: Fn(&str, &PrefValue, &serde_json::Value, Option<&PrefValue>, &PrefScope) -> bool
			+ Send
			+ Sync
			+ 'static,
	{
		debug!("Registering validator for '{}.{}'", self.name, name);
		self.validators
			.write()
			.insert(name.into(), Validator { params, check: Box::new(check) });
	}

	/// Append an on-change callback for a preference name. Callbacks run
	/// in registration order.
	pub fn register_on_change<F>(&self, name: &str, callback: F)
	where
		F: Fn(&str, &PrefValue, &PrefScope) + Send + Sync + 'static,
	{
		self.on_change.write().entry(name.into()).or_default().push(Box::new(callback));
	}

	/// Mark a legacy preference name whose remote value must always come
	/// back sequence-shaped, even when stored as a bare scalar row.
	pub fn register_sequence_pref(&self, name: &str) {
		self.sequence_prefs.write().insert(name.into());
	}

	pub fn has_validator(&self, name: &str) -> bool {
		self.validators.read().contains_key(name)
	}

	pub(crate) fn is_sequence_pref(&self, name: &str) -> bool {
		self.sequence_prefs.read().contains(name)
	}

	/// Run the registered validator; absent validator means valid.
	/// Validators must not register validators from inside the call.
	pub(crate) fn validate(
		&self,
		name: &str,
		new_value: &PrefValue,
		old_value: Option<&PrefValue>,
		scope: &PrefScope,
	) -> bool {
		let validators = self.validators.read();
		match validators.get(name) {
			Some(validator) => {
				(validator.check)(name, new_value, &validator.params, old_value, scope)
			}
			None => true,
		}
	}

	/// Run every on-change callback for a name, in registration order,
	/// synchronously on the caller's execution path.
	pub(crate) fn run_on_change(&self, name: &str, value: &PrefValue, scope: &PrefScope) {
		let on_change = self.on_change.read();
		if let Some(callbacks) = on_change.get(name) {
			for callback in callbacks {
				callback(name, value, scope);
			}
		}
	}

	pub(crate) fn global_entries(&self) -> Arc<RwLock<EntryMap>> {
		self.entries.clone()
	}

	/// Entry map of one client, shared by reference between every scope of
	/// the same (namespace, client) pair. Client preferences never fall
	/// back to global values.
	pub(crate) fn client_entries(&self, client_id: &str) -> Arc<RwLock<EntryMap>> {
		if let Some(entries) = self.clients.read().get(client_id) {
			return entries.clone();
		}
		self.clients
			.write()
			.entry(client_id.into())
			.or_insert_with(|| Arc::new(RwLock::new(EntryMap::new())))
			.clone()
	}

	/// Durably write the namespace's current value mapping through the
	/// configured store strategy. Synchronous from the caller's point of
	/// view: the triggering public call blocks until durability completes,
	/// and a failure propagates to it uncaught.
	pub async fn persist(&self) -> ThResult<()> {
		let snapshot = self.snapshot();
		self.strategy.persist(&self.name, &snapshot).await
	}

	fn snapshot(&self) -> Snapshot {
		let prefs = self.entries.read().clone();
		let clients = self
			.clients
			.read()
			.iter()
			.map(|(client_id, entries)| (client_id.clone(), entries.read().clone()))
			.collect();
		Snapshot { prefs, clients }
	}
}

// vim: ts=4
