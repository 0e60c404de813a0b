//! Preference scope: a view over one namespace, global or client-bound.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use tonehub_types::notify::{NotifyTarget, PrefSetEvent};
use tonehub_types::prelude::*;
use tonehub_types::types::WIPED_TIMESTAMP;
use tonehub_types::value::INTERNAL_PREFIX;

use crate::namespace::Namespace;

/// Result of a `set`: the stored value and whether the set was accepted.
///
/// Recoverable rejections (validation, readonly namespace) come back here
/// with `accepted == false` and the previously stored value; only backend
/// I/O failures are raised as errors.
#[derive(Debug, Clone, PartialEq)]
pub struct SetOutcome {
	pub value: Option<PrefValue>,
	pub accepted: bool,
}

impl SetOutcome {
	fn accepted(value: PrefValue) -> Self {
		Self { value: Some(value), accepted: true }
	}

	fn rejected(old: Option<PrefValue>) -> Self {
		Self { value: old, accepted: false }
	}
}

/// Default source used by [`PrefScope::init`]
enum DefaultSource {
	Literal(PrefValue),
	Provider(Box<dyn Fn(&PrefScope) -> PrefValue + Send + Sync>),
}

/// Defaults handed to [`PrefScope::init`]: literal values or provider
/// functions invoked with the scope handle.
#[derive(Default)]
pub struct PrefDefaults {
	entries: Vec<(Box<str>, DefaultSource)>,
}

impl PrefDefaults {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn value(mut self, name: &str, value: impl Into<PrefValue>) -> Self {
		self.entries.push((name.into(), DefaultSource::Literal(value.into())));
		self
	}

	pub fn provider<F>(mut self, name: &str, provider: F) -> Self
	where
		F: Fn(&PrefScope) -> PrefValue + Send + Sync + 'static,
	{
		self.entries.push((name.into(), DefaultSource::Provider(Box::new(provider))));
		self
	}
}

/// A view over a namespace's values.
///
/// The global scope shares the namespace's own entry map; a client-bound
/// scope owns a separate map shared by reference between every scope of
/// the same (namespace, client) pair. Client preferences never fall back
/// to global values.
#[derive(Clone)]
pub struct PrefScope {
	namespace: Arc<Namespace>,
	client: Option<ClientCtx>,
	entries: Arc<RwLock<EntryMap>>,
}

impl std::fmt::Debug for PrefScope {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PrefScope")
			.field("namespace", &self.namespace.name())
			.field("client", &self.client)
			.finish_non_exhaustive()
	}
}

impl PrefScope {
	pub(crate) fn global(namespace: Arc<Namespace>) -> Self {
		let entries = namespace.global_entries();
		Self { namespace, client: None, entries }
	}

	pub(crate) fn client(namespace: Arc<Namespace>, client: ClientCtx) -> Self {
		let entries = namespace.client_entries(&client.client_id);
		Self { namespace, client: Some(client), entries }
	}

	pub fn namespace_name(&self) -> &str {
		self.namespace.name()
	}

	pub fn namespace(&self) -> &Arc<Namespace> {
		&self.namespace
	}

	pub fn client_id(&self) -> Option<&str> {
		self.client.as_ref().map(|c| c.client_id.as_ref())
	}

	pub fn has_validator(&self, name: &str) -> bool {
		self.namespace.has_validator(name)
	}

	/// Get the stored value
	pub async fn get(&self, name: &str) -> ThResult<Option<PrefValue>> {
		self.get_reload(name, false).await
	}

	/// Get the stored value, optionally bypassing the locally materialized
	/// cache of a remote client-bound scope.
	///
	/// In remote client-bound mode a cache miss (or a forced reload)
	/// fetches from the row store, caches the result, and applies the
	/// legacy sequence coercion for registered names.
	pub async fn get_reload(&self, name: &str, force_reload: bool) -> ThResult<Option<PrefValue>> {
		let cached = self.entries.read().get(name).map(|entry| entry.value.clone());

		let strategy = self.namespace.strategy();
		if let Some(client) = &self.client {
			if strategy.is_remote() && (cached.is_none() || force_reload) {
				if let Some(fetched) =
					strategy.fetch(client, self.namespace.name(), name).await?
				{
					let fetched = if self.namespace.is_sequence_pref(name) {
						fetched.into_sequence_value()
					} else {
						fetched
					};
					self.entries
						.write()
						.insert(name.into(), Entry::new(fetched.clone(), 0));
					return Ok(Some(fetched));
				}
				return Ok(cached);
			}
		}

		Ok(cached)
	}

	/// Get a value flattened into its scalar elements: a sequence yields
	/// its elements, a scalar yields one element, absence yields none.
	pub async fn get_list(&self, name: &str) -> ThResult<Vec<Scalar>> {
		Ok(self.get(name).await?.map(PrefValue::into_elements).unwrap_or_default())
	}

	pub async fn get_str(&self, name: &str) -> ThResult<Option<Box<str>>> {
		Ok(self
			.get(name)
			.await?
			.and_then(|v| v.as_scalar().and_then(Scalar::as_str).map(Into::into)))
	}

	pub async fn get_int(&self, name: &str) -> ThResult<Option<i64>> {
		Ok(self.get(name).await?.and_then(|v| v.as_scalar().and_then(Scalar::as_int)))
	}

	pub async fn get_bool(&self, name: &str) -> ThResult<Option<bool>> {
		Ok(self.get(name).await?.and_then(|v| v.as_scalar().and_then(Scalar::as_bool)))
	}

	/// Store a new value, running the full pipeline: redundant-write
	/// suppression, validation, readonly check, shape coercion, durable
	/// persistence, remote row write, on-change callbacks, notification.
	pub async fn set(&self, name: &str, value: impl Into<PrefValue>) -> ThResult<SetOutcome> {
		self.set_inner(name, value.into(), false).await
	}

	/// `set` without the remote row write, for values that already exist
	/// remotely (bootstrap paths).
	pub async fn set_skip_remote(
		&self,
		name: &str,
		value: impl Into<PrefValue>,
	) -> ThResult<SetOutcome> {
		self.set_inner(name, value.into(), true).await
	}

	async fn set_inner(
		&self,
		name: &str,
		new_value: PrefValue,
		skip_remote_write: bool,
	) -> ThResult<SetOutcome> {
		let strategy = self.namespace.strategy();
		let mut old_value = self.entries.read().get(name).map(|entry| entry.value.clone());

		// The stored shape decides the pipeline (redundant-write check,
		// validator old value, sticky sequence shape), so a cold remote
		// cache must consult the row store before going on
		if old_value.is_none() && strategy.is_remote() {
			if let Some(client) = &self.client {
				old_value = strategy
					.fetch(client, self.namespace.name(), name)
					.await?
					.map(|fetched| {
						if self.namespace.is_sequence_pref(name) {
							fetched.into_sequence_value()
						} else {
							fetched
						}
					});
			}
		}

		// A scalar set equal to the current scalar is a no-op: no persist,
		// no callbacks, no notification. Containers always count as
		// changed, even when structurally identical.
		if let (Some(PrefValue::Scalar(old)), PrefValue::Scalar(new)) = (&old_value, &new_value) {
			if old == new {
				return Ok(SetOutcome::accepted(new_value));
			}
		}

		// Internal names are not settable through the public path outside
		// remote mode
		if name.starts_with(INTERNAL_PREFIX) && !strategy.is_remote() {
			warn!("Refusing set of internal preference '{}.{}'", self.namespace.name(), name);
			return Ok(SetOutcome::rejected(old_value));
		}

		if !self.namespace.validate(name, &new_value, old_value.as_ref(), self) {
			warn!(
				"Validation rejected value for '{}.{}' ({})",
				self.namespace.name(),
				name,
				new_value.shape_name()
			);
			return Ok(SetOutcome::rejected(old_value));
		}

		if self.namespace.is_readonly() {
			warn!(
				"Refusing set of '{}.{}': namespace is readonly (scope: {})",
				self.namespace.name(),
				name,
				self.client_id().unwrap_or("global")
			);
			return Ok(SetOutcome::rejected(old_value));
		}

		// Sticky sequence shape in remote mode: a scalar set on a
		// sequence-shaped preference becomes a one-element sequence
		let new_value = if strategy.sequence_shape_sticky()
			&& matches!(old_value, Some(PrefValue::Sequence(_)))
			&& new_value.is_scalar()
		{
			new_value.into_sequence_value()
		} else {
			new_value
		};

		let modified = if strategy.tracks_timestamps() { now() } else { 0 };
		self.entries.write().insert(name.into(), Entry::new(new_value.clone(), modified));

		self.namespace.persist().await?;

		if let Some(client) = &self.client {
			if !skip_remote_write {
				strategy.store(client, self.namespace.name(), name, &new_value).await?;
			}
		}

		// Past the scalar no-op the value always counts as changed:
		// callbacks run in registration order, then one bus event goes out
		self.namespace.run_on_change(name, &new_value, self);
		self.publish(name, &new_value);

		Ok(SetOutcome::accepted(new_value))
	}

	/// Run the registered validator without storing anything
	pub fn validate(&self, name: &str, value: &PrefValue) -> bool {
		let old_value = self.entries.read().get(name).map(|entry| entry.value.clone());
		self.namespace.validate(name, value, old_value.as_ref(), self)
	}

	/// Assign defaults for names not already present, bypassing validation
	/// and on-change callbacks. Providers are invoked with the scope
	/// handle. Persists once at the end if anything was assigned.
	pub async fn init(&self, defaults: PrefDefaults) -> ThResult<()> {
		let strategy = self.namespace.strategy();
		let modified = if strategy.tracks_timestamps() { now() } else { 0 };
		let mut changed = false;

		for (name, source) in defaults.entries {
			if self.entries.read().contains_key(&name) {
				continue;
			}
			let value = match source {
				// Owned literals cannot alias another scope's containers
				DefaultSource::Literal(value) => value,
				DefaultSource::Provider(provider) => provider(self),
			};
			self.entries.write().insert(name, Entry::new(value, modified));
			changed = true;
		}

		if changed {
			self.namespace.persist().await?;
		}
		Ok(())
	}

	/// Delete the named values (and their timestamps); remote mode also
	/// clears the rows. Persists once after the batch.
	pub async fn remove(&self, names: &[&str]) -> ThResult<()> {
		for name in names {
			self.entries.write().remove(*name);
			if let Some(client) = &self.client {
				self.namespace
					.strategy()
					.clear_key(client, self.namespace.name(), name)
					.await?;
			}
		}
		self.namespace.persist().await
	}

	/// Snapshot of the scope's values, excluding internal names
	pub fn all(&self) -> HashMap<Box<str>, PrefValue> {
		self.entries
			.read()
			.iter()
			.filter(|(name, _)| !name.starts_with(INTERNAL_PREFIX))
			.map(|(name, entry)| (name.clone(), entry.value.clone()))
			.collect()
	}

	/// Wipe every value in the scope's mapping. Remote mode only; a no-op
	/// in local mode.
	pub fn clear(&self) {
		if self.namespace.strategy().supports_clear() {
			self.entries.write().clear();
		} else {
			debug!("clear() is unsupported in local mode, ignoring");
		}
	}

	/// Bulk-assign a raw mapping directly into the scope's storage,
	/// bypassing validation, coercion, and notification. Bootstrap only.
	pub fn load_hash(&self, raw: HashMap<Box<str>, PrefValue>) {
		let mut entries = self.entries.write();
		for (name, value) in raw {
			entries.insert(name, Entry::new(value, 0));
		}
	}

	/// Last-modified time of an entry; always 0 in remote mode
	pub fn timestamp(&self, name: &str) -> Timestamp {
		if !self.namespace.strategy().tracks_timestamps() {
			return 0;
		}
		self.entries.read().get(name).map(|entry| entry.modified).unwrap_or(0)
	}

	/// Plant the wiped-timestamp sentinel, forcing the next `set` to
	/// refresh the stored time. Local mode only.
	pub fn wipe_timestamp(&self, name: &str) {
		if !self.namespace.strategy().tracks_timestamps() {
			return;
		}
		if let Some(entry) = self.entries.write().get_mut(name) {
			entry.modified = WIPED_TIMESTAMP;
		}
	}

	fn publish(&self, name: &str, value: &PrefValue) {
		let target = match &self.client {
			Some(client) => NotifyTarget::Client(client.client_id.clone()),
			None => NotifyTarget::Global,
		};
		self.namespace.bus().publish(PrefSetEvent::new(
			target,
			self.namespace.name(),
			name,
			value.clone(),
		));
	}
}

// vim: ts=4
