use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use termtools_output::OutputChannel;
use termtools_worker::panic_message;

use crate::{Blueprint, ConfigValue, FromConfigValue, HandlerError, Hook, Menu, MenuItem, RegistryError};

/// Which lifecycle hook list is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
	Init,
	Cleanup,
}

impl Phase {
	const fn as_str(self) -> &'static str {
		match self {
			Self::Init => "init",
			Self::Cleanup => "cleanup",
		}
	}
}

/// The application context: registered blueprints, the menu index, the config
/// store and the output channel.
///
/// One instance per process, owned by the entry point. Registration takes
/// `&mut self` and happens before any background worker exists; everything a
/// handler can reach goes through `&self`.
pub struct Registry {
	name: String,
	blueprints: Vec<Blueprint>,
	index: IndexMap<String, Arc<MenuItem>>,
	config: RwLock<FxHashMap<String, ConfigValue>>,
	output: OutputChannel,
	shut_down: AtomicBool,
}

impl Registry {
	/// Creates an empty registry reporting through `output`.
	pub fn new(name: impl Into<String>, output: OutputChannel) -> Self {
		Self {
			name: name.into(),
			blueprints: Vec::new(),
			index: IndexMap::new(),
			config: RwLock::new(FxHashMap::default()),
			output,
			shut_down: AtomicBool::new(false),
		}
	}

	/// Application name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Output channel shared with handlers and their workers.
	pub fn output(&self) -> &OutputChannel {
		&self.output
	}

	/// Registers a blueprint and runs its init hooks.
	///
	/// Either every item of the blueprint is inserted or none is: a name or key
	/// collision leaves the registry untouched and runs no hooks. Init hook
	/// failures are reported and logged but do not undo the registration.
	pub fn register(&mut self, blueprint: Blueprint) -> Result<(), RegistryError> {
		if self.blueprints.iter().any(|existing| existing.name() == blueprint.name()) {
			return Err(RegistryError::DuplicateBlueprint(blueprint.name().to_string()));
		}
		if let Some((item, existing)) = blueprint
			.items()
			.iter()
			.find_map(|item| self.index.get(item.key()).map(|existing| (item, existing)))
		{
			return Err(RegistryError::DuplicateKey {
				key: item.key().to_string(),
				blueprint: blueprint.name().to_string(),
				existing: existing.blueprint().to_string(),
			});
		}

		for item in blueprint.items() {
			self.index.insert(item.key().to_string(), Arc::clone(item));
		}
		tracing::info!(
			blueprint = blueprint.name(),
			items = blueprint.items().len(),
			total = self.index.len(),
			"registry.register"
		);

		let hooks = blueprint.init_hooks().to_vec();
		let name = blueprint.name().to_string();
		self.blueprints.push(blueprint);
		self.run_hooks(&name, Phase::Init, &hooks);
		Ok(())
	}

	/// Registered blueprints in registration order.
	pub fn blueprints(&self) -> impl Iterator<Item = &Blueprint> {
		self.blueprints.iter()
	}

	/// Looks up a registered blueprint by name.
	pub fn blueprint(&self, name: &str) -> Option<&Blueprint> {
		self.blueprints.iter().find(|blueprint| blueprint.name() == name)
	}

	/// Looks up a menu item by key.
	pub fn get_item(&self, key: &str) -> Option<&MenuItem> {
		self.index.get(key).map(|item| &**item)
	}

	/// Returns true if `key` is bound.
	pub fn contains_key(&self, key: &str) -> bool {
		self.index.contains_key(key)
	}

	/// Registration sequence of `key` (0 for the first item ever registered).
	pub fn sequence(&self, key: &str) -> Option<usize> {
		self.index.get_index_of(key)
	}

	/// Number of registered menu items.
	pub fn len(&self) -> usize {
		self.index.len()
	}

	/// Returns true when no menu items are registered.
	pub fn is_empty(&self) -> bool {
		self.index.is_empty()
	}

	/// Grouped, ordered view of the menu, derived from the index on every call.
	pub fn menu(&self) -> Menu<'_> {
		Menu::new(&self.index)
	}

	/// Stores `value` under `key`, replacing any previous value.
	pub fn set_config(&self, key: impl Into<String>, value: impl Into<ConfigValue>) {
		let key = key.into();
		let value = value.into();
		tracing::trace!(key = %key, kind = value.type_name(), "config.set");
		self.config.write().insert(key, value);
	}

	/// Returns the value under `key`, or `default` when absent.
	pub fn get_config(&self, key: &str, default: impl Into<ConfigValue>) -> ConfigValue {
		self.config_value(key).unwrap_or_else(|| default.into())
	}

	/// Returns the value under `key`, if any.
	pub fn config_value(&self, key: &str) -> Option<ConfigValue> {
		self.config.read().get(key).cloned()
	}

	/// Returns the value under `key` if it exists and has type `T`.
	pub fn config_as<T: FromConfigValue>(&self, key: &str) -> Option<T> {
		self.config.read().get(key).and_then(T::from_config)
	}

	/// Removes `key`, returning its previous value.
	pub fn remove_config(&self, key: &str) -> Option<ConfigValue> {
		self.config.write().remove(key)
	}

	/// All config entries, sorted by key.
	pub fn config_snapshot(&self) -> Vec<(String, ConfigValue)> {
		let mut entries: Vec<_> = self
			.config
			.read()
			.iter()
			.map(|(key, value)| (key.clone(), value.clone()))
			.collect();
		entries.sort_by(|a, b| a.0.cmp(&b.0));
		entries
	}

	/// Runs every cleanup hook: blueprints in registration order, hooks in the
	/// order they were added.
	///
	/// A failing hook is reported and the rest still run. Only the first call
	/// does anything; returns the number of failed hooks.
	pub fn shutdown(&self) -> usize {
		if self.shut_down.swap(true, Ordering::AcqRel) {
			tracing::debug!("registry.shutdown already done");
			return 0;
		}
		let failures = self
			.blueprints
			.iter()
			.map(|blueprint| self.run_hooks(blueprint.name(), Phase::Cleanup, blueprint.cleanup_hooks()))
			.sum();
		tracing::info!(blueprints = self.blueprints.len(), failures, "registry.shutdown");
		failures
	}

	/// Returns true once [`Registry::shutdown`] has run.
	pub fn is_shut_down(&self) -> bool {
		self.shut_down.load(Ordering::Acquire)
	}

	fn run_hooks(&self, blueprint: &str, phase: Phase, hooks: &[Hook]) -> usize {
		let mut failures = 0;
		for (index, hook) in hooks.iter().enumerate() {
			let result = catch_unwind(AssertUnwindSafe(|| hook(self)))
				.unwrap_or_else(|payload| Err(HandlerError::Panicked(panic_message(payload.as_ref()))));
			if let Err(error) = result {
				failures += 1;
				tracing::warn!(
					blueprint,
					phase = phase.as_str(),
					hook = index,
					kind = error.kind(),
					%error,
					"registry.hook failed"
				);
				self.output
					.error(format!("✗ Error in {blueprint} {}: {}: {error}", phase.as_str(), error.kind()));
			}
		}
		failures
	}
}

impl fmt::Debug for Registry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Registry")
			.field("name", &self.name)
			.field("blueprints", &self.blueprints.len())
			.field("menu_items", &self.index.len())
			.field("shut_down", &self.is_shut_down())
			.finish()
	}
}
