use std::fmt;
use std::sync::Arc;

use crate::{Handler, HookResult, MenuItem, Registry, RegistryError};

/// Lifecycle hook receiving the application context.
pub type Hook = Arc<dyn Fn(&Registry) -> HookResult + Send + Sync>;

/// A named bundle of menu items and lifecycle hooks contributed by one feature.
///
/// Built and mutated by its feature before registration. Once handed to
/// [`Registry::register`] it is read-only.
pub struct Blueprint {
	name: String,
	description: String,
	items: Vec<Arc<MenuItem>>,
	init_hooks: Vec<Hook>,
	cleanup_hooks: Vec<Hook>,
}

impl Blueprint {
	/// Creates an empty blueprint.
	pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			description: description.into(),
			items: Vec::new(),
			init_hooks: Vec::new(),
			cleanup_hooks: Vec::new(),
		}
	}

	/// Adds a menu item.
	///
	/// Fails if `key` is empty or already used by this blueprint. Collisions with
	/// other blueprints are detected by [`Registry::register`].
	pub fn add_item(
		&mut self,
		key: impl Into<String>,
		title: impl Into<String>,
		description: impl Into<String>,
		category: impl Into<String>,
		order: i32,
		handler: Handler,
	) -> Result<&mut Self, RegistryError> {
		let key = key.into();
		if key.is_empty() {
			return Err(RegistryError::EmptyKey(self.name.clone()));
		}
		if self.items.iter().any(|item| item.key() == key) {
			return Err(RegistryError::DuplicateKey {
				key,
				blueprint: self.name.clone(),
				existing: self.name.clone(),
			});
		}
		self.items.push(Arc::new(MenuItem::new(
			key,
			title.into(),
			description.into(),
			category.into(),
			order,
			self.name.clone(),
			handler,
		)));
		Ok(self)
	}

	/// Appends an init hook, run after the blueprint is registered.
	pub fn on_init(&mut self, hook: impl Fn(&Registry) -> HookResult + Send + Sync + 'static) -> &mut Self {
		self.init_hooks.push(Arc::new(hook));
		self
	}

	/// Appends a cleanup hook, run by [`Registry::shutdown`].
	pub fn on_cleanup(&mut self, hook: impl Fn(&Registry) -> HookResult + Send + Sync + 'static) -> &mut Self {
		self.cleanup_hooks.push(Arc::new(hook));
		self
	}

	/// Blueprint name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Free-text description.
	pub fn description(&self) -> &str {
		&self.description
	}

	/// Items in the order they were added.
	pub fn items(&self) -> &[Arc<MenuItem>] {
		&self.items
	}

	/// Number of init hooks.
	pub fn init_hook_count(&self) -> usize {
		self.init_hooks.len()
	}

	/// Number of cleanup hooks.
	pub fn cleanup_hook_count(&self) -> usize {
		self.cleanup_hooks.len()
	}

	pub(crate) fn init_hooks(&self) -> &[Hook] {
		&self.init_hooks
	}

	pub(crate) fn cleanup_hooks(&self) -> &[Hook] {
		&self.cleanup_hooks
	}
}

impl fmt::Debug for Blueprint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Blueprint")
			.field("name", &self.name)
			.field("items", &self.items)
			.field("init_hooks", &self.init_hooks.len())
			.field("cleanup_hooks", &self.cleanup_hooks.len())
			.finish()
	}
}
