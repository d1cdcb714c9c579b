use std::fmt;
use std::sync::Arc;

use crate::{HandlerResult, Registry};

type PlainFn = dyn Fn(&[String]) -> HandlerResult + Send + Sync;
type ContextFn = dyn Fn(&Registry, &[String]) -> HandlerResult + Send + Sync;

/// Callable bound to a menu item.
///
/// Whether the handler receives the registry as context is decided once, by
/// the constructor used, and cached on the item.
#[derive(Clone)]
pub enum Handler {
	/// Called with the extra arguments only.
	Plain(Arc<PlainFn>),
	/// Called with the live registry, then the extra arguments.
	WithContext(Arc<ContextFn>),
}

impl Handler {
	/// Wraps a handler that does not need the application context.
	pub fn plain(f: impl Fn(&[String]) -> HandlerResult + Send + Sync + 'static) -> Self {
		Self::Plain(Arc::new(f))
	}

	/// Wraps a handler that receives the application context.
	pub fn with_context(f: impl Fn(&Registry, &[String]) -> HandlerResult + Send + Sync + 'static) -> Self {
		Self::WithContext(Arc::new(f))
	}

	/// Returns true if the registry is injected on invocation.
	pub const fn wants_context(&self) -> bool {
		matches!(self, Self::WithContext(_))
	}

	pub(crate) fn invoke(&self, ctx: &Registry, args: &[String]) -> HandlerResult {
		match self {
			Self::Plain(f) => f(args),
			Self::WithContext(f) => f(ctx, args),
		}
	}
}

impl fmt::Debug for Handler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Plain(_) => f.write_str("Handler::Plain(..)"),
			Self::WithContext(_) => f.write_str("Handler::WithContext(..)"),
		}
	}
}

/// One selectable action. Immutable once created.
pub struct MenuItem {
	key: String,
	title: String,
	description: String,
	category: String,
	order: i32,
	blueprint: String,
	handler: Handler,
}

impl MenuItem {
	pub(crate) fn new(
		key: String,
		title: String,
		description: String,
		category: String,
		order: i32,
		blueprint: String,
		handler: Handler,
	) -> Self {
		Self {
			key,
			title,
			description,
			category,
			order,
			blueprint,
			handler,
		}
	}

	/// Selection key, unique across the registry.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Display title.
	pub fn title(&self) -> &str {
		&self.title
	}

	/// Display description.
	pub fn description(&self) -> &str {
		&self.description
	}

	/// Grouping label.
	pub fn category(&self) -> &str {
		&self.category
	}

	/// Ordering within the category (ascending).
	pub fn order(&self) -> i32 {
		self.order
	}

	/// Name of the blueprint that created the item.
	pub fn blueprint(&self) -> &str {
		&self.blueprint
	}

	/// Bound handler.
	pub fn handler(&self) -> &Handler {
		&self.handler
	}

	/// Returns true if the handler receives the registry as context.
	pub fn wants_context(&self) -> bool {
		self.handler.wants_context()
	}
}

impl fmt::Debug for MenuItem {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MenuItem")
			.field("key", &self.key)
			.field("title", &self.title)
			.field("category", &self.category)
			.field("order", &self.order)
			.field("blueprint", &self.blueprint)
			.field("wants_context", &self.wants_context())
			.finish()
	}
}
