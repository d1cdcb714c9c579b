use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A value in the application's in-memory config store.
///
/// The store imposes no schema; callers agree on the meaning of each key.
/// [`ConfigValue::Shared`] carries any `Send + Sync` object, such as a feature's
/// service instance that other handlers look up by key.
#[derive(Clone)]
pub enum ConfigValue {
	/// Boolean value.
	Bool(bool),
	/// Integer value.
	Int(i64),
	/// Floating point value.
	Float(f64),
	/// String value.
	String(String),
	/// Ordered list of values.
	List(Vec<ConfigValue>),
	/// Arbitrary shared object.
	Shared(Arc<dyn Any + Send + Sync>),
}

impl ConfigValue {
	/// Wraps an arbitrary object.
	pub fn shared<T: Any + Send + Sync>(value: T) -> Self {
		Self::Shared(Arc::new(value))
	}

	/// Parses a command-line literal: `true`/`false`, then integer, then float,
	/// falling back to a string.
	pub fn parse_literal(raw: &str) -> Self {
		match raw {
			"true" => return Self::Bool(true),
			"false" => return Self::Bool(false),
			_ => {}
		}
		if let Ok(int) = raw.parse::<i64>() {
			return Self::Int(int);
		}
		if let Ok(float) = raw.parse::<f64>()
			&& float.is_finite()
		{
			return Self::Float(float);
		}
		Self::String(raw.to_string())
	}

	/// Returns the boolean value if this is a `Bool`.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the integer value if this is an `Int`.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the value as a float; integers are widened.
	pub fn as_float(&self) -> Option<f64> {
		match self {
			Self::Float(v) => Some(*v),
			Self::Int(v) => Some(*v as f64),
			_ => None,
		}
	}

	/// Returns the string value if this is a `String`.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the list if this is a `List`.
	pub fn as_list(&self) -> Option<&[ConfigValue]> {
		match self {
			Self::List(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the shared object if this is a `Shared` of type `T`.
	pub fn downcast_shared<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
		match self {
			Self::Shared(v) => Arc::clone(v).downcast::<T>().ok(),
			_ => None,
		}
	}

	/// Returns the type name of this value.
	pub fn type_name(&self) -> &'static str {
		match self {
			Self::Bool(_) => "bool",
			Self::Int(_) => "int",
			Self::Float(_) => "float",
			Self::String(_) => "string",
			Self::List(_) => "list",
			Self::Shared(_) => "shared",
		}
	}
}

impl PartialEq for ConfigValue {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Bool(a), Self::Bool(b)) => a == b,
			(Self::Int(a), Self::Int(b)) => a == b,
			(Self::Float(a), Self::Float(b)) => a == b,
			(Self::String(a), Self::String(b)) => a == b,
			(Self::List(a), Self::List(b)) => a == b,
			(Self::Shared(a), Self::Shared(b)) => Arc::ptr_eq(a, b),
			_ => false,
		}
	}
}

impl fmt::Debug for ConfigValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
			Self::Int(v) => f.debug_tuple("Int").field(v).finish(),
			Self::Float(v) => f.debug_tuple("Float").field(v).finish(),
			Self::String(v) => f.debug_tuple("String").field(v).finish(),
			Self::List(v) => f.debug_tuple("List").field(v).finish(),
			Self::Shared(_) => f.write_str("Shared(..)"),
		}
	}
}

impl fmt::Display for ConfigValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool(v) => write!(f, "{v}"),
			Self::Int(v) => write!(f, "{v}"),
			Self::Float(v) => write!(f, "{v}"),
			Self::String(v) => f.write_str(v),
			Self::List(items) => {
				f.write_str("[")?;
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{item}")?;
				}
				f.write_str("]")
			}
			Self::Shared(_) => f.write_str("<shared>"),
		}
	}
}

impl From<bool> for ConfigValue {
	fn from(v: bool) -> Self {
		Self::Bool(v)
	}
}

impl From<i64> for ConfigValue {
	fn from(v: i64) -> Self {
		Self::Int(v)
	}
}

impl From<i32> for ConfigValue {
	fn from(v: i32) -> Self {
		Self::Int(i64::from(v))
	}
}

impl From<f64> for ConfigValue {
	fn from(v: f64) -> Self {
		Self::Float(v)
	}
}

impl From<String> for ConfigValue {
	fn from(v: String) -> Self {
		Self::String(v)
	}
}

impl From<&str> for ConfigValue {
	fn from(v: &str) -> Self {
		Self::String(v.to_string())
	}
}

impl From<Vec<ConfigValue>> for ConfigValue {
	fn from(v: Vec<ConfigValue>) -> Self {
		Self::List(v)
	}
}

mod sealed {
	pub trait Sealed {}
	impl Sealed for bool {}
	impl Sealed for i64 {}
	impl Sealed for f64 {}
	impl Sealed for String {}
}

/// Types that can be extracted from a [`ConfigValue`].
pub trait FromConfigValue: sealed::Sealed + Sized {
	/// Extracts the value, returning `None` if the variant does not match.
	fn from_config(value: &ConfigValue) -> Option<Self>;
}

impl FromConfigValue for bool {
	fn from_config(value: &ConfigValue) -> Option<Self> {
		value.as_bool()
	}
}

impl FromConfigValue for i64 {
	fn from_config(value: &ConfigValue) -> Option<Self> {
		value.as_int()
	}
}

impl FromConfigValue for f64 {
	fn from_config(value: &ConfigValue) -> Option<Self> {
		value.as_float()
	}
}

impl FromConfigValue for String {
	fn from_config(value: &ConfigValue) -> Option<Self> {
		value.as_str().map(str::to_string)
	}
}
