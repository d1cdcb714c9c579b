//! Startup configuration: TOML file values and `--set` overrides.
//!
//! Both sources produce `(dotted.key, value)` pairs that seed the registry's
//! in-memory store. Nothing is ever written back to disk.

use std::path::{Path, PathBuf};

use termtools_registry::ConfigValue;
use thiserror::Error;

/// Errors loading the startup configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading the file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},
	/// The file is not valid TOML.
	#[error("invalid TOML in {path}: {error}")]
	Parse {
		/// Path to the offending file.
		path: PathBuf,
		/// Parser diagnostic.
		error: Box<toml::de::Error>,
	},
}

/// Reads `path` and flattens it into dotted keys.
pub fn load_file(path: &Path) -> Result<Vec<(String, ConfigValue)>, ConfigError> {
	let source = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
		path: path.to_path_buf(),
		error,
	})?;
	let entries = parse_str(&source).map_err(|error| ConfigError::Parse {
		path: path.to_path_buf(),
		error: Box::new(error),
	})?;
	tracing::debug!(path = %path.display(), entries = entries.len(), "config.loaded");
	Ok(entries)
}

/// Parses a TOML document into `(dotted.key, value)` pairs in key order.
///
/// Nested tables become key prefixes (`[git] remote = "x"` yields
/// `git.remote`); arrays become lists, dates become strings.
pub fn parse_str(source: &str) -> Result<Vec<(String, ConfigValue)>, toml::de::Error> {
	let table: toml::Table = toml::from_str(source)?;
	let mut entries = Vec::new();
	flatten("", &table, &mut entries);
	Ok(entries)
}

/// Converts `--set` pairs into typed values.
pub fn overrides(pairs: &[(String, String)]) -> Vec<(String, ConfigValue)> {
	pairs
		.iter()
		.map(|(key, raw)| (key.clone(), ConfigValue::parse_literal(raw)))
		.collect()
}

fn flatten(prefix: &str, table: &toml::Table, out: &mut Vec<(String, ConfigValue)>) {
	for (key, value) in table {
		let key = if prefix.is_empty() {
			key.clone()
		} else {
			format!("{prefix}.{key}")
		};
		match value {
			toml::Value::Table(nested) => flatten(&key, nested, out),
			other => out.push((key, convert(other))),
		}
	}
}

fn convert(value: &toml::Value) -> ConfigValue {
	match value {
		toml::Value::String(s) => ConfigValue::String(s.clone()),
		toml::Value::Integer(i) => ConfigValue::Int(*i),
		toml::Value::Float(f) => ConfigValue::Float(*f),
		toml::Value::Boolean(b) => ConfigValue::Bool(*b),
		toml::Value::Datetime(dt) => ConfigValue::String(dt.to_string()),
		toml::Value::Array(items) => ConfigValue::List(items.iter().map(convert).collect()),
		// Tables inside arrays have no dotted form; keep their TOML text.
		toml::Value::Table(table) => ConfigValue::String(table.to_string()),
	}
}
