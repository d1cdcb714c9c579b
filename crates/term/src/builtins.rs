//! Features that ship with the binary.

pub mod session;
pub mod timer;

use termtools_registry::{Blueprint, RegistryError};

/// Built-in blueprints in registration order.
pub fn blueprints() -> Result<Vec<Blueprint>, RegistryError> {
	Ok(vec![session::blueprint()?, timer::blueprint()?])
}
