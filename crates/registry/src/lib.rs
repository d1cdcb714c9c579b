//! Registration and dispatch core.
//!
//! Feature modules describe their actions as [`Blueprint`]s. Each blueprint is
//! registered into the process-wide [`Registry`], which doubles as the
//! application context handed to handlers and lifecycle hooks.
//!
//! # Flow
//!
//! 1. A feature builds a [`Blueprint`] with [`Blueprint::add_item`],
//!    [`Blueprint::on_init`] and [`Blueprint::on_cleanup`].
//! 2. [`Registry::register`] checks name and key uniqueness, inserts every item
//!    (all or nothing), then runs the blueprint's init hooks.
//! 3. The presentation layer renders [`Registry::menu`] and calls
//!    [`Registry::execute`] with the selected key.
//! 4. [`Registry::shutdown`] runs every cleanup hook once.
//!
//! # Invariants
//!
//! - Every key in the menu index belongs to exactly one registered blueprint.
//! - The grouped menu is always derived from the index at query time: groups in
//!   first-seen category order, items by `order` then registration sequence.
//! - Handler failures, including panics, stop at [`Registry::execute`]; they are
//!   reported on the [`OutputChannel`](termtools_output::OutputChannel) and
//!   returned as a [`DispatchError`].

mod blueprint;
mod config;
mod dispatch;
mod error;
mod item;
mod menu;
mod registry;

pub use blueprint::{Blueprint, Hook};
pub use config::{ConfigValue, FromConfigValue};
pub use error::{DispatchError, HandlerError, HandlerResult, HookResult, RegistryError};
pub use item::{Handler, MenuItem};
pub use menu::{Menu, MenuGroup};
pub use registry::Registry;

#[cfg(test)]
mod tests;
