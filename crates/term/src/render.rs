//! Text layout of the main menu and the help tree.
//!
//! Both are built from [`Registry::menu`] on every call, so features
//! registered later show up without extra bookkeeping.

use std::fmt::Write as _;

use crossterm::style::Stylize;
use termtools_registry::{MenuItem, Registry};

/// Key that shows the help tree.
pub const HELP_KEY: &str = "0";
/// Alternate help key.
pub const HELP_ALIAS: &str = "h";
/// Key that leaves the loop.
pub const EXIT_KEY: &str = "q";

/// Keys the front end answers itself; registered items using them are unreachable.
pub const RESERVED_KEYS: [&str; 3] = [HELP_KEY, HELP_ALIAS, EXIT_KEY];

const RULE_WIDTH: usize = 60;

/// Applies the menu color scheme, or nothing when colors are off.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
	color: bool,
}

impl Painter {
	/// Creates a painter.
	pub const fn new(color: bool) -> Self {
		Self { color }
	}

	/// Returns true when styling is applied.
	pub const fn color(self) -> bool {
		self.color
	}

	fn header(self, text: &str) -> String {
		self.paint(text, |t| t.bold().cyan().to_string())
	}

	fn category(self, text: &str) -> String {
		self.paint(text, |t| t.bold().blue().to_string())
	}

	fn key(self, key: &str) -> String {
		self.paint(&format!("[{key}]"), |t| t.bold().yellow().to_string())
	}

	fn title(self, text: &str) -> String {
		self.paint(text, |t| t.green().to_string())
	}

	fn dim(self, text: &str) -> String {
		self.paint(text, |t| t.dark_grey().to_string())
	}

	fn paint(self, text: &str, style: impl FnOnce(&str) -> String) -> String {
		if self.color { style(text) } else { text.to_string() }
	}
}

/// Application name and version as stored in the registry config.
fn banner(registry: &Registry) -> String {
	let name = registry
		.config_as::<String>("app.name")
		.unwrap_or_else(|| registry.name().to_string());
	match registry.config_as::<String>("version") {
		Some(version) => format!("{} v{version}", name.to_uppercase()),
		None => name.to_uppercase(),
	}
}

/// The main menu: banner, help entry, each category, exit entry.
pub fn menu(registry: &Registry, painter: Painter) -> String {
	let rule = "=".repeat(RULE_WIDTH);
	let mut out = String::new();
	let _ = writeln!(out, "{rule}");
	let _ = writeln!(out, "  {}", painter.header(&banner(registry)));
	let _ = writeln!(out, "{rule}");
	if let Ok(cwd) = std::env::current_dir() {
		let _ = writeln!(out, "Current directory: {}", painter.dim(&cwd.display().to_string()));
	}

	let _ = writeln!(out, "\n{}", painter.category("HELP:"));
	let _ = writeln!(out, "{}  {}", painter.key(HELP_KEY), painter.title("Show help and menu tree diagram"));

	for group in registry.menu().groups() {
		let _ = writeln!(out, "\n{}", painter.category(&format!("{}:", group.category)));
		for item in &group.items {
			let _ = write!(out, "{}  {}", painter.key(item.key()), painter.title(item.title()));
			if !item.description().is_empty() {
				let _ = write!(out, "  {}", painter.dim(&format!("({})", item.description())));
			}
			out.push('\n');
		}
	}

	let _ = writeln!(out, "\n{}", painter.category("EXIT:"));
	let _ = writeln!(out, "{}  {}", painter.key(EXIT_KEY), painter.title("Exit"));
	out.push_str(&"-".repeat(RULE_WIDTH));
	out
}

/// The help screen: the whole menu drawn as a tree.
pub fn help_tree(registry: &Registry, painter: Painter) -> String {
	let mut out = String::new();
	let _ = writeln!(out, "{}", painter.header(&format!("{} - HELP", banner(registry))));
	let _ = writeln!(out, "\nMain menu tree:");
	let _ = writeln!(out, "├── {}", painter.category("HELP:"));
	let _ = writeln!(
		out,
		"│   └── {} {}",
		painter.key(HELP_KEY),
		painter.title(&format!("Show help and menu tree diagram (also '{HELP_ALIAS}')"))
	);
	out.push_str("│\n");

	for group in registry.menu().groups() {
		let _ = writeln!(out, "├── {}", painter.category(&format!("{}:", group.category)));
		let last = group.items.len().saturating_sub(1);
		for (i, item) in group.items.iter().enumerate() {
			tree_item(&mut out, painter, item, i == last);
		}
		out.push_str("│\n");
	}

	let _ = writeln!(out, "└── {}", painter.category("EXIT:"));
	let _ = writeln!(out, "    └── {} {}", painter.key(EXIT_KEY), painter.title("Exit"));
	out.push_str("\nLegend:\n");
	out.push_str("├── branch with more entries below\n");
	out.push_str("└── last entry in a branch\n");
	out.push_str("│   vertical connection");
	out
}

fn tree_item(out: &mut String, painter: Painter, item: &MenuItem, last: bool) {
	let (branch, stem) = if last { ("└──", "    ") } else { ("├──", "│   ") };
	let _ = writeln!(out, "│   {branch} {} {}", painter.key(item.key()), painter.title(item.title()));
	if !item.description().is_empty() {
		let _ = writeln!(out, "│   {stem}└── {}", painter.dim(&format!("({})", item.description())));
	}
}
