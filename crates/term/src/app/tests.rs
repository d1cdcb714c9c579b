use std::io::{self, Cursor, Write};
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use termtools_output::{Level, MemorySink};
use termtools_registry::{Blueprint, Handler};

use super::*;

fn app(settings: Vec<(String, ConfigValue)>) -> (Registry, MemorySink) {
	let sink = MemorySink::new();
	let registry = create_app(OutputChannel::new(sink.clone()), settings).unwrap();
	(registry, sink)
}

#[test]
fn create_app_seeds_config_and_builtins() {
	let (registry, sink) = app(vec![
		("debug".to_string(), ConfigValue::Bool(true)),
		("timer.interval".to_string(), ConfigValue::from("5s")),
	]);

	assert_eq!(registry.config_as::<bool>("debug"), Some(true));
	assert_eq!(registry.config_as::<String>("app.name").as_deref(), Some(APP_NAME));
	assert_eq!(
		registry.config_as::<String>("version").as_deref(),
		Some(env!("CARGO_PKG_VERSION"))
	);
	assert_eq!(registry.config_as::<bool>("session_enabled"), Some(true));
	assert_eq!(registry.config_as::<bool>("timer_enabled"), Some(true));
	assert_eq!(registry.menu().categories(), vec!["SESSION", "TIMER"]);
	assert!(sink.is_empty());
	assert_eq!(registry.shutdown(), 0);
}

#[test]
fn shadowed_keys_are_reported() {
	let sink = MemorySink::new();
	let mut registry = Registry::new("test", OutputChannel::new(sink.clone()));
	let mut plugin = Blueprint::new("plugin", "");
	plugin
		.add_item("h", "Hidden", "", "PLUGIN", 0, Handler::plain(|_| Ok(())))
		.unwrap()
		.add_item("x", "Visible", "", "PLUGIN", 1, Handler::plain(|_| Ok(())))
		.unwrap();
	registry.register(plugin).unwrap();

	assert_eq!(report_shadowed_keys(&registry), 1);
	let lines = sink.lines();
	assert_eq!(lines.len(), 1);
	assert_eq!(lines[0].level, Level::Warn);
	assert_eq!(
		lines[0].text,
		"⚠ Menu item 'h' from 'plugin' is unreachable: the key is reserved"
	);
}

#[test]
fn handle_line_routes_reserved_and_registered_keys() {
	let (registry, sink) = app(Vec::new());
	let session = Session::new(&registry, Painter::new(false));

	assert_eq!(session.handle_line("q"), Flow::Exit);
	assert_eq!(session.handle_line("  d  "), Flow::Continue);
	assert_eq!(session.handle_line("zz 1 2"), Flow::Continue);
	assert_eq!(session.handle_line("h"), Flow::Continue);

	let texts = sink.texts();
	assert_eq!(texts[0], "✓ Debug mode enabled");
	assert_eq!(texts[1], "✗ Menu item 'zz' not found");
	assert!(texts[2].contains("├── SESSION:"));
	assert_eq!(registry.config_as::<bool>("debug"), Some(true));
}

#[test]
fn blank_line_redraws_menu() {
	let (registry, sink) = app(Vec::new());
	let session = Session::new(&registry, Painter::new(false));
	assert_eq!(session.handle_line(""), Flow::Continue);
	assert!(sink.texts()[0].contains("[q]  Exit"));
}

#[test]
fn run_stops_at_exit_key_and_shuts_down() {
	let (registry, sink) = app(Vec::new());
	let input = Cursor::new("d\nzz\nq\nd\n");

	run(&registry, Painter::new(false), input, crossbeam_channel::never(), false).unwrap();

	assert!(registry.is_shut_down());
	assert_eq!(registry.config_as::<bool>("debug"), Some(true));
	let texts = sink.texts();
	assert!(texts[0].contains("SESSION:"));
	assert_eq!(
		texts[1..].to_vec(),
		vec![
			"✓ Debug mode enabled",
			"✗ Menu item 'zz' not found",
			"👋 Thank you for using TermTools!",
		]
	);
}

#[test]
fn run_ends_on_end_of_input_and_stops_timer() {
	let (registry, sink) = app(vec![("timer.interval".to_string(), ConfigValue::from("10m"))]);
	let input = Cursor::new("t 1h\n");

	run(&registry, Painter::new(false), input, crossbeam_channel::never(), false).unwrap();

	assert!(registry.is_shut_down());
	let texts = sink.texts();
	assert_eq!(
		texts[1..].to_vec(),
		vec![
			"⏱ Timer started for 1h 00m",
			"👋 Thank you for using TermTools!",
			"⏹ Timer cancelled",
		]
	);
}

#[test]
fn run_shuts_down_on_stop_request_while_input_is_open() {
	let (registry, sink) = app(vec![("timer.interval".to_string(), ConfigValue::from("10m"))]);
	let (reader, mut writer) = io::pipe().unwrap();
	writer.write_all(b"t 1h\n").unwrap();

	let (stop_tx, stop_rx) = crossbeam_channel::bounded(1);
	let watcher = sink.clone();
	let interrupter = std::thread::spawn(move || {
		let deadline = Instant::now() + Duration::from_secs(5);
		while !watcher.texts().iter().any(|text| text.starts_with("⏱ Timer started")) && Instant::now() < deadline {
			std::thread::sleep(Duration::from_millis(5));
		}
		stop_tx.send(signal_hook::consts::SIGINT).unwrap();
	});

	run(&registry, Painter::new(false), io::BufReader::new(reader), stop_rx, false).unwrap();
	interrupter.join().unwrap();
	drop(writer);

	assert!(registry.is_shut_down());
	let texts = sink.texts();
	assert_eq!(
		texts[1..].to_vec(),
		vec![
			"⏱ Timer started for 1h 00m",
			"👋 Thank you for using TermTools!",
			"⏹ Timer cancelled",
		]
	);
}
