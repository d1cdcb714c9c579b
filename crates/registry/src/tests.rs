use std::sync::Arc;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use termtools_output::{Level, MemorySink, OutputChannel};

use crate::dispatch::failure_message;
use crate::{
	Blueprint, ConfigValue, DispatchError, Handler, HandlerError, Registry, RegistryError,
};

fn registry() -> (Registry, MemorySink) {
	let sink = MemorySink::new();
	(Registry::new("test", OutputChannel::new(sink.clone())), sink)
}

fn noop() -> Handler {
	Handler::plain(|_| Ok(()))
}

fn blueprint_with(name: &str, items: &[(&str, &str, i32)]) -> Blueprint {
	let mut bp = Blueprint::new(name, "");
	for (key, category, order) in items {
		bp.add_item(*key, format!("{name}:{key}"), "", *category, *order, noop())
			.unwrap();
	}
	bp
}

fn menu_layout(registry: &Registry) -> Vec<(String, Vec<String>)> {
	registry
		.menu()
		.groups()
		.map(|group| {
			(
				group.category.to_string(),
				group.keys().into_iter().map(str::to_string).collect(),
			)
		})
		.collect()
}

#[test]
fn add_item_rejects_duplicate_and_empty_keys() {
	let mut bp = Blueprint::new("alpha", "");
	bp.add_item("1", "One", "", "X", 1, noop()).unwrap();

	assert_eq!(
		bp.add_item("1", "Again", "", "X", 2, noop()).err(),
		Some(RegistryError::DuplicateKey {
			key: "1".into(),
			blueprint: "alpha".into(),
			existing: "alpha".into(),
		})
	);
	assert_eq!(
		bp.add_item("", "Empty", "", "X", 0, noop()).err(),
		Some(RegistryError::EmptyKey("alpha".into()))
	);
	assert_eq!(bp.items().len(), 1);
}

#[test]
fn add_item_chains() {
	let mut bp = Blueprint::new("alpha", "demo");
	bp.add_item("1", "One", "", "X", 1, noop())
		.unwrap()
		.add_item("2", "Two", "", "X", 2, noop())
		.unwrap()
		.on_init(|_| Ok(()))
		.on_cleanup(|_| Ok(()));
	assert_eq!(bp.items().len(), 2);
	assert_eq!(bp.init_hook_count(), 1);
	assert_eq!(bp.cleanup_hook_count(), 1);
	assert_eq!(bp.description(), "demo");
	assert!(bp.items().iter().all(|item| item.blueprint() == "alpha"));
}

#[test]
fn duplicate_blueprint_name_is_rejected() {
	let (mut registry, _) = registry();
	registry.register(blueprint_with("alpha", &[("1", "X", 0)])).unwrap();
	assert_eq!(
		registry.register(blueprint_with("alpha", &[("2", "X", 0)])),
		Err(RegistryError::DuplicateBlueprint("alpha".into()))
	);
	assert!(!registry.contains_key("2"));
}

#[test]
fn key_collision_is_all_or_nothing() {
	let (mut registry, _) = registry();
	registry.register(blueprint_with("alpha", &[("1", "X", 1)])).unwrap();

	let init_ran = Arc::new(Mutex::new(false));
	let flag = Arc::clone(&init_ran);
	let mut beta = blueprint_with("beta", &[("2", "Y", 1), ("1", "Y", 2), ("3", "Y", 3)]);
	beta.on_init(move |_| {
		*flag.lock() = true;
		Ok(())
	});

	assert_eq!(
		registry.register(beta),
		Err(RegistryError::DuplicateKey {
			key: "1".into(),
			blueprint: "beta".into(),
			existing: "alpha".into(),
		})
	);
	assert_eq!(registry.len(), 1);
	assert!(!registry.contains_key("2"));
	assert!(!registry.contains_key("3"));
	assert!(registry.blueprint("beta").is_none());
	assert!(!*init_ran.lock());

	// The name was not consumed by the failed attempt.
	registry.register(blueprint_with("beta", &[("2", "Y", 1)])).unwrap();
	assert_eq!(registry.len(), 2);
}

#[test]
fn init_hooks_run_in_order_with_context() {
	let (mut registry, _) = registry();
	let calls = Arc::new(Mutex::new(Vec::new()));
	let mut bp = blueprint_with("alpha", &[("1", "X", 0)]);
	for n in 0..3 {
		let calls = Arc::clone(&calls);
		bp.on_init(move |ctx| {
			// The blueprint's items are visible to its own init hooks.
			assert!(ctx.contains_key("1"));
			calls.lock().push(n);
			ctx.set_config(format!("hook.{n}"), true);
			Ok(())
		});
	}
	registry.register(bp).unwrap();

	assert_eq!(*calls.lock(), vec![0, 1, 2]);
	assert_eq!(registry.config_as::<bool>("hook.2"), Some(true));
}

#[test]
fn failing_init_hook_is_reported_and_registration_kept() {
	let (mut registry, sink) = registry();
	let mut bp = blueprint_with("alpha", &[("1", "X", 0)]);
	bp.on_init(|_| Err(HandlerError::failed("no config")));
	bp.on_init(|ctx| {
		ctx.set_config("second", true);
		Ok(())
	});
	registry.register(bp).unwrap();

	assert!(registry.contains_key("1"));
	assert_eq!(registry.config_as::<bool>("second"), Some(true));
	let lines = sink.lines();
	assert_eq!(lines.len(), 1);
	assert_eq!(lines[0].level, Level::Error);
	assert_eq!(lines[0].text, "✗ Error in alpha init: failed: no config");
}

#[test]
fn menu_orders_by_order_then_registration() {
	let (mut registry, _) = registry();
	registry
		.register(blueprint_with("alpha", &[("a5", "X", 5), ("a1", "X", 1), ("y1", "Y", 1)]))
		.unwrap();
	registry
		.register(blueprint_with("beta", &[("b1", "X", 1), ("z0", "Z", 0), ("y0", "Y", 0)]))
		.unwrap();

	assert_eq!(
		menu_layout(&registry),
		vec![
			("X".to_string(), vec!["a1".to_string(), "b1".to_string(), "a5".to_string()]),
			("Y".to_string(), vec!["y0".to_string(), "y1".to_string()]),
			("Z".to_string(), vec!["z0".to_string()]),
		]
	);
	let flat: Vec<&str> = registry.menu().items().map(|item| item.key()).collect();
	assert_eq!(flat, vec!["a1", "b1", "a5", "y0", "y1", "z0"]);
	assert_eq!(registry.menu().categories(), vec!["X", "Y", "Z"]);
	assert_eq!(registry.sequence("b1"), Some(3));
}

#[test]
fn execute_invokes_plain_and_context_handlers() {
	let (mut registry, _) = registry();
	let seen = Arc::new(Mutex::new(Vec::<String>::new()));
	let plain_seen = Arc::clone(&seen);
	let mut bp = Blueprint::new("alpha", "");
	bp.add_item(
		"p",
		"Plain",
		"",
		"X",
		0,
		Handler::plain(move |args| {
			plain_seen.lock().extend(args.iter().cloned());
			Ok(())
		}),
	)
	.unwrap();
	bp.add_item(
		"c",
		"Context",
		"",
		"X",
		1,
		Handler::with_context(|ctx, args| {
			ctx.set_config("last_args", args.len() as i64);
			Ok(())
		}),
	)
	.unwrap();
	registry.register(bp).unwrap();

	assert!(!registry.get_item("p").unwrap().wants_context());
	assert!(registry.get_item("c").unwrap().wants_context());

	registry.execute("p", &["a".into(), "b".into()]).unwrap();
	registry.execute("c", &["x".into()]).unwrap();
	assert_eq!(*seen.lock(), vec!["a".to_string(), "b".to_string()]);
	assert_eq!(registry.config_as::<i64>("last_args"), Some(1));
}

#[test]
fn unknown_key_is_reported() {
	let (registry, sink) = registry();
	let err = registry.execute("42", &[]).unwrap_err();
	assert!(matches!(err, DispatchError::UnknownKey(ref key) if key == "42"));
	assert_eq!(sink.texts(), vec!["✗ Menu item '42' not found"]);
}

#[test]
fn handler_errors_and_panics_are_contained() {
	let (mut registry, sink) = registry();
	let mut bp = Blueprint::new("alpha", "");
	bp.add_item("e", "Erroring", "", "X", 0, Handler::plain(|_| Err(HandlerError::failed("disk full"))))
		.unwrap();
	bp.add_item("p", "Panicking", "", "X", 1, Handler::plain(|_| panic!("boom")))
		.unwrap();
	bp.add_item("ok", "Fine", "", "X", 2, noop()).unwrap();
	registry.register(bp).unwrap();

	for _ in 0..3 {
		let err = registry.execute("e", &[]).unwrap_err();
		assert_eq!(err.handler_error().map(HandlerError::kind), Some("failed"));
		let err = registry.execute("p", &[]).unwrap_err();
		match err.handler_error() {
			Some(HandlerError::Panicked(message)) => assert_eq!(message, "boom"),
			other => panic!("unexpected: {other:?}"),
		}
		assert!(registry.execute("ok", &[]).is_ok());
	}

	let texts = sink.texts();
	assert_eq!(texts.len(), 6);
	assert_eq!(texts[0], "✗ Error executing 'Erroring': failed: disk full");
	assert_eq!(texts[1], "✗ Error executing 'Panicking': panic: panicked: boom");
}

#[test]
fn command_failures_include_both_streams() {
	let mut bp = Blueprint::new("git", "");
	bp.add_item("1", "Quick Commit", "", "GIT", 0, noop()).unwrap();
	let error = HandlerError::Command {
		program: "git push".into(),
		exit_code: Some(128),
		stdout: String::new(),
		stderr: "fatal: no upstream\nhint: set one\n".into(),
	};

	assert_eq!(
		failure_message(&bp.items()[0], &error),
		"✗ Error executing 'Quick Commit': command: `git push` exited with exit code 128\n  stdout: (empty)\n  stderr:\n    fatal: no upstream\n    hint: set one"
	);
}

#[test]
fn config_round_trip_and_defaults() {
	let (registry, _) = registry();
	assert_eq!(registry.get_config("flag", false), ConfigValue::Bool(false));
	assert_eq!(registry.config_value("flag"), None);

	registry.set_config("flag", true);
	assert_eq!(registry.get_config("flag", false), ConfigValue::Bool(true));
	registry.set_config("flag", "now a string");
	assert_eq!(registry.config_as::<String>("flag").as_deref(), Some("now a string"));
	assert_eq!(registry.config_as::<bool>("flag"), None);

	assert_eq!(registry.remove_config("flag"), Some(ConfigValue::from("now a string")));
	assert_eq!(registry.get_config("flag", 3i64), ConfigValue::Int(3));
}

#[test]
fn shared_config_values_downcast() {
	struct Service {
		id: u32,
	}
	let (registry, _) = registry();
	registry.set_config("service", ConfigValue::shared(Service { id: 7 }));

	let value = registry.config_value("service").unwrap();
	assert_eq!(value.downcast_shared::<Service>().map(|s| s.id), Some(7));
	assert!(value.downcast_shared::<String>().is_none());
	assert_eq!(value, registry.config_value("service").unwrap());
}

#[test]
fn parse_literal_detects_types() {
	assert_eq!(ConfigValue::parse_literal("true"), ConfigValue::Bool(true));
	assert_eq!(ConfigValue::parse_literal("-12"), ConfigValue::Int(-12));
	assert_eq!(ConfigValue::parse_literal("2.5"), ConfigValue::Float(2.5));
	assert_eq!(ConfigValue::parse_literal("inf"), ConfigValue::from("inf"));
	assert_eq!(ConfigValue::parse_literal("main"), ConfigValue::from("main"));
	assert_eq!(
		ConfigValue::List(vec![1i64.into(), "a".into()]).to_string(),
		"[1, a]"
	);
}

#[test]
fn shutdown_runs_cleanup_in_order_and_survives_failures() {
	let (mut registry, sink) = registry();
	let calls = Arc::new(Mutex::new(Vec::new()));

	for name in ["alpha", "beta"] {
		let mut bp = Blueprint::new(name, "");
		for n in 0..2 {
			let calls = Arc::clone(&calls);
			bp.on_cleanup(move |_| {
				calls.lock().push(format!("{name}.{n}"));
				if name == "alpha" && n == 0 {
					return Err(HandlerError::failed("busy"));
				}
				Ok(())
			});
		}
		registry.register(bp).unwrap();
	}
	let mut gamma = Blueprint::new("gamma", "");
	gamma.on_cleanup(|_| panic!("cleanup exploded"));
	registry.register(gamma).unwrap();

	assert_eq!(registry.shutdown(), 2);
	assert_eq!(
		*calls.lock(),
		vec!["alpha.0", "alpha.1", "beta.0", "beta.1"]
	);
	assert_eq!(
		sink.texts(),
		vec![
			"✗ Error in alpha cleanup: failed: busy",
			"✗ Error in gamma cleanup: panic: panicked: cleanup exploded",
		]
	);

	assert!(registry.is_shut_down());
	assert_eq!(registry.shutdown(), 0);
	assert_eq!(calls.lock().len(), 4);
}

proptest! {
	#[test]
	fn menu_is_deterministic_and_sorted(
		entries in proptest::collection::vec((0u8..4, -3i32..3), 1..24)
	) {
		let (mut registry, _) = registry();
		let mut bp = Blueprint::new("gen", "");
		for (i, (category, order)) in entries.iter().enumerate() {
			bp.add_item(format!("k{i}"), "", "", format!("C{category}"), *order, noop()).unwrap();
		}
		registry.register(bp).unwrap();

		let first = menu_layout(&registry);
		let second = menu_layout(&registry);
		prop_assert_eq!(&first, &second);

		let total: usize = first.iter().map(|(_, keys)| keys.len()).sum();
		prop_assert_eq!(total, entries.len());

		for (_, keys) in &first {
			let ranks: Vec<(i32, usize)> = keys
				.iter()
				.map(|key| {
					let item = registry.get_item(key).unwrap();
					(item.order(), registry.sequence(key).unwrap())
				})
				.collect();
			let mut sorted = ranks.clone();
			sorted.sort();
			prop_assert_eq!(ranks, sorted);
		}
	}

	#[test]
	fn colliding_registration_never_leaks(
		first_keys in proptest::collection::btree_set(0u8..16, 1..8),
		second_keys in proptest::collection::btree_set(0u8..16, 1..8),
	) {
		let (mut registry, _) = registry();
		let mut first = Blueprint::new("first", "");
		for key in &first_keys {
			first.add_item(key.to_string(), "", "", "X", 0, noop()).unwrap();
		}
		let mut second = Blueprint::new("second", "");
		for key in &second_keys {
			second.add_item(key.to_string(), "", "", "X", 0, noop()).unwrap();
		}
		registry.register(first).unwrap();

		let collides = !first_keys.is_disjoint(&second_keys);
		let result = registry.register(second);
		prop_assert_eq!(result.is_err(), collides);

		let expected = if collides {
			first_keys.len()
		} else {
			first_keys.len() + second_keys.len()
		};
		prop_assert_eq!(registry.len(), expected);
		if collides {
			prop_assert!(registry.menu().items().all(|item| item.blueprint() == "first"));
		}
	}
}
