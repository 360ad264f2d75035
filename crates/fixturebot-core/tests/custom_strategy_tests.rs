//! Custom strategies registered by name.

mod common;

use std::sync::Arc;

use common::{Account, User, reset};
use fixturebot_core::FixtureObject;
use fixturebot_core::prelude::*;
use parking_lot::Mutex;
use rstest::rstest;
use serial_test::serial;

/// Serializes the hydrated instance to a JSON string, without persisting it.
#[derive(Debug)]
struct JsonStrategy;

impl Strategy for JsonStrategy {
	fn before_compile(&self, factory: &dyn LifecycleNotifier) -> FixtureResult<()> {
		factory.notify(Stage::Before, None)
	}

	fn result(
		&self,
		factory: &dyn LifecycleNotifier,
		instance: Box<dyn FixtureObject>,
	) -> FixtureResult<Value> {
		factory.notify(Stage::After, Some(&*instance))?;
		let properties = Value::from(instance.properties());
		Ok(Value::from(serde_json::to_string(&properties.to_json())?))
	}
}

#[rstest]
#[serial(fixturebot)]
fn test_custom_strategy_shapes_output() {
	// Arrange
	reset();
	register_strategy("json", Arc::new(JsonStrategy));
	define::<User>(
		"User",
		Properties::new()
			.set("id", sequence())
			.set("first_name", "Jane"),
		DefineOptions::new(),
	)
	.unwrap();

	// Act
	let output = run("User", "json", Properties::<User>::new()).unwrap();

	// Assert
	let json: serde_json::Value = serde_json::from_str(output.as_str().unwrap()).unwrap();
	assert_eq!(json["id"], 1);
	assert_eq!(json["first_name"], "Jane");
	assert_eq!(json["cars"], serde_json::json!([]));
	assert!(json["account"].is_null());
}

#[rstest]
#[serial(fixturebot)]
fn test_custom_strategy_fires_its_own_stages() {
	// Arrange
	reset();
	register_strategy("json", Arc::new(JsonStrategy));
	let log = Arc::new(Mutex::new(Vec::new()));
	let mut options = DefineOptions::new();
	for stage in Stage::ALL {
		let log = log.clone();
		options = options.hook(Hook::on(stage, move |_| {
			log.lock().push(stage);
			Ok(())
		}));
	}
	define::<User>("User", Properties::new(), options).unwrap();

	// Act
	run("User", "json", Properties::<User>::new()).unwrap();

	// Assert
	assert_eq!(*log.lock(), vec![Stage::Before, Stage::After]);
}

#[rstest]
#[serial(fixturebot)]
fn test_custom_strategy_sees_generator_name() {
	// Arrange
	reset();
	register_strategy("json", Arc::new(JsonStrategy));
	define::<User>(
		"User",
		Properties::new().set(
			"role",
			Rule::generator(|_: &User, ctx| Ok(Value::from(ctx.strategy()))),
		),
		DefineOptions::new(),
	)
	.unwrap();

	// Act
	let output = run("User", "json", Properties::<User>::new()).unwrap();

	// Assert
	let json: serde_json::Value = serde_json::from_str(output.as_str().unwrap()).unwrap();
	assert_eq!(json["role"], "json");
}

#[rstest]
#[serial(fixturebot)]
fn test_purge_forgets_custom_strategies() {
	// Arrange
	reset();
	register_strategy("json", Arc::new(JsonStrategy));
	define::<User>("User", Properties::new(), DefineOptions::new()).unwrap();

	// Act
	purge();
	define::<User>("User", Properties::new(), DefineOptions::new()).unwrap();
	let error = run("User", "json", Properties::<User>::new()).unwrap_err();

	// Assert
	assert!(error.is_lookup_error());
	assert_eq!(error.to_string(), "Strategy `json` not defined!");
	assert!(build::<User>("User", Properties::new()).is_ok());
}

#[rstest]
fn test_isolated_registry_keeps_strategies_apart() {
	// Arrange
	let registry = DefinitionRegistry::new();
	registry.register_strategy("json", Arc::new(JsonStrategy));
	registry
		.define::<Account>("Account", Properties::new().set("name", "main"), DefineOptions::new())
		.unwrap();

	// Act
	let output = registry
		.run::<Account>("Account", "json", Properties::new())
		.unwrap();

	// Assert
	assert_eq!(output.as_str(), Some(r#"{"name":"main"}"#));
}
