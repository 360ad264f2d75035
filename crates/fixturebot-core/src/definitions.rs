//! Free-function API over the process-wide registries.
//!
//! These functions operate on [`DefinitionRegistry::global`] and
//! [`HookRegistry::global`]. The rule constructors ([`relation`],
//! [`sequence`] and friends) are registry-agnostic: they resolve against
//! whatever registry the compile call runs on.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::FixtureResult;
use crate::factory::Factory;
use crate::fixture::{Fixture, FixtureObject};
use crate::hooks::{Hook, HookRegistry};
use crate::registry::{DefineOptions, DefinitionRegistry};
use crate::rule::{BuildContext, Properties, Rule};
use crate::settings::FixtureSettings;
use crate::strategy::Strategy;
use crate::value::Value;

/// Defines a factory for `M` under `name` in the global registry.
pub fn define<M: Fixture>(
	name: &str,
	properties: Properties<M>,
	options: DefineOptions,
) -> FixtureResult<Arc<Factory<M>>> {
	DefinitionRegistry::global().define(name, properties, options)
}

/// Derives the definition `name` from `parent` in the global registry.
pub fn extend<M: Fixture>(
	name: &str,
	parent: &str,
	properties: Properties<M>,
	options: DefineOptions,
) -> FixtureResult<Arc<Factory<M>>> {
	DefinitionRegistry::global().extend(name, parent, properties, options)
}

/// Builds an instance of the global definition `name` without persisting it.
pub fn build<M: Fixture>(name: &str, overrides: Properties<M>) -> FixtureResult<M> {
	DefinitionRegistry::global().build(name, overrides)
}

/// Builds and persists an instance of the global definition `name`.
pub fn create<M: Fixture>(name: &str, overrides: Properties<M>) -> FixtureResult<M> {
	DefinitionRegistry::global().create(name, overrides)
}

/// Runs the global definition `name` with any registered strategy.
pub fn run<M: Fixture>(name: &str, strategy: &str, overrides: Properties<M>) -> FixtureResult<Value> {
	DefinitionRegistry::global().run(name, strategy, overrides)
}

/// Runs the global definition `name` with overrides given as a JSON object.
pub fn run_json(name: &str, strategy: &str, overrides: serde_json::Value) -> FixtureResult<Value> {
	DefinitionRegistry::global().run_json(name, strategy, overrides)
}

/// Registers a strategy in the global registry.
pub fn register_strategy(name: impl Into<String>, strategy: Arc<dyn Strategy>) {
	DefinitionRegistry::global().register_strategy(name, strategy);
}

/// Replaces the settings of the global registry.
pub fn configure(settings: FixtureSettings) {
	DefinitionRegistry::global().configure(settings);
}

/// Drops every global definition and custom strategy.
pub fn purge() {
	DefinitionRegistry::global().purge();
}

/// Relation to the definition `name`, built with the strategy of the
/// enclosing compile call.
///
/// Each compile call produces a fresh related instance.
pub fn relation<M: Fixture>(name: impl Into<String>) -> Rule<M> {
	let name = name.into();
	Rule::generator(move |_, ctx| {
		let registry = ctx.registry();
		registry
			.find_any_factory(&name)?
			.run_with_values(registry, ctx.strategy(), IndexMap::new())
	})
}

/// Relation to the definition `name` of model `R`, with overrides.
pub fn relation_with<M: Fixture, R: Fixture>(
	name: impl Into<String>,
	overrides: Properties<R>,
) -> Rule<M> {
	let name = name.into();
	Rule::generator(move |_, ctx| {
		let registry = ctx.registry();
		registry
			.find_factory::<R>(&name)?
			.run(registry, ctx.strategy(), overrides.clone())
	})
}

/// `amount` independent relations to the definition `name`, as a list.
pub fn relations<M: Fixture>(name: impl Into<String>, amount: usize) -> Rule<M> {
	let name = name.into();
	Rule::List((0..amount).map(|_| relation(name.clone())).collect())
}

/// `amount` independent relations to the definition `name` of model `R`, with overrides.
pub fn relations_with<M: Fixture, R: Fixture>(
	name: impl Into<String>,
	amount: usize,
	overrides: Properties<R>,
) -> Rule<M> {
	let name = name.into();
	Rule::List(
		(0..amount)
			.map(|_| relation_with::<M, R>(name.clone(), overrides.clone()))
			.collect(),
	)
}

/// The compiling factory's next sequence value.
pub fn sequence<M: Fixture>() -> Rule<M> {
	Rule::generator(|_, ctx| Ok(Value::from(ctx.next_sequence_value())))
}

/// Passes the compiling factory's next sequence value, the instance hydrated
/// so far and the build context to `generate`.
pub fn sequence_with<M, F, R>(generate: F) -> Rule<M>
where
	M: Fixture,
	F: Fn(u64, &M, &BuildContext<'_>) -> R + Send + Sync + 'static,
	R: Into<Value>,
{
	Rule::generator(move |instance, ctx| Ok(generate(ctx.next_sequence_value(), instance, ctx).into()))
}

/// Creates a local hook. See [`Hook::new`].
pub fn hook<F>(stage: &str, callback: F) -> FixtureResult<Hook>
where
	F: Fn(Option<&dyn FixtureObject>) -> FixtureResult<()> + Send + Sync + 'static,
{
	Hook::new(stage, callback)
}

/// Creates a hook and registers it globally. Keep the returned hook to remove it later.
pub fn register_global_hook<F>(stage: &str, callback: F) -> FixtureResult<Hook>
where
	F: Fn(Option<&dyn FixtureObject>) -> FixtureResult<()> + Send + Sync + 'static,
{
	let hook = Hook::new(stage, callback)?;
	HookRegistry::global().register(hook.clone());
	Ok(hook)
}

/// Removes a global hook. Returns false if it was not registered.
pub fn remove_global_hook(hook: &Hook) -> bool {
	HookRegistry::global().remove(hook)
}

/// Removes every global hook.
pub fn purge_hooks() {
	HookRegistry::global().purge();
}
