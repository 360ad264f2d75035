//! Definition registry.
//!
//! Maps definition names to factories and strategy names to strategies.
//! Factories of different models live in one table behind the type-erased
//! [`AnyFactory`] trait and are downcast on typed lookup.
//!
//! A process-wide registry backs the free functions of the crate root; tests
//! and embedders can create isolated registries with [`DefinitionRegistry::new`].

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::error::{FixtureError, FixtureResult};
use crate::factory::Factory;
use crate::fixture::Fixture;
use crate::hooks::{Hook, HookRegistry};
use crate::rule::Properties;
use crate::settings::FixtureSettings;
use crate::strategy::{BuildStrategy, CreateStrategy, Strategy};
use crate::value::Value;

/// Type-erased factory.
pub trait AnyFactory: Send + Sync + fmt::Debug {
	/// Identifier of the built model.
	fn model_id(&self) -> &'static str;

	/// Runs a compile call with already resolved override values.
	fn run_with_values(
		&self,
		registry: &DefinitionRegistry,
		strategy: &str,
		overrides: IndexMap<String, Value>,
	) -> FixtureResult<Value>;

	/// Runs a compile call with overrides given as a JSON object.
	///
	/// A non-object `overrides` is a configuration error.
	fn run_json(
		&self,
		registry: &DefinitionRegistry,
		strategy: &str,
		overrides: serde_json::Value,
	) -> FixtureResult<Value>;

	/// Mutable properties without a default rule.
	fn unset_properties(&self) -> Vec<&'static str>;

	/// Advances the factory's sequence.
	fn next_sequence_value(&self) -> u64;

	/// Converts into [`Any`] for downcasting to the concrete factory.
	fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<M: Fixture> AnyFactory for Factory<M> {
	fn model_id(&self) -> &'static str {
		M::model_id()
	}

	fn run_with_values(
		&self,
		registry: &DefinitionRegistry,
		strategy: &str,
		overrides: IndexMap<String, Value>,
	) -> FixtureResult<Value> {
		self.run(registry, strategy, Properties::from_values(overrides))
	}

	fn run_json(
		&self,
		registry: &DefinitionRegistry,
		strategy: &str,
		overrides: serde_json::Value,
	) -> FixtureResult<Value> {
		self.run(registry, strategy, Properties::from_json(overrides)?)
	}

	fn unset_properties(&self) -> Vec<&'static str> {
		Factory::unset_properties(self)
	}

	fn next_sequence_value(&self) -> u64 {
		Factory::next_sequence_value(self)
	}

	fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
		self
	}
}

/// Options of [`DefinitionRegistry::define`] and [`DefinitionRegistry::extend`].
#[derive(Debug, Clone, Default)]
pub struct DefineOptions {
	/// Additional names the factory is registered under.
	pub aliases: Vec<String>,
	/// Hooks local to the factory.
	pub hooks: Vec<Hook>,
}

impl DefineOptions {
	/// Creates empty options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an alias.
	pub fn alias(mut self, alias: impl Into<String>) -> Self {
		self.aliases.push(alias.into());
		self
	}

	/// Adds a local hook.
	pub fn hook(mut self, hook: Hook) -> Self {
		self.hooks.push(hook);
		self
	}
}

static GLOBAL_REGISTRY: Lazy<DefinitionRegistry> =
	Lazy::new(|| DefinitionRegistry::with_hook_registry(HookRegistry::global()));

/// Name -> factory and name -> strategy tables.
pub struct DefinitionRegistry {
	factories: RwLock<HashMap<String, Arc<dyn AnyFactory>>>,
	strategies: RwLock<HashMap<String, Arc<dyn Strategy>>>,
	hooks: Arc<HookRegistry>,
	settings: RwLock<FixtureSettings>,
}

impl DefinitionRegistry {
	/// Creates an isolated registry with its own global hooks.
	pub fn new() -> Self {
		Self::with_hook_registry(Arc::new(HookRegistry::new()))
	}

	/// Creates a registry whose factories fire global hooks from `hooks`.
	pub fn with_hook_registry(hooks: Arc<HookRegistry>) -> Self {
		Self {
			factories: RwLock::new(HashMap::new()),
			strategies: RwLock::new(builtin_strategies()),
			hooks,
			settings: RwLock::new(FixtureSettings::default()),
		}
	}

	/// Returns the process-wide registry.
	pub fn global() -> &'static DefinitionRegistry {
		&GLOBAL_REGISTRY
	}

	/// Global hooks of factories defined through this registry.
	pub fn hooks(&self) -> &Arc<HookRegistry> {
		&self.hooks
	}

	/// Replaces the settings.
	pub fn configure(&self, settings: FixtureSettings) {
		*self.settings.write() = settings;
	}

	/// Current settings.
	pub fn settings(&self) -> FixtureSettings {
		self.settings.read().clone()
	}

	/// Registers `factory` under `name`, replacing any previous definition.
	pub fn register_factory(&self, name: impl Into<String>, factory: Arc<dyn AnyFactory>) {
		let name = name.into();
		tracing::debug!(name = %name, model = factory.model_id(), "registering factory");
		self.factories.write().insert(name, factory);
	}

	/// Looks up a factory without knowing its model.
	///
	/// # Errors
	///
	/// Returns [`FixtureError::FactoryNotFound`] if `name` is not defined.
	pub fn find_any_factory(&self, name: &str) -> FixtureResult<Arc<dyn AnyFactory>> {
		self.factories
			.read()
			.get(name)
			.cloned()
			.ok_or_else(|| FixtureError::FactoryNotFound(name.to_string()))
	}

	/// Looks up the factory registered as `name`, which must build `M`.
	///
	/// # Errors
	///
	/// Returns [`FixtureError::FactoryNotFound`] if `name` is not defined and
	/// [`FixtureError::ModelMismatch`] if it builds another model.
	pub fn find_factory<M: Fixture>(&self, name: &str) -> FixtureResult<Arc<Factory<M>>> {
		let factory = self.find_any_factory(name)?;
		let actual = factory.model_id();
		factory
			.as_any_arc()
			.downcast::<Factory<M>>()
			.map_err(|_| FixtureError::ModelMismatch {
				name: name.to_string(),
				expected: M::model_id(),
				actual,
			})
	}

	/// Returns true if `name` is defined.
	pub fn has_factory(&self, name: &str) -> bool {
		self.factories.read().contains_key(name)
	}

	/// Names of all definitions, sorted.
	pub fn factory_names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
		names.sort();
		names
	}

	/// Registers `strategy` under `name`, replacing any previous strategy.
	pub fn register_strategy(&self, name: impl Into<String>, strategy: Arc<dyn Strategy>) {
		let name = name.into();
		tracing::debug!(name = %name, "registering strategy");
		self.strategies.write().insert(name, strategy);
	}

	/// Looks up a strategy.
	///
	/// # Errors
	///
	/// Returns [`FixtureError::StrategyNotFound`] if `name` is not registered.
	pub fn find_strategy(&self, name: &str) -> FixtureResult<Arc<dyn Strategy>> {
		self.strategies
			.read()
			.get(name)
			.cloned()
			.ok_or_else(|| FixtureError::StrategyNotFound(name.to_string()))
	}

	/// Drops every definition and custom strategy. `build` and `create` stay available.
	///
	/// Global hooks are not touched; see [`HookRegistry::purge`].
	pub fn purge(&self) {
		self.factories.write().clear();
		*self.strategies.write() = builtin_strategies();
	}

	/// Defines a factory for `M` and registers it under `name` and every alias.
	///
	/// Aliases share the factory, and so its sequence.
	///
	/// # Errors
	///
	/// Returns a configuration error if `properties` names a property without a mutator.
	pub fn define<M: Fixture>(
		&self,
		name: &str,
		properties: Properties<M>,
		options: DefineOptions,
	) -> FixtureResult<Arc<Factory<M>>> {
		let factory = Factory::with_hook_registry(properties, options.hooks, Arc::clone(&self.hooks))?;
		Ok(self.register_definition(name, &options.aliases, factory))
	}

	/// Derives a definition from `parent` and registers it under `name` and every alias.
	///
	/// # Errors
	///
	/// Fails if `parent` is not a definition of `M`, or with a configuration
	/// error if `properties` names a property without a mutator.
	pub fn extend<M: Fixture>(
		&self,
		name: &str,
		parent: &str,
		properties: Properties<M>,
		options: DefineOptions,
	) -> FixtureResult<Arc<Factory<M>>> {
		let parent = self.find_factory::<M>(parent)?;
		let factory = parent.extend(properties, options.hooks)?;
		Ok(self.register_definition(name, &options.aliases, factory))
	}

	/// Runs a compile call for the definition `name` with the strategy `strategy`.
	pub fn run<M: Fixture>(
		&self,
		name: &str,
		strategy: &str,
		overrides: Properties<M>,
	) -> FixtureResult<Value> {
		self.find_factory::<M>(name)?.run(self, strategy, overrides)
	}

	/// Runs a compile call with overrides given as a JSON object.
	pub fn run_json(
		&self,
		name: &str,
		strategy: &str,
		overrides: serde_json::Value,
	) -> FixtureResult<Value> {
		self.find_any_factory(name)?.run_json(self, strategy, overrides)
	}

	/// Runs a compile call with overrides given as JSON text.
	///
	/// # Errors
	///
	/// Returns [`FixtureError::Json`] if `source` is not valid JSON, and
	/// otherwise fails like [`run_json`](Self::run_json).
	pub fn run_json_str(&self, name: &str, strategy: &str, source: &str) -> FixtureResult<Value> {
		let overrides: serde_json::Value = serde_json::from_str(source)?;
		self.run_json(name, strategy, overrides)
	}

	/// Builds an instance of the definition `name` without persisting it.
	pub fn build<M: Fixture>(&self, name: &str, overrides: Properties<M>) -> FixtureResult<M> {
		self.run::<M>(name, BuildStrategy::NAME, overrides)?
			.into_instance()
	}

	/// Builds and persists an instance of the definition `name`.
	pub fn create<M: Fixture>(&self, name: &str, overrides: Properties<M>) -> FixtureResult<M> {
		self.run::<M>(name, CreateStrategy::NAME, overrides)?
			.into_instance()
	}

	fn register_definition<M: Fixture>(
		&self,
		name: &str,
		aliases: &[String],
		factory: Factory<M>,
	) -> Arc<Factory<M>> {
		if self.settings.read().warn_unset_properties {
			for property in factory.unset_properties() {
				tracing::warn!(
					definition = name,
					model = M::model_id(),
					property,
					"no default rule for property"
				);
			}
		}

		let factory = Arc::new(factory);
		for alias in aliases {
			self.register_factory(alias.as_str(), factory.clone());
		}
		self.register_factory(name, factory.clone());
		factory
	}
}

impl Default for DefinitionRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for DefinitionRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut strategies: Vec<String> = self.strategies.read().keys().cloned().collect();
		strategies.sort();
		f.debug_struct("DefinitionRegistry")
			.field("factories", &self.factory_names())
			.field("strategies", &strategies)
			.field("hooks", &self.hooks.len())
			.field("settings", &*self.settings.read())
			.finish()
	}
}

fn builtin_strategies() -> HashMap<String, Arc<dyn Strategy>> {
	let mut strategies: HashMap<String, Arc<dyn Strategy>> = HashMap::new();
	strategies.insert(BuildStrategy::NAME.to_string(), Arc::new(BuildStrategy));
	strategies.insert(CreateStrategy::NAME.to_string(), Arc::new(CreateStrategy));
	strategies
}
