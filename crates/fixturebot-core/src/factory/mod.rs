//! Factories.
//!
//! A [`Factory`] owns the default rules of one fixture definition and turns
//! them, plus per-call overrides, into hydrated instances:
//!
//! 1. every override key is checked against the model's mutators,
//! 2. the strategy's `before_compile` phase runs,
//! 3. a default instance is created and the merged rules are resolved and
//!    applied one property at a time, in declaration order,
//! 4. the strategy's `result` phase runs on the hydrated instance.
//!
//! Factories are immutable once built. [`Factory::extend`] derives a new
//! factory, with its own sequence, leaving the parent untouched.

mod sequence;

pub use sequence::Sequence;

use std::fmt;
use std::sync::Arc;

use crate::error::FixtureResult;
use crate::fixture::{Fixture, FixtureObject};
use crate::hooks::{Hook, HookRegistry, LifecycleObserver, Stage};
use crate::mutator::{MutatorTable, mutators_for};
use crate::registry::DefinitionRegistry;
use crate::rule::{BuildContext, Properties};
use crate::strategy::{BuildStrategy, CreateStrategy, LifecycleNotifier, Strategy};
use crate::value::Value;

/// Builds instances of `M` from default rules.
pub struct Factory<M: Fixture> {
	mutators: Arc<MutatorTable<M>>,
	defaults: Properties<M>,
	hooks: Vec<Hook>,
	observer: LifecycleObserver,
	sequence: Sequence,
}

impl<M: Fixture> Factory<M> {
	/// Creates a factory firing global hooks from [`HookRegistry::global`].
	///
	/// # Errors
	///
	/// Returns a configuration error if a default names a property without a mutator.
	pub fn new(defaults: Properties<M>, hooks: Vec<Hook>) -> FixtureResult<Self> {
		Self::with_hook_registry(defaults, hooks, HookRegistry::global())
	}

	/// Creates a factory firing global hooks from `global_hooks`.
	pub fn with_hook_registry(
		defaults: Properties<M>,
		hooks: Vec<Hook>,
		global_hooks: Arc<HookRegistry>,
	) -> FixtureResult<Self> {
		let mutators = mutators_for::<M>();
		for name in defaults.names() {
			mutators.ensure(name)?;
		}

		Ok(Self {
			mutators,
			defaults,
			observer: LifecycleObserver::new(global_hooks, hooks.clone()),
			hooks,
			sequence: Sequence::new(),
		})
	}

	/// Identifier of the built model.
	pub fn model_id(&self) -> &'static str {
		M::model_id()
	}

	/// Default rules, in declaration order.
	pub fn defaults(&self) -> &Properties<M> {
		&self.defaults
	}

	/// Hooks local to this factory.
	pub fn hooks(&self) -> &[Hook] {
		&self.hooks
	}

	/// Derives a factory whose defaults are this factory's defaults merged
	/// with `properties` (which win), and whose hooks are both hook lists.
	///
	/// The derived factory starts its own sequence at 0.
	///
	/// # Errors
	///
	/// Returns a configuration error if `properties` names a property without a mutator.
	pub fn extend(&self, properties: Properties<M>, hooks: Vec<Hook>) -> FixtureResult<Self> {
		let mut all_hooks = self.hooks.clone();
		all_hooks.extend(hooks);
		Self::with_hook_registry(
			self.defaults.merged(properties),
			all_hooks,
			Arc::clone(self.observer.global()),
		)
	}

	/// Advances the sequence and returns the new value. The first call returns 1.
	pub fn next_sequence_value(&self) -> u64 {
		self.sequence.next_value()
	}

	/// Mutable properties without a default rule, in mutator order.
	pub fn unset_properties(&self) -> Vec<&'static str> {
		self.mutators
			.properties()
			.filter(|property| !self.defaults.contains(property))
			.collect()
	}

	/// Fires the hooks bound to `stage`.
	pub fn notify(&self, stage: Stage, instance: Option<&dyn FixtureObject>) -> FixtureResult<()> {
		self.observer.notify(stage, instance)
	}

	/// Hydrates an instance without running any strategy phase.
	///
	/// Relation generators resolve against [`DefinitionRegistry::global`].
	pub fn compile(&self, overrides: Properties<M>, strategy: &str) -> FixtureResult<M> {
		self.compile_in(DefinitionRegistry::global(), overrides, strategy)
	}

	/// Hydrates an instance against `registry` without running any strategy phase.
	///
	/// # Errors
	///
	/// Fails with a configuration error, before any mutation, if `overrides`
	/// names a property without a mutator. Errors from generators and
	/// setters are returned unchanged.
	pub fn compile_in(
		&self,
		registry: &DefinitionRegistry,
		overrides: Properties<M>,
		strategy: &str,
	) -> FixtureResult<M> {
		self.validate(&overrides)?;
		self.hydrate(registry, overrides, strategy)
	}

	/// Runs a full compile call with the strategy registered as `strategy`.
	pub fn run(
		&self,
		registry: &DefinitionRegistry,
		strategy: &str,
		overrides: Properties<M>,
	) -> FixtureResult<Value> {
		self.validate(&overrides)?;
		let handler = registry.find_strategy(strategy)?;
		self.run_validated(registry, strategy, handler.as_ref(), overrides)
	}

	/// Runs a full compile call with an unregistered strategy.
	///
	/// `name` is what generators see as the active strategy.
	pub fn run_with(
		&self,
		registry: &DefinitionRegistry,
		name: &str,
		strategy: &dyn Strategy,
		overrides: Properties<M>,
	) -> FixtureResult<Value> {
		self.validate(&overrides)?;
		self.run_validated(registry, name, strategy, overrides)
	}

	/// Builds an instance without persisting it.
	pub fn build(&self, overrides: Properties<M>) -> FixtureResult<M> {
		self.run(DefinitionRegistry::global(), BuildStrategy::NAME, overrides)?
			.into_instance()
	}

	/// Builds and persists an instance.
	pub fn create(&self, overrides: Properties<M>) -> FixtureResult<M> {
		self.run(DefinitionRegistry::global(), CreateStrategy::NAME, overrides)?
			.into_instance()
	}

	fn validate(&self, overrides: &Properties<M>) -> FixtureResult<()> {
		for name in overrides.names() {
			self.mutators.ensure(name)?;
		}
		Ok(())
	}

	fn run_validated(
		&self,
		registry: &DefinitionRegistry,
		name: &str,
		strategy: &dyn Strategy,
		overrides: Properties<M>,
	) -> FixtureResult<Value> {
		tracing::debug!(model = M::model_id(), strategy = name, "compiling fixture");
		strategy.before_compile(self)?;
		let instance = self.hydrate(registry, overrides, name)?;
		let output = strategy.result(self, Box::new(instance))?;
		tracing::debug!(model = M::model_id(), strategy = name, "fixture compiled");
		Ok(output)
	}

	fn hydrate(
		&self,
		registry: &DefinitionRegistry,
		overrides: Properties<M>,
		strategy: &str,
	) -> FixtureResult<M> {
		let mut instance = M::default();
		let rules = self.defaults.merged(overrides);
		let ctx = BuildContext::new(strategy, &self.sequence, registry);

		for (name, rule) in rules.iter() {
			let value = rule.resolve(&instance, &ctx)?;
			tracing::trace!(model = M::model_id(), property = name, value = %value, "hydrating property");
			self.mutators.apply(&mut instance, name, value)?;
		}

		Ok(instance)
	}
}

impl<M: Fixture> LifecycleNotifier for Factory<M> {
	fn model_id(&self) -> &'static str {
		M::model_id()
	}

	fn notify(&self, stage: Stage, instance: Option<&dyn FixtureObject>) -> FixtureResult<()> {
		self.observer.notify(stage, instance)
	}
}

impl<M: Fixture> fmt::Debug for Factory<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Factory")
			.field("model", &M::model_id())
			.field("defaults", &self.defaults)
			.field("hooks", &self.hooks.len())
			.field("sequence", &self.sequence.current())
			.finish()
	}
}
