//! Mutator discovery.
//!
//! A [`MutatorTable`] is the capability table of a model: for every settable
//! property it holds a typed setter. Factories validate property names against
//! it at definition time and on every compile call, then invoke the setters
//! during hydration.
//!
//! Tables are built once per model type and shared through a process-wide
//! cache keyed by [`TypeId`].

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::error::{FixtureError, FixtureResult};
use crate::fixture::Fixture;
use crate::value::Value;

/// Typed setter: converts the resolved value and stores it on the instance.
pub type SetterFn<M> = fn(&mut M, Value) -> FixtureResult<()>;

/// A setter bound to one property.
pub struct Mutator<M> {
	property: &'static str,
	setter: SetterFn<M>,
}

impl<M> Mutator<M> {
	/// Property this mutator sets.
	pub fn property(&self) -> &'static str {
		self.property
	}

	/// Name of the mutator, derived from the property name.
	pub fn name(&self) -> String {
		mutator_name(self.property)
	}

	/// Invokes the setter. Conversion failures are returned unchanged.
	pub fn apply(&self, instance: &mut M, value: Value) -> FixtureResult<()> {
		(self.setter)(instance, value)
	}
}

impl<M> Clone for Mutator<M> {
	fn clone(&self) -> Self {
		Self {
			property: self.property,
			setter: self.setter,
		}
	}
}

impl<M> fmt::Debug for Mutator<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Mutator")
			.field("property", &self.property)
			.finish()
	}
}

/// Returns the mutator name for a property (`first_name` -> `set_first_name`).
pub fn mutator_name(property: &str) -> String {
	format!("set_{}", property)
}

/// Ordered table of the mutators a model exposes.
pub struct MutatorTable<M> {
	mutators: IndexMap<&'static str, Mutator<M>>,
}

impl<M> MutatorTable<M> {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self {
			mutators: IndexMap::new(),
		}
	}

	/// Adds a setter for `property`. A second setter for the same property replaces the first.
	pub fn with(mut self, property: &'static str, setter: SetterFn<M>) -> Self {
		self.mutators
			.insert(property, Mutator { property, setter });
		self
	}

	/// Returns true if a mutator exists for `property`.
	pub fn has_mutator(&self, property: &str) -> bool {
		self.mutators.contains_key(property)
	}

	/// Returns the mutator for `property`.
	pub fn get(&self, property: &str) -> Option<&Mutator<M>> {
		self.mutators.get(property)
	}

	/// Lists the properties that have mutators, in declaration order.
	pub fn properties(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.mutators.keys().copied()
	}

	/// Number of mutable properties.
	pub fn len(&self) -> usize {
		self.mutators.len()
	}

	/// Returns true if the model exposes no mutators.
	pub fn is_empty(&self) -> bool {
		self.mutators.is_empty()
	}
}

impl<M: Fixture> MutatorTable<M> {
	/// Fails with a configuration error naming `property` and the model
	/// unless a mutator exists for it.
	pub fn ensure(&self, property: &str) -> FixtureResult<()> {
		if self.has_mutator(property) {
			Ok(())
		} else {
			Err(FixtureError::unknown_property(M::model_id(), property))
		}
	}

	/// Sets `property` on `instance`.
	///
	/// # Errors
	///
	/// Returns a configuration error if the property has no mutator, or
	/// whatever the setter itself returns.
	pub fn apply(&self, instance: &mut M, property: &str, value: Value) -> FixtureResult<()> {
		let mutator = self
			.get(property)
			.ok_or_else(|| FixtureError::unknown_property(M::model_id(), property))?;
		mutator.apply(instance, value)
	}
}

impl<M> Default for MutatorTable<M> {
	fn default() -> Self {
		Self::new()
	}
}

impl<M> fmt::Debug for MutatorTable<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.mutators.keys()).finish()
	}
}

/// Cache of built tables, one per model type.
static MUTATOR_CACHE: Lazy<RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>> =
	Lazy::new(|| RwLock::new(HashMap::new()));

/// Returns the mutator table of `M`, building it on first use.
pub fn mutators_for<M: Fixture>() -> Arc<MutatorTable<M>> {
	let type_id = TypeId::of::<M>();

	{
		let cache = MUTATOR_CACHE.read();
		if let Some(entry) = cache.get(&type_id)
			&& let Ok(table) = Arc::clone(entry).downcast::<MutatorTable<M>>()
		{
			return table;
		}
	}

	let table = Arc::new(M::mutators());
	let mut cache = MUTATOR_CACHE.write();
	let entry = cache
		.entry(type_id)
		.or_insert_with(|| table.clone() as Arc<dyn Any + Send + Sync>);
	Arc::clone(entry)
		.downcast::<MutatorTable<M>>()
		.unwrap_or(table)
}
