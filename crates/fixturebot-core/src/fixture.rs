//! The target entity capability.
//!
//! A type becomes buildable by a [`Factory`](crate::factory::Factory) by
//! implementing [`Fixture`], usually through `#[derive(Fixture)]`.

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{FixtureError, FixtureResult};
use crate::mutator::MutatorTable;
use crate::value::Value;

/// A model that factories can instantiate and hydrate.
///
/// # Example
///
/// ```
/// use fixturebot_core::prelude::*;
/// use indexmap::IndexMap;
///
/// #[derive(Debug, Clone, Default)]
/// struct Tag {
///     label: String,
/// }
///
/// impl Fixture for Tag {
///     fn model_id() -> &'static str {
///         "Tag"
///     }
///
///     fn mutators() -> MutatorTable<Self> {
///         MutatorTable::new().with("label", |tag: &mut Tag, value| {
///             tag.label = FromValue::from_value(value)?;
///             Ok(())
///         })
///     }
///
///     fn properties(&self) -> IndexMap<String, Value> {
///         IndexMap::from([("label".to_string(), Value::from(self.label.clone()))])
///     }
/// }
///
/// let factory = Factory::<Tag>::new(Properties::new().set("label", "rust"), vec![]).unwrap();
/// assert_eq!(factory.build(Properties::new()).unwrap().label, "rust");
/// ```
pub trait Fixture: Default + Clone + Debug + Send + Sync + 'static {
	/// Identifier of the model, used in diagnostics and error messages.
	fn model_id() -> &'static str;

	/// Builds the table of typed setters for this model.
	///
	/// Factories do not call this directly; they go through
	/// [`mutators_for`](crate::mutator::mutators_for), which builds the table
	/// once per type.
	fn mutators() -> MutatorTable<Self>;

	/// Snapshot of the model's properties.
	fn properties(&self) -> IndexMap<String, Value>;

	/// Persists the instance. Invoked by the `create` strategy.
	fn save(&mut self) -> FixtureResult<()> {
		Err(FixtureError::PersistenceUnsupported(
			Self::model_id().to_string(),
		))
	}
}

/// Object-safe view of a [`Fixture`], used where the model type is erased:
/// strategies, hooks and [`Value::Instance`].
pub trait FixtureObject: Any + Debug + Send + Sync {
	/// Identifier of the model.
	fn model_id(&self) -> &'static str;

	/// Snapshot of the model's properties.
	fn properties(&self) -> IndexMap<String, Value>;

	/// Persists the instance.
	fn save(&mut self) -> FixtureResult<()>;

	/// Borrows the instance as [`Any`] for downcasting.
	fn as_any(&self) -> &dyn Any;

	/// Converts a shared instance into a shared [`Any`] for downcasting.
	fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

	/// Moves the instance into a [`Value::Instance`].
	fn into_value(self: Box<Self>) -> Value;
}

impl<M: Fixture> FixtureObject for M {
	fn model_id(&self) -> &'static str {
		M::model_id()
	}

	fn properties(&self) -> IndexMap<String, Value> {
		Fixture::properties(self)
	}

	fn save(&mut self) -> FixtureResult<()> {
		Fixture::save(self)
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
		self
	}

	fn into_value(self: Box<Self>) -> Value {
		let object: Box<dyn FixtureObject> = self;
		Value::Instance(Arc::from(object))
	}
}

impl dyn FixtureObject {
	/// Borrows the instance as `M`, if it is one.
	pub fn downcast_ref<M: Fixture>(&self) -> Option<&M> {
		self.as_any().downcast_ref::<M>()
	}
}
