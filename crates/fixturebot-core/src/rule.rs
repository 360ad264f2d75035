//! Value rules and property maps.
//!
//! A [`Rule`] describes how one property value is produced: a literal, a
//! container of nested rules, or a generator evaluated lazily against the
//! instance being hydrated. [`Properties`] is the ordered `name -> rule` map
//! used for both a factory's defaults and per-call overrides.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{FixtureError, FixtureResult};
use crate::factory::Sequence;
use crate::registry::DefinitionRegistry;
use crate::value::Value;

/// Generator closure: receives the partially hydrated instance and the build context.
pub type GeneratorFn<M> = Arc<dyn Fn(&M, &BuildContext<'_>) -> FixtureResult<Value> + Send + Sync>;

/// Context handed to generators during one compile call.
pub struct BuildContext<'a> {
	strategy: &'a str,
	sequence: &'a Sequence,
	registry: &'a DefinitionRegistry,
}

impl<'a> BuildContext<'a> {
	pub(crate) fn new(
		strategy: &'a str,
		sequence: &'a Sequence,
		registry: &'a DefinitionRegistry,
	) -> Self {
		Self {
			strategy,
			sequence,
			registry,
		}
	}

	/// Name of the strategy the instance is compiled for.
	pub fn strategy(&self) -> &str {
		self.strategy
	}

	/// Advances the compiling factory's sequence and returns the new value.
	pub fn next_sequence_value(&self) -> u64 {
		self.sequence.next_value()
	}

	/// Registry the compile call runs against. Relation generators look up
	/// related definitions here.
	pub fn registry(&self) -> &DefinitionRegistry {
		self.registry
	}
}

impl fmt::Debug for BuildContext<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BuildContext")
			.field("strategy", &self.strategy)
			.field("sequence", &self.sequence.current())
			.finish()
	}
}

/// How a property value is produced.
pub enum Rule<M> {
	/// A literal value, copied into every instance.
	Literal(Value),
	/// An ordered container; every element is resolved independently.
	List(Vec<Rule<M>>),
	/// A keyed container; every entry is resolved independently.
	Map(IndexMap<String, Rule<M>>),
	/// Evaluated once per compile call, in property order. Its output is used as is.
	Generator(GeneratorFn<M>),
}

impl<M> Rule<M> {
	/// Creates a generator rule.
	///
	/// The generator sees every property hydrated before this one.
	pub fn generator<F>(generator: F) -> Self
	where
		F: Fn(&M, &BuildContext<'_>) -> FixtureResult<Value> + Send + Sync + 'static,
	{
		Self::Generator(Arc::new(generator))
	}

	/// Creates an infallible generator that only reads the instance.
	pub fn computed<F, R>(compute: F) -> Self
	where
		F: Fn(&M) -> R + Send + Sync + 'static,
		R: Into<Value>,
	{
		Self::generator(move |instance, _| Ok(compute(instance).into()))
	}

	/// Creates a literal null rule.
	pub fn null() -> Self {
		Self::Literal(Value::Null)
	}

	/// Resolves the rule against the instance hydrated so far.
	///
	/// Containers keep their shape. Generator output is not resolved again.
	pub fn resolve(&self, instance: &M, ctx: &BuildContext<'_>) -> FixtureResult<Value> {
		match self {
			Self::Literal(value) => Ok(value.clone()),
			Self::List(rules) => rules
				.iter()
				.map(|rule| rule.resolve(instance, ctx))
				.collect::<FixtureResult<Vec<_>>>()
				.map(Value::List),
			Self::Map(rules) => rules
				.iter()
				.map(|(key, rule)| rule.resolve(instance, ctx).map(|value| (key.clone(), value)))
				.collect::<FixtureResult<IndexMap<_, _>>>()
				.map(Value::Map),
			Self::Generator(generator) => generator(instance, ctx),
		}
	}
}

impl<M> Clone for Rule<M> {
	fn clone(&self) -> Self {
		match self {
			Self::Literal(value) => Self::Literal(value.clone()),
			Self::List(rules) => Self::List(rules.clone()),
			Self::Map(rules) => Self::Map(rules.clone()),
			Self::Generator(generator) => Self::Generator(Arc::clone(generator)),
		}
	}
}

impl<M> fmt::Debug for Rule<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
			Self::List(rules) => f.debug_tuple("List").field(rules).finish(),
			Self::Map(rules) => f.debug_tuple("Map").field(rules).finish(),
			Self::Generator(_) => f.write_str("Generator(..)"),
		}
	}
}

impl<M> From<Value> for Rule<M> {
	fn from(value: Value) -> Self {
		Self::Literal(value)
	}
}

impl<M> From<Vec<Rule<M>>> for Rule<M> {
	fn from(rules: Vec<Rule<M>>) -> Self {
		Self::List(rules)
	}
}

impl<M> From<IndexMap<String, Rule<M>>> for Rule<M> {
	fn from(rules: IndexMap<String, Rule<M>>) -> Self {
		Self::Map(rules)
	}
}

macro_rules! impl_literal_rule {
	($($ty:ty),*) => {
		$(
			impl<M> From<$ty> for Rule<M> {
				fn from(value: $ty) -> Self {
					Self::Literal(Value::from(value))
				}
			}
		)*
	};
}

impl_literal_rule!(
	bool,
	i8,
	i16,
	i32,
	i64,
	u8,
	u16,
	u32,
	u64,
	usize,
	f32,
	f64,
	String,
	&str,
	serde_json::Value
);

/// Ordered `property name -> rule` map.
///
/// Insertion order is the hydration order.
pub struct Properties<M> {
	rules: IndexMap<String, Rule<M>>,
}

impl<M> Properties<M> {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self {
			rules: IndexMap::new(),
		}
	}

	/// Adds or replaces the rule for `name`, keeping its original position on replacement.
	pub fn set(mut self, name: impl Into<String>, rule: impl Into<Rule<M>>) -> Self {
		self.insert(name, rule);
		self
	}

	/// In-place variant of [`set`](Self::set).
	pub fn insert(&mut self, name: impl Into<String>, rule: impl Into<Rule<M>>) {
		self.rules.insert(name.into(), rule.into());
	}

	/// Returns the rule for `name`.
	pub fn get(&self, name: &str) -> Option<&Rule<M>> {
		self.rules.get(name)
	}

	/// Returns true if a rule is declared for `name`.
	pub fn contains(&self, name: &str) -> bool {
		self.rules.contains_key(name)
	}

	/// Property names in declaration order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.rules.keys().map(String::as_str)
	}

	/// Iterates over `(name, rule)` pairs in declaration order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule<M>)> {
		self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
	}

	/// Number of declared properties.
	pub fn len(&self) -> usize {
		self.rules.len()
	}

	/// Returns true if no property is declared.
	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	/// Left-biased merge: `overrides` win on collision.
	///
	/// The result keeps this map's order, followed by keys only present in `overrides`.
	pub fn merged(&self, overrides: Properties<M>) -> Properties<M> {
		let mut merged = self.clone();
		for (name, rule) in overrides.rules {
			merged.rules.insert(name, rule);
		}
		merged
	}

	/// Builds literal rules from already resolved values.
	pub fn from_values(values: IndexMap<String, Value>) -> Self {
		values
			.into_iter()
			.map(|(name, value)| (name, Rule::Literal(value)))
			.collect()
	}

	/// Builds literal rules from a JSON object.
	///
	/// # Errors
	///
	/// Returns a configuration error if `json` is not an object.
	pub fn from_json(json: serde_json::Value) -> FixtureResult<Self> {
		match json {
			serde_json::Value::Object(entries) => Ok(entries
				.into_iter()
				.map(|(name, value)| (name, Rule::Literal(Value::from(value))))
				.collect()),
			other => Err(FixtureError::invalid_argument(format!(
				"`overrides` has to be provided as a map of property names to values, got {}",
				json_kind(&other)
			))),
		}
	}
}

fn json_kind(value: &serde_json::Value) -> &'static str {
	match value {
		serde_json::Value::Null => "null",
		serde_json::Value::Bool(_) => "bool",
		serde_json::Value::Number(_) => "number",
		serde_json::Value::String(_) => "string",
		serde_json::Value::Array(_) => "array",
		serde_json::Value::Object(_) => "object",
	}
}

impl<M> Clone for Properties<M> {
	fn clone(&self) -> Self {
		Self {
			rules: self.rules.clone(),
		}
	}
}

impl<M> Default for Properties<M> {
	fn default() -> Self {
		Self::new()
	}
}

impl<M> fmt::Debug for Properties<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.rules.iter()).finish()
	}
}

impl<M> FromIterator<(String, Rule<M>)> for Properties<M> {
	fn from_iter<I: IntoIterator<Item = (String, Rule<M>)>>(iter: I) -> Self {
		Self {
			rules: iter.into_iter().collect(),
		}
	}
}

impl<M> IntoIterator for Properties<M> {
	type Item = (String, Rule<M>);
	type IntoIter = indexmap::map::IntoIter<String, Rule<M>>;

	fn into_iter(self) -> Self::IntoIter {
		self.rules.into_iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::User;
	use rstest::rstest;
	use serde_json::json;

	fn resolve(rule: &Rule<User>, user: &User) -> Value {
		let registry = DefinitionRegistry::new();
		let sequence = Sequence::new();
		let ctx = BuildContext::new("build", &sequence, &registry);
		rule.resolve(user, &ctx).unwrap()
	}

	#[rstest]
	fn test_merge_is_left_biased_and_ordered() {
		// Arrange
		let defaults = Properties::<User>::new()
			.set("first_name", "Jane")
			.set("last_name", "Doe");
		let overrides = Properties::<User>::new()
			.set("email", "x@example.com")
			.set("first_name", "John");

		// Act
		let merged = defaults.merged(overrides);

		// Assert
		let names: Vec<_> = merged.names().collect();
		assert_eq!(names, vec!["first_name", "last_name", "email"]);
		let user = User::default();
		assert_eq!(resolve(merged.get("first_name").unwrap(), &user), Value::from("John"));
		// defaults untouched
		assert_eq!(resolve(defaults.get("first_name").unwrap(), &user), Value::from("Jane"));
	}

	#[rstest]
	fn test_containers_resolve_recursively() {
		// Arrange
		let mut entries = IndexMap::new();
		entries.insert("b".to_string(), Rule::<User>::from(2));
		entries.insert("a".to_string(), Rule::computed(|_: &User| 1));
		let rule: Rule<User> = Rule::List(vec![Rule::from("x"), Rule::Map(entries)]);

		// Act
		let value = resolve(&rule, &User::default());

		// Assert
		let list = value.as_list().unwrap();
		assert_eq!(list[0], Value::from("x"));
		let map = list[1].as_map().unwrap();
		assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "a"]);
		assert_eq!(map["a"], Value::Int(1));
	}

	#[rstest]
	fn test_generator_reads_instance_and_strategy() {
		// Arrange
		let rule = Rule::<User>::generator(|user, ctx| {
			Ok(Value::from(format!(
				"{}:{}",
				user.first_name.clone().unwrap_or_default(),
				ctx.strategy()
			)))
		});
		let user = User {
			first_name: Some("Jane".to_string()),
			..Default::default()
		};

		// Act
		let value = resolve(&rule, &user);

		// Assert
		assert_eq!(value, Value::from("Jane:build"));
	}

	#[rstest]
	fn test_generator_output_is_not_resolved_again() {
		// Arrange
		let rule = Rule::<User>::generator(|_, _| Ok(Value::from(vec!["raw"])));

		// Act
		let value = resolve(&rule, &User::default());

		// Assert
		assert_eq!(value, Value::List(vec![Value::from("raw")]));
	}

	#[rstest]
	fn test_from_json_rejects_non_object() {
		// Act
		let result = Properties::<User>::from_json(json!("first_name"));

		// Assert
		let error = result.unwrap_err();
		assert!(error.is_configuration_error());
		assert!(error
			.to_string()
			.starts_with("`overrides` has to be provided as a map of property names to values"));
	}

	#[rstest]
	fn test_from_json_keeps_literals() {
		let properties =
			Properties::<User>::from_json(json!({"first_name": "Jane", "id": 3})).unwrap();

		assert_eq!(properties.len(), 2);
		assert_eq!(resolve(properties.get("id").unwrap(), &User::default()), Value::Int(3));
	}
}
