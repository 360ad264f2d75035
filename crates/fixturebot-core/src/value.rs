//! Dynamic property values.
//!
//! Every property a factory sets travels through [`Value`]: literals are
//! stored as values, generators return values, and the typed setters of a
//! [`MutatorTable`](crate::mutator::MutatorTable) convert them back into field
//! types through [`FromValue`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{FixtureError, FixtureResult};
use crate::fixture::{Fixture, FixtureObject};

/// A resolved property value.
#[derive(Debug, Clone, Default)]
pub enum Value {
	/// Absence of a value.
	#[default]
	Null,
	/// Boolean value.
	Bool(bool),
	/// Signed integer value.
	Int(i64),
	/// Unsigned integer above `i64::MAX`. Smaller unsigned values are stored as [`Value::Int`].
	UInt(u64),
	/// Floating point value.
	Float(f64),
	/// String value.
	String(String),
	/// Ordered list of values.
	List(Vec<Value>),
	/// Keyed values, in insertion order.
	Map(IndexMap<String, Value>),
	/// A produced fixture instance, e.g. a related model.
	Instance(Arc<dyn FixtureObject>),
}

impl Value {
	/// Wraps a fixture instance.
	pub fn instance<M: Fixture>(instance: M) -> Self {
		Self::Instance(Arc::new(instance))
	}

	/// Returns a short description of the kind of value, used in error messages.
	pub fn kind(&self) -> String {
		match self {
			Self::Null => "null".to_string(),
			Self::Bool(_) => "bool".to_string(),
			Self::Int(_) | Self::UInt(_) => "int".to_string(),
			Self::Float(_) => "float".to_string(),
			Self::String(_) => "string".to_string(),
			Self::List(_) => "list".to_string(),
			Self::Map(_) => "map".to_string(),
			Self::Instance(instance) => format!("instance of {}", instance.model_id()),
		}
	}

	/// Returns true if this is [`Value::Null`].
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	/// Returns the boolean, if this is a [`Value::Bool`].
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(b) => Some(*b),
			_ => None,
		}
	}

	/// Returns the integer, if this is a [`Value::Int`].
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::Int(n) => Some(*n),
			_ => None,
		}
	}

	/// Returns the integer, if this is a non-negative integer.
	pub fn as_u64(&self) -> Option<u64> {
		match self {
			Self::Int(n) => u64::try_from(*n).ok(),
			Self::UInt(n) => Some(*n),
			_ => None,
		}
	}

	/// Returns the number as a float, for both integers and floats.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::Int(n) => Some(*n as f64),
			Self::UInt(n) => Some(*n as f64),
			Self::Float(f) => Some(*f),
			_ => None,
		}
	}

	/// Returns the string slice, if this is a [`Value::String`].
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(s) => Some(s),
			_ => None,
		}
	}

	/// Returns the elements, if this is a [`Value::List`].
	pub fn as_list(&self) -> Option<&[Value]> {
		match self {
			Self::List(items) => Some(items),
			_ => None,
		}
	}

	/// Returns the entries, if this is a [`Value::Map`].
	pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
		match self {
			Self::Map(entries) => Some(entries),
			_ => None,
		}
	}

	/// Borrows the wrapped instance as `M`, if this is an instance of `M`.
	pub fn as_instance<M: Fixture>(&self) -> Option<&M> {
		match self {
			Self::Instance(instance) => instance.as_any().downcast_ref::<M>(),
			_ => None,
		}
	}

	/// Takes the wrapped instance out as `M`.
	///
	/// The instance is moved out when this value holds the only reference to
	/// it and cloned otherwise.
	///
	/// # Errors
	///
	/// Returns [`FixtureError::TypeMismatch`] if the value is not an instance of `M`.
	pub fn into_instance<M: Fixture>(self) -> FixtureResult<M> {
		let found = self.kind();
		let Self::Instance(instance) = self else {
			return Err(FixtureError::TypeMismatch {
				expected: M::model_id(),
				found,
			});
		};
		match instance.into_any_arc().downcast::<M>() {
			Ok(typed) => Ok(Arc::try_unwrap(typed).unwrap_or_else(|shared| (*shared).clone())),
			Err(_) => Err(FixtureError::TypeMismatch {
				expected: M::model_id(),
				found,
			}),
		}
	}

	/// Renders the value as JSON. Instances are rendered from their property snapshot.
	pub fn to_json(&self) -> serde_json::Value {
		match self {
			Self::Null => serde_json::Value::Null,
			Self::Bool(b) => serde_json::Value::Bool(*b),
			Self::Int(n) => serde_json::Value::from(*n),
			Self::UInt(n) => serde_json::Value::from(*n),
			Self::Float(f) => serde_json::Number::from_f64(*f)
				.map(serde_json::Value::Number)
				.unwrap_or(serde_json::Value::Null),
			Self::String(s) => serde_json::Value::String(s.clone()),
			Self::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
			Self::Map(entries) => serde_json::Value::Object(
				entries
					.iter()
					.map(|(key, value)| (key.clone(), value.to_json()))
					.collect(),
			),
			Self::Instance(instance) => serde_json::Value::Object(
				instance
					.properties()
					.into_iter()
					.map(|(key, value)| (key, value.to_json()))
					.collect(),
			),
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Null, Self::Null) => true,
			(Self::Bool(a), Self::Bool(b)) => a == b,
			(Self::Int(a), Self::Int(b)) => a == b,
			(Self::UInt(a), Self::UInt(b)) => a == b,
			(Self::Float(a), Self::Float(b)) => a == b,
			(Self::String(a), Self::String(b)) => a == b,
			(Self::List(a), Self::List(b)) => a == b,
			(Self::Map(a), Self::Map(b)) => a == b,
			// Instances are compared by identity
			(Self::Instance(a), Self::Instance(b)) => Arc::ptr_eq(a, b),
			_ => false,
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::String(s) => write!(f, "{}", s),
			Self::Instance(instance) => write!(f, "<{}>", instance.model_id()),
			other => write!(f, "{}", other.to_json()),
		}
	}
}

impl From<()> for Value {
	fn from(_: ()) -> Self {
		Self::Null
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

macro_rules! impl_from_lossless_int {
	($($ty:ty),*) => {
		$(
			impl From<$ty> for Value {
				fn from(value: $ty) -> Self {
					Self::Int(i64::from(value))
				}
			}
		)*
	};
}

impl_from_lossless_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
	fn from(value: u64) -> Self {
		match i64::try_from(value) {
			Ok(n) => Self::Int(n),
			Err(_) => Self::UInt(value),
		}
	}
}

impl From<usize> for Value {
	fn from(value: usize) -> Self {
		// usize is at most 64 bits on supported targets
		Self::from(value as u64)
	}
}

impl From<f32> for Value {
	fn from(value: f32) -> Self {
		Self::Float(f64::from(value))
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.to_string())
	}
}

impl<T: Into<Value>> From<Vec<T>> for Value {
	fn from(values: Vec<T>) -> Self {
		Self::List(values.into_iter().map(Into::into).collect())
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map(Into::into).unwrap_or(Self::Null)
	}
}

impl<T: Into<Value>> From<Box<T>> for Value {
	fn from(value: Box<T>) -> Self {
		(*value).into()
	}
}

impl<T: Into<Value>> From<IndexMap<String, T>> for Value {
	fn from(entries: IndexMap<String, T>) -> Self {
		Self::Map(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
	}
}

impl<T: Into<Value>> From<HashMap<String, T>> for Value {
	fn from(entries: HashMap<String, T>) -> Self {
		Self::Map(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
	}
}

impl From<serde_json::Value> for Value {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => Self::Null,
			serde_json::Value::Bool(b) => Self::Bool(b),
			serde_json::Value::Number(n) => {
				if let Some(i) = n.as_i64() {
					Self::Int(i)
				} else if let Some(u) = n.as_u64() {
					Self::from(u)
				} else {
					Self::Float(n.as_f64().unwrap_or(f64::NAN))
				}
			}
			serde_json::Value::String(s) => Self::String(s),
			serde_json::Value::Array(items) => {
				Self::List(items.into_iter().map(Value::from).collect())
			}
			serde_json::Value::Object(entries) => Self::Map(
				entries
					.into_iter()
					.map(|(k, v)| (k, Value::from(v)))
					.collect(),
			),
		}
	}
}

/// Conversion from a resolved [`Value`] into a field type.
///
/// Typed setters use this to accept the value a rule resolved to. A failed
/// conversion is a mutator failure and propagates out of the compile call.
pub trait FromValue: Sized {
	/// Converts the value, failing with [`FixtureError::TypeMismatch`].
	fn from_value(value: Value) -> FixtureResult<Self>;
}

fn mismatch<T>(expected: &'static str, value: &Value) -> FixtureResult<T> {
	Err(FixtureError::TypeMismatch {
		expected,
		found: value.kind(),
	})
}

impl FromValue for Value {
	fn from_value(value: Value) -> FixtureResult<Self> {
		Ok(value)
	}
}

impl FromValue for bool {
	fn from_value(value: Value) -> FixtureResult<Self> {
		match value {
			Value::Bool(b) => Ok(b),
			other => mismatch("bool", &other),
		}
	}
}

macro_rules! impl_from_value_int {
	($($ty:ty),*) => {
		$(
			impl FromValue for $ty {
				fn from_value(value: Value) -> FixtureResult<Self> {
					match value {
						Value::Int(n) => <$ty>::try_from(n).map_err(|_| FixtureError::TypeMismatch {
							expected: stringify!($ty),
							found: format!("out of range int {}", n),
						}),
						Value::UInt(n) => <$ty>::try_from(n).map_err(|_| FixtureError::TypeMismatch {
							expected: stringify!($ty),
							found: format!("out of range int {}", n),
						}),
						other => mismatch(stringify!($ty), &other),
					}
				}
			}
		)*
	};
}

impl_from_value_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromValue for f64 {
	fn from_value(value: Value) -> FixtureResult<Self> {
		match value {
			Value::Float(f) => Ok(f),
			Value::Int(n) => Ok(n as f64),
			Value::UInt(n) => Ok(n as f64),
			other => mismatch("f64", &other),
		}
	}
}

impl FromValue for f32 {
	fn from_value(value: Value) -> FixtureResult<Self> {
		let f = f64::from_value(value)?;
		if f.is_finite() && f.abs() > f64::from(f32::MAX) {
			return Err(FixtureError::TypeMismatch {
				expected: "f32",
				found: format!("out of range float {}", f),
			});
		}
		Ok(f as f32)
	}
}

impl FromValue for String {
	fn from_value(value: Value) -> FixtureResult<Self> {
		match value {
			Value::String(s) => Ok(s),
			other => mismatch("String", &other),
		}
	}
}

impl<T: FromValue> FromValue for Option<T> {
	fn from_value(value: Value) -> FixtureResult<Self> {
		match value {
			Value::Null => Ok(None),
			other => T::from_value(other).map(Some),
		}
	}
}

impl<T: FromValue> FromValue for Box<T> {
	fn from_value(value: Value) -> FixtureResult<Self> {
		T::from_value(value).map(Box::new)
	}
}

impl<T: FromValue> FromValue for Vec<T> {
	fn from_value(value: Value) -> FixtureResult<Self> {
		match value {
			Value::List(items) => items.into_iter().map(T::from_value).collect(),
			other => mismatch("Vec", &other),
		}
	}
}

impl<T: FromValue> FromValue for IndexMap<String, T> {
	fn from_value(value: Value) -> FixtureResult<Self> {
		match value {
			Value::Map(entries) => entries
				.into_iter()
				.map(|(k, v)| T::from_value(v).map(|v| (k, v)))
				.collect(),
			other => mismatch("IndexMap", &other),
		}
	}
}

impl<T: FromValue> FromValue for HashMap<String, T> {
	fn from_value(value: Value) -> FixtureResult<Self> {
		match value {
			Value::Map(entries) => entries
				.into_iter()
				.map(|(k, v)| T::from_value(v).map(|v| (k, v)))
				.collect(),
			other => mismatch("HashMap", &other),
		}
	}
}

impl FromValue for serde_json::Value {
	fn from_value(value: Value) -> FixtureResult<Self> {
		Ok(value.to_json())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_int_conversion_checks_range() {
		// Arrange
		let value = Value::Int(300);

		// Act
		let result = u8::from_value(value);

		// Assert
		assert!(matches!(result, Err(FixtureError::TypeMismatch { expected: "u8", .. })));
		assert_eq!(u16::from_value(Value::Int(300)).unwrap(), 300);
	}

	#[rstest]
	fn test_float_accepts_int() {
		assert_eq!(f64::from_value(Value::Int(2)).unwrap(), 2.0);
		assert_eq!(f64::from_value(Value::Float(1.5)).unwrap(), 1.5);
	}

	#[rstest]
	fn test_option_maps_null_to_none() {
		assert_eq!(Option::<String>::from_value(Value::Null).unwrap(), None);
		assert_eq!(
			Option::<String>::from_value(Value::from("Jane")).unwrap(),
			Some("Jane".to_string())
		);
	}

	#[rstest]
	fn test_string_rejects_int() {
		let error = String::from_value(Value::Int(1)).unwrap_err();
		assert_eq!(error.to_string(), "Type mismatch: expected String, found int");
	}

	#[rstest]
	fn test_nested_list_conversion() {
		// Arrange
		let value = Value::from(vec![vec![1, 2], vec![3]]);

		// Act
		let nested = Vec::<Vec<i32>>::from_value(value).unwrap();

		// Assert
		assert_eq!(nested, vec![vec![1, 2], vec![3]]);
	}

	#[rstest]
	fn test_json_conversion_preserves_shape() {
		// Arrange
		let json = json!({"name": "Jane", "tags": ["a", "b"], "age": 30, "score": 1.5, "admin": false});

		// Act
		let value = Value::from(json.clone());

		// Assert
		assert_eq!(value.as_map().unwrap()["name"], Value::from("Jane"));
		assert_eq!(value.as_map().unwrap()["age"], Value::Int(30));
		assert_eq!(value.to_json(), json);
	}

	#[rstest]
	fn test_map_keeps_insertion_order() {
		// Arrange
		let mut entries = IndexMap::new();
		entries.insert("z".to_string(), 1);
		entries.insert("a".to_string(), 2);

		// Act
		let value = Value::from(entries);

		// Assert
		let keys: Vec<_> = value.as_map().unwrap().keys().cloned().collect();
		assert_eq!(keys, vec!["z", "a"]);
	}

	#[rstest]
	fn test_large_u64_is_kept_exactly() {
		// Act
		let value = Value::from(u64::MAX);

		// Assert
		assert_eq!(value, Value::UInt(u64::MAX));
		assert_eq!(u64::from_value(value.clone()).unwrap(), u64::MAX);
		assert_eq!(value.to_json(), json!(u64::MAX));
		assert_eq!(Value::from(json!(u64::MAX)), value);
		assert_eq!(Value::from(7u64), Value::Int(7));
	}

	#[rstest]
	fn test_large_u64_rejected_by_signed_fields() {
		let error = i64::from_value(Value::from(u64::MAX)).unwrap_err();

		assert!(matches!(error, FixtureError::TypeMismatch { expected: "i64", .. }));
		assert_eq!(
			error.to_string(),
			format!("Type mismatch: expected i64, found out of range int {}", u64::MAX)
		);
	}

	#[rstest]
	fn test_f32_rejects_out_of_range() {
		// Act
		let result = f32::from_value(Value::Float(1e300));

		// Assert
		assert!(matches!(result, Err(FixtureError::TypeMismatch { expected: "f32", .. })));
		assert_eq!(f32::from_value(Value::Float(1.5)).unwrap(), 1.5);
		assert!(f32::from_value(Value::Float(f64::INFINITY)).unwrap().is_infinite());
	}

	#[rstest]
	fn test_display() {
		assert_eq!(Value::from("Jane").to_string(), "Jane");
		assert_eq!(Value::Int(3).to_string(), "3");
		assert_eq!(Value::Null.to_string(), "null");
	}
}
