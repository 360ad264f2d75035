//! Hand-written models used by unit tests.

use indexmap::IndexMap;

use crate::error::FixtureResult;
use crate::fixture::Fixture;
use crate::mutator::MutatorTable;
use crate::value::{FromValue, Value};

macro_rules! instance_conversions {
	($($ty:ty),*) => {
		$(
			impl From<$ty> for Value {
				fn from(instance: $ty) -> Self {
					Value::instance(instance)
				}
			}

			impl FromValue for $ty {
				fn from_value(value: Value) -> FixtureResult<Self> {
					value.into_instance()
				}
			}
		)*
	};
}

instance_conversions!(User, Account, Car);

#[derive(Debug, Clone, Default)]
pub(crate) struct User {
	pub(crate) id: u64,
	pub(crate) first_name: Option<String>,
	pub(crate) last_name: Option<String>,
	pub(crate) email: Option<String>,
	pub(crate) account: Option<Account>,
	pub(crate) role: Option<String>,
	pub(crate) cars: Vec<Car>,
	pub(crate) subordinate: Option<Box<User>>,
	pub(crate) persisted: bool,
}

impl Fixture for User {
	fn model_id() -> &'static str {
		"User"
	}

	fn mutators() -> MutatorTable<Self> {
		MutatorTable::new()
			.with("id", |user: &mut User, value| {
				user.id = FromValue::from_value(value)?;
				Ok(())
			})
			.with("first_name", |user: &mut User, value| {
				user.first_name = FromValue::from_value(value)?;
				Ok(())
			})
			.with("last_name", |user: &mut User, value| {
				user.last_name = FromValue::from_value(value)?;
				Ok(())
			})
			.with("email", |user: &mut User, value| {
				user.email = FromValue::from_value(value)?;
				Ok(())
			})
			.with("account", |user: &mut User, value| {
				user.account = FromValue::from_value(value)?;
				Ok(())
			})
			.with("role", |user: &mut User, value| {
				user.role = FromValue::from_value(value)?;
				Ok(())
			})
			.with("cars", |user: &mut User, value| {
				user.cars = FromValue::from_value(value)?;
				Ok(())
			})
			.with("subordinate", |user: &mut User, value| {
				user.subordinate = FromValue::from_value(value)?;
				Ok(())
			})
	}

	fn properties(&self) -> IndexMap<String, Value> {
		IndexMap::from([
			("id".to_string(), Value::from(self.id)),
			("first_name".to_string(), Value::from(self.first_name.clone())),
			("last_name".to_string(), Value::from(self.last_name.clone())),
			("email".to_string(), Value::from(self.email.clone())),
			("account".to_string(), Value::from(self.account.clone())),
			("role".to_string(), Value::from(self.role.clone())),
			("cars".to_string(), Value::from(self.cars.clone())),
			("subordinate".to_string(), Value::from(self.subordinate.clone())),
		])
	}

	fn save(&mut self) -> FixtureResult<()> {
		self.persisted = true;
		Ok(())
	}
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Account {
	pub(crate) name: Option<String>,
	pub(crate) persisted: bool,
	pub(crate) saves: u32,
}

impl Fixture for Account {
	fn model_id() -> &'static str {
		"Account"
	}

	fn mutators() -> MutatorTable<Self> {
		MutatorTable::new().with("name", |account: &mut Account, value| {
			account.name = FromValue::from_value(value)?;
			Ok(())
		})
	}

	fn properties(&self) -> IndexMap<String, Value> {
		IndexMap::from([("name".to_string(), Value::from(self.name.clone()))])
	}

	fn save(&mut self) -> FixtureResult<()> {
		self.persisted = true;
		self.saves += 1;
		Ok(())
	}
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Car {
	pub(crate) name: Option<String>,
	pub(crate) persisted: bool,
}

impl Fixture for Car {
	fn model_id() -> &'static str {
		"Car"
	}

	fn mutators() -> MutatorTable<Self> {
		MutatorTable::new().with("name", |car: &mut Car, value| {
			car.name = FromValue::from_value(value)?;
			Ok(())
		})
	}

	fn properties(&self) -> IndexMap<String, Value> {
		IndexMap::from([("name".to_string(), Value::from(self.name.clone()))])
	}

	fn save(&mut self) -> FixtureResult<()> {
		self.persisted = true;
		Ok(())
	}
}

/// A model without persistence.
#[derive(Debug, Clone, Default)]
pub(crate) struct NoPersistence {
	pub(crate) label: Option<String>,
}

impl Fixture for NoPersistence {
	fn model_id() -> &'static str {
		"NoPersistence"
	}

	fn mutators() -> MutatorTable<Self> {
		MutatorTable::new().with("label", |model: &mut NoPersistence, value| {
			model.label = FromValue::from_value(value)?;
			Ok(())
		})
	}

	fn properties(&self) -> IndexMap<String, Value> {
		IndexMap::from([("label".to_string(), Value::from(self.label.clone()))])
	}
}
