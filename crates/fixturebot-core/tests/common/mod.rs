//! Models shared by the integration tests.

#![allow(dead_code)]

use fixturebot_macros::Fixture;

#[derive(Debug, Clone, Default, Fixture)]
#[fixture(persist = "save_record")]
pub struct User {
	pub id: u64,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub email: Option<String>,
	pub account: Option<Account>,
	pub role: Option<String>,
	pub cars: Vec<Car>,
	pub subordinate: Option<Box<User>>,
	#[fixture(skip)]
	pub persisted: bool,
}

impl User {
	fn save_record(&mut self) -> Result<(), std::io::Error> {
		self.persisted = true;
		Ok(())
	}
}

#[derive(Debug, Clone, Default, Fixture)]
#[fixture(persist = "save_record")]
pub struct Account {
	pub name: Option<String>,
	#[fixture(skip)]
	pub persisted: bool,
}

impl Account {
	fn save_record(&mut self) -> Result<(), std::io::Error> {
		self.persisted = true;
		Ok(())
	}
}

#[derive(Debug, Clone, Default, Fixture)]
#[fixture(persist = "save_record")]
pub struct Car {
	pub name: Option<String>,
	#[fixture(skip)]
	pub persisted: bool,
}

impl Car {
	fn save_record(&mut self) -> Result<(), std::io::Error> {
		self.persisted = true;
		Ok(())
	}
}

/// Clears the process-wide definitions, strategies and hooks.
pub fn reset() {
	fixturebot_core::purge();
	fixturebot_core::purge_hooks();
}
