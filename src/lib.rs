//! # FixtureBot
//!
//! Fixture factories for Rust tests.
//!
//! A factory is registered under a name together with default property rules.
//! Compiling it through a strategy hydrates a fresh model instance, applies the
//! rules and any per-call overrides, and hands the instance back (`build`) or
//! persists it first (`create`). Lifecycle hooks can observe every stage.
//!
//! ## Feature Flags
//!
//! - `macros` (default) - `#[derive(Fixture)]` for mutator tables
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use fixturebot::prelude::*;
//!
//! #[derive(Debug, Clone, Default, Fixture)]
//! #[fixture(persist = "save")]
//! struct User {
//!     id: u64,
//!     email: Option<String>,
//! }
//!
//! impl User {
//!     fn save(&mut self) -> Result<(), std::io::Error> {
//!         Ok(())
//!     }
//! }
//!
//! define::<User>(
//!     "User",
//!     Properties::new()
//!         .set("id", sequence())
//!         .set("email", sequence_with(|n, _: &User, _| format!("user{n}@example.com"))),
//!     DefineOptions::new(),
//! )?;
//!
//! let user: User = create("User", Properties::new().set("email", "jane@example.com"))?;
//! ```

pub use fixturebot_core::*;

#[cfg(feature = "macros")]
pub use fixturebot_macros::Fixture;

/// Everything needed to define and compile fixtures.
pub mod prelude {
	pub use fixturebot_core::prelude::*;

	#[cfg(feature = "macros")]
	pub use fixturebot_macros::Fixture;
}

#[cfg(all(test, feature = "macros"))]
mod tests {
	use super::prelude::*;
	use rstest::rstest;
	use serial_test::serial;

	#[derive(Debug, Clone, Default, Fixture)]
	#[fixture(persist = "store")]
	struct Widget {
		id: u64,
		label: Option<String>,
		#[fixture(skip)]
		stored: bool,
	}

	impl Widget {
		fn store(&mut self) -> Result<(), std::io::Error> {
			self.stored = true;
			Ok(())
		}
	}

	#[rstest]
	#[serial(fixturebot)]
	fn test_facade_builds_and_creates() {
		// Arrange
		crate::purge();
		define::<Widget>(
			"Widget",
			Properties::new()
				.set("id", sequence())
				.set("label", "gear"),
			DefineOptions::new(),
		)
		.unwrap();

		// Act
		let built: Widget = build("Widget", Properties::new()).unwrap();
		let created: Widget = create("Widget", Properties::new().set("label", "cog")).unwrap();

		// Assert
		assert_eq!((built.id, built.label.as_deref(), built.stored), (1, Some("gear"), false));
		assert_eq!((created.id, created.label.as_deref(), created.stored), (2, Some("cog"), true));
	}
}
