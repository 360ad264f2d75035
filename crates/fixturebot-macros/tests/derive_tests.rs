//! Tests for `#[derive(Fixture)]`.

use fixturebot_core::{
	DefinitionRegistry, Factory, Fixture, FixtureError, FromValue, HookRegistry, Properties, Value,
	mutators_for,
};
use fixturebot_macros::Fixture;
use rstest::rstest;
use std::sync::Arc;

#[derive(Debug, Clone, Default, Fixture)]
struct Tag {
	label: String,
}

#[derive(Debug, Clone, Default, Fixture)]
#[fixture(model = "auth.Member", persist = "insert")]
struct Member {
	id: u64,
	#[fixture(rename = "firstName")]
	first_name: Option<String>,
	tags: Vec<Tag>,
	#[fixture(skip)]
	inserts: u32,
}

impl Member {
	fn insert(&mut self) -> Result<(), std::io::Error> {
		self.inserts += 1;
		Ok(())
	}
}

#[derive(Debug, Clone, Default, Fixture)]
#[fixture(persist = "insert")]
struct Broken {
	name: String,
}

impl Broken {
	fn insert(&mut self) -> Result<(), String> {
		Err(format!("cannot insert {}", self.name))
	}
}

fn factory<M: Fixture>(properties: Properties<M>) -> Factory<M> {
	Factory::with_hook_registry(properties, vec![], Arc::new(HookRegistry::new())).unwrap()
}

#[rstest]
fn test_model_id_defaults_to_struct_name() {
	assert_eq!(Tag::model_id(), "Tag");
	assert_eq!(Member::model_id(), "auth.Member");
}

#[rstest]
fn test_mutators_follow_field_order() {
	// Act
	let table = mutators_for::<Member>();

	// Assert
	let properties: Vec<_> = table.properties().collect();
	assert_eq!(properties, vec!["id", "firstName", "tags"]);
	assert!(!table.has_mutator("inserts"));
	assert!(!table.has_mutator("first_name"));
}

#[rstest]
fn test_setters_convert_values() {
	// Arrange
	let table = Member::mutators();
	let mut member = Member::default();

	// Act
	table.apply(&mut member, "id", Value::Int(7)).unwrap();
	table
		.apply(&mut member, "firstName", Value::from("Jane"))
		.unwrap();

	// Assert
	assert_eq!(member.id, 7);
	assert_eq!(member.first_name.as_deref(), Some("Jane"));
}

#[rstest]
fn test_setter_type_mismatch() {
	let table = Member::mutators();
	let mut member = Member::default();

	let error = table
		.apply(&mut member, "id", Value::from("seven"))
		.unwrap_err();

	assert!(matches!(error, FixtureError::TypeMismatch { expected: "u64", .. }));
}

#[rstest]
fn test_properties_snapshot() {
	// Arrange
	let member = Member {
		id: 3,
		first_name: Some("Jane".to_string()),
		tags: vec![Tag {
			label: "rust".to_string(),
		}],
		inserts: 0,
	};

	// Act
	let properties = Fixture::properties(&member);

	// Assert
	assert_eq!(
		properties.keys().cloned().collect::<Vec<_>>(),
		vec!["id", "firstName", "tags"]
	);
	assert_eq!(properties["id"], Value::Int(3));
	let tags = properties["tags"].as_list().unwrap();
	assert_eq!(tags[0].as_instance::<Tag>().unwrap().label, "rust");
}

#[rstest]
fn test_instance_conversions() {
	// Arrange
	let value = Value::from(Tag {
		label: "rust".to_string(),
	});

	// Act
	let tag = Tag::from_value(value).unwrap();

	// Assert
	assert_eq!(tag.label, "rust");
	assert!(Tag::from_value(Value::Int(1)).is_err());
}

#[rstest]
fn test_persist_method_backs_create() {
	// Arrange
	let registry = DefinitionRegistry::new();
	let members = factory::<Member>(Properties::new().set("firstName", "Jane"));

	// Act
	let built: Member = members
		.run(&registry, "build", Properties::new())
		.unwrap()
		.into_instance()
		.unwrap();
	let created: Member = members
		.run(&registry, "create", Properties::new())
		.unwrap()
		.into_instance()
		.unwrap();

	// Assert
	assert_eq!(built.inserts, 0);
	assert_eq!(created.inserts, 1);
}

#[rstest]
fn test_persist_failure_is_wrapped() {
	// Arrange
	let registry = DefinitionRegistry::new();
	let broken = factory::<Broken>(Properties::new().set("name", "x"));

	// Act
	let error = broken
		.run(&registry, "create", Properties::new())
		.unwrap_err();

	// Assert
	assert!(matches!(error, FixtureError::Persistence { ref model, .. } if model == "Broken"));
	assert_eq!(error.to_string(), "Failed to persist Broken: cannot insert x");
}

#[rstest]
fn test_missing_persist_is_unsupported() {
	let registry = DefinitionRegistry::new();
	let tags = factory::<Tag>(Properties::new());

	let error = tags.run(&registry, "create", Properties::new()).unwrap_err();

	assert!(matches!(error, FixtureError::PersistenceUnsupported(ref model) if model == "Tag"));
}
