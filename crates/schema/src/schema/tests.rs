use gmodel_primitives::{
	AttributeKey, Datatype, ELEMENT, ElementKey, ElementType, ElementTypeDef, MetadataContext,
	MetadataKey, QName,
};
use pretty_assertions::assert_eq;

use super::*;
use crate::registry::MetadataRegistry;
use crate::transform::Cardinality;

static ENTRY: ElementTypeDef = ElementTypeDef::new("entry", &ELEMENT);

const NS: &str = "http://schemas.example.com/g/2005";

fn q(local: &str) -> QName {
	QName::new(NS, local)
}

fn entry_key() -> ElementKey {
	ElementKey::new(q("entry"), Datatype::Void, ElementType::of(&ENTRY))
}

fn title() -> ElementKey {
	ElementKey::of(q("title"), Datatype::Text)
}

fn json() -> MetadataContext {
	MetadataContext::format("json")
}

fn names(keys: &[ElementKey]) -> Vec<String> {
	keys.iter().map(|k| k.name().local_name().to_string()).collect()
}

#[test]
fn test_bind_is_cached() {
	let registry = MetadataRegistry::new();
	registry
		.build_element(None, &entry_key(), None)
		.add_element(&title());
	let schema = registry.create_schema().unwrap();
	assert_eq!(schema.cached_bindings(), 0);

	let first = schema.bind_element(None, &entry_key(), None);
	let second = schema.bind_element(None, &entry_key(), None);
	assert!(first.ptr_eq(&second));
	assert_eq!(schema.cached_bindings(), 1);

	let child = first.bind_element(&title());
	assert!(child.ptr_eq(&second.bind_element(&title())));
	assert_eq!(schema.cached_bindings(), 2);
}

#[test]
fn test_cache_disabled_binds_fresh_records() {
	let registry = MetadataRegistry::with_config(SchemaConfig {
		cache_bindings: false,
		..SchemaConfig::default()
	});
	registry.build_element(None, &entry_key(), None);
	let schema = registry.create_schema().unwrap();
	let first = schema.bind_element(None, &entry_key(), None);
	let second = schema.bind_element(None, &entry_key(), None);
	assert!(!first.ptr_eq(&second));
	assert_eq!(schema.cached_bindings(), 0);
}

#[test]
fn test_unknown_root_is_undeclared() {
	let schema = MetadataRegistry::new().create_schema().unwrap();
	let key = ElementKey::of(QName::new("urn:unknown", "thing"), Datatype::Text);
	let meta = schema.bind_element(None, &key, None);
	assert!(!meta.is_declared());
	assert_eq!(meta.name(), &key.name());
	assert!(meta.is_visible());
	assert!(!meta.is_required());
	assert_eq!(meta.cardinality(), Cardinality::Single);
	assert!(meta.elements().is_empty());

	let attribute = schema.bind_attribute(Some(&key), &AttributeKey::text(QName::local("id")), None);
	assert!(!attribute.is_declared());
	assert_eq!(attribute.name(), &QName::local("id"));
}

#[test]
fn test_context_scoped_declaration() {
	let registry = MetadataRegistry::new();
	registry
		.build_element(None, &entry_key(), Some(&json()))
		.set_name(QName::local("item"));
	let schema = registry.create_schema().unwrap();

	let plain = schema.bind_element(None, &entry_key(), None);
	let scoped = schema.bind_element(None, &entry_key(), Some(&json()));
	let narrower = schema.bind_element(None, &entry_key(), Some(&json().with_projection("full")));
	assert!(!plain.is_declared());
	assert_eq!(scoped.name(), &QName::local("item"));
	assert_eq!(narrower.name(), &QName::local("item"));
}

#[test]
fn test_parent_scoped_declaration_applies_under_parent_only() {
	let registry = MetadataRegistry::new();
	registry
		.build_element(None, &title(), None)
		.set_required(true);
	registry
		.build_element(Some(&entry_key()), &title(), None)
		.set_name(q("headline"));
	let schema = registry.create_schema().unwrap();

	let global = schema.bind_element(None, &title(), None);
	assert_eq!(global.name(), &q("title"));
	assert!(global.is_required());

	let nested = schema.bind_element(Some(&entry_key()), &title(), None);
	assert_eq!(nested.name(), &q("headline"));
	assert!(nested.is_required());
}

#[test]
fn test_unordered_conflict_later_declaration_wins() {
	let registry = MetadataRegistry::new();
	registry
		.build_element(Some(&entry_key()), &title(), None)
		.set_name(q("first"));
	registry
		.build_element(None, &title(), Some(&json()))
		.set_name(q("second"));
	let schema = registry.create_schema().unwrap();

	let meta = schema.bind_element(Some(&entry_key()), &title(), Some(&json()));
	assert_eq!(meta.name(), &q("second"));
}

#[test]
fn test_namespace_wildcard_declaration_applies_to_members() {
	let registry = MetadataRegistry::new();
	registry
		.build_attribute(Some(&entry_key()), &AttributeKey::text(QName::any_in(NS)), None)
		.set_visible(false);
	let schema = registry.create_schema().unwrap();

	let price = schema.bind_attribute(Some(&entry_key()), &AttributeKey::text(q("price")), None);
	assert!(price.is_declared());
	assert!(!price.is_visible());

	let foreign = schema.bind_attribute(
		Some(&entry_key()),
		&AttributeKey::text(QName::new("urn:other", "price")),
		None,
	);
	assert!(!foreign.is_declared());
}

#[test]
fn test_bind_dispatches_on_key_kind() {
	let registry = MetadataRegistry::new();
	registry
		.build_element(None, &entry_key(), None)
		.add_attribute(&AttributeKey::text(q("etag")));
	let schema = registry.create_schema().unwrap();

	let attribute = schema.bind(
		Some(&entry_key()),
		&MetadataKey::from(AttributeKey::text(q("etag"))),
		None,
	);
	assert!(attribute.as_attribute().is_some());
	assert!(attribute.is_declared());

	let element = schema.bind(None, &MetadataKey::from(entry_key()), None);
	assert!(element.as_element().is_some());
	assert!(element.is_declared());
}

#[test]
fn test_relocation_merges_against_source() {
	let registry = MetadataRegistry::new();
	let feed = ElementKey::of(q("feed"), Datatype::Void);
	let author = ElementKey::of(q("author"), Datatype::Void);

	let source = registry
		.build_element(Some(&entry_key()), &author, None);
	source.add_element(&ElementKey::of(q("name"), Datatype::Text));
	source.add_element(&ElementKey::of(q("email"), Datatype::Text));
	source.set_content_required(true);
	source.set_required(true);

	let destination = registry.build_element(Some(&feed), &author, None);
	destination.add_element(&ElementKey::of(q("uri"), Datatype::Text));
	destination.move_from(Some(&entry_key()), &author, None);
	let schema = registry.create_schema().unwrap();

	let original = schema.bind_element(Some(&entry_key()), &author, None);
	assert!(original.is_moved());
	assert!(!original.is_visible());

	let moved = schema.bind_element(Some(&feed), &author, None);
	assert!(moved.is_visible());
	assert!(!moved.is_moved());
	assert!(moved.is_required());
	assert!(!moved.is_content_required());
	assert_eq!(names(moved.elements()), ["name", "email", "uri"]);
}

#[test]
fn test_exact_transform_lookup() {
	let registry = MetadataRegistry::new();
	registry
		.build_element(None, &entry_key(), None)
		.set_cardinality(Cardinality::Multiple);
	let schema = registry.create_schema().unwrap();

	let scope = TransformKey::element(None, &entry_key(), None);
	assert_eq!(
		schema.element_transform(&scope).and_then(|t| t.cardinality()),
		Some(Cardinality::Multiple)
	);
	let other = TransformKey::element(None, &title(), None);
	assert!(schema.element_transform(&other).is_none());
}
