//! Node types declaring their own metadata through static registrations.

mod common;

use common::*;
use gmodel_primitives::{AttributeKey, Datatype, ELEMENT, ElementKey, ElementType, ElementTypeDef};
use gmodel_schema::{MetadataRegistry, TypeRegistration};
use pretty_assertions::assert_eq;

static ALBUM: ElementTypeDef = ElementTypeDef::new("album", &ELEMENT);
static TAG: ElementTypeDef = ElementTypeDef::new("tag", &ELEMENT);

fn album_key() -> ElementKey {
	ElementKey::new(q("album"), Datatype::Void, ElementType::of(&ALBUM))
}

fn tag_key() -> ElementKey {
	ElementKey::new(q("tag"), Datatype::Text, ElementType::of(&TAG))
}

fn declare_album(registry: &MetadataRegistry) {
	let album = registry.build_element(None, &ElementKey::for_type(ElementType::of(&ALBUM)), None);
	album.add_attribute(&AttributeKey::new(q("rating"), Datatype::Integer));
	album.add_element(&text("title"));
	album.add_element(&tag_key());
}

fn declare_tag(registry: &MetadataRegistry) {
	registry
		.build_element(None, &ElementKey::for_type(ElementType::of(&TAG)), None)
		.add_attribute(&AttributeKey::text(q("scheme")))
		.set_required(true);
}

gmodel_schema::inventory::submit!(TypeRegistration::new(ElementType::of(&ALBUM), declare_album));
gmodel_schema::inventory::submit!(TypeRegistration::new(ElementType::of(&TAG), declare_tag));

#[test]
fn test_registering_a_type_pulls_in_child_types() {
	let registry = MetadataRegistry::new();
	assert!(!registry.is_registered(ElementType::of(&TAG)));
	registry.register(ElementType::of(&ALBUM));
	assert!(registry.is_registered(ElementType::of(&TAG)));

	let schema = registry.create_schema().unwrap();
	let album = schema.bind_element(None, &album_key(), None);
	assert_eq!(names(album.elements()), ["title", "tag"]);
	let tag = album.bind_element(&tag_key());
	assert!(tag.bind_attribute(&AttributeKey::text(q("scheme"))).is_required());
}

#[test]
fn test_declaring_a_child_registers_its_type() {
	let registry = MetadataRegistry::new();
	registry
		.build_element(None, &feed_key(), None)
		.add_element(&album_key());
	assert!(registry.is_registered(ElementType::of(&ALBUM)));

	let schema = registry.create_schema().unwrap();
	let album = schema
		.bind_element(None, &feed_key(), None)
		.bind_element(&album_key());
	assert_eq!(
		album
			.attributes()
			.iter()
			.map(|k| k.id().local_name())
			.collect::<Vec<_>>(),
		["rating"]
	);
}
