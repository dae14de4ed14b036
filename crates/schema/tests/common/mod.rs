//! Shared fixtures for schema integration tests: a small photo-feed model.

#![allow(dead_code)]

use gmodel_primitives::{AttributeKey, Datatype, ELEMENT, ElementKey, ElementType, ElementTypeDef, QName};
use gmodel_schema::{Cardinality, MetadataRegistry};

pub const NS: &str = "http://schemas.example.com/g/2005";

pub static FEED: ElementTypeDef = ElementTypeDef::new("feed", &ELEMENT);
pub static ENTRY: ElementTypeDef = ElementTypeDef::new("entry", &ELEMENT);
pub static PHOTO: ElementTypeDef = ElementTypeDef::new("photo", &ENTRY);

/// Installs a test-writer subscriber once per test binary.
pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn q(local: &str) -> QName {
	QName::new(NS, local)
}

pub fn feed_key() -> ElementKey {
	ElementKey::new(q("feed"), Datatype::Void, ElementType::of(&FEED))
}

pub fn entry_key() -> ElementKey {
	ElementKey::new(q("entry"), Datatype::Void, ElementType::of(&ENTRY))
}

pub fn photo_key() -> ElementKey {
	ElementKey::new(q("entry"), Datatype::Void, ElementType::of(&PHOTO))
}

pub fn text(local: &str) -> ElementKey {
	ElementKey::of(q(local), Datatype::Text)
}

pub fn integer(local: &str) -> ElementKey {
	ElementKey::of(q(local), Datatype::Integer)
}

pub fn author() -> ElementKey {
	ElementKey::of(q("author"), Datatype::Void)
}

pub fn etag() -> AttributeKey {
	AttributeKey::text(q("etag"))
}

/// Local names of `keys`, in order.
pub fn names(keys: &[ElementKey]) -> Vec<String> {
	keys.iter().map(|k| k.name().local_name().to_string()).collect()
}

/// Declares the photo-feed model into `registry`.
pub fn declare_photo_model(registry: &MetadataRegistry) {
	let feed = registry.build_element(None, &feed_key(), None);
	feed.add_attribute(&etag());
	feed.add_element(&text("title")).set_required(true);
	feed.add_element(&entry_key())
		.set_cardinality(Cardinality::Multiple);

	let entry = registry.build_element(None, &ElementKey::for_type(ElementType::of(&ENTRY)), None);
	entry.add_attribute(&etag());
	entry.add_element(&text("id")).set_required(true);
	entry.add_element(&text("title"));
	entry.add_element(&ElementKey::of(q("updated"), Datatype::DateTime));
	let byline = entry.add_element(&author());
	byline.add_element(&text("name")).set_required(true);
	byline.add_element(&text("email"));
	entry.adapt("photo", &photo_key());

	let photo = registry.build_element(None, &photo_key(), None);
	photo.add_element(&integer("width"));
	photo.add_element(&integer("height"));
}

pub fn photo_model() -> MetadataRegistry {
	let registry = MetadataRegistry::new();
	declare_photo_model(&registry);
	registry
}
