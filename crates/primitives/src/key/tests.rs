use proptest::prelude::*;

use super::*;
use crate::element_type::{ELEMENT, ElementTypeDef};

static FEED: ElementTypeDef = ElementTypeDef::new("feed", &ELEMENT);
static ALBUM_FEED: ElementTypeDef = ElementTypeDef::new("album-feed", &FEED);
static ENTRY: ElementTypeDef = ElementTypeDef::new("entry", &ELEMENT);

const G: &str = "http://base.google.com/ns/1.0";
const ATOM: &str = "http://www.w3.org/2005/Atom";

fn feed() -> ElementType {
	ElementType::of(&FEED)
}

fn album_feed() -> ElementType {
	ElementType::of(&ALBUM_FEED)
}

#[test]
fn test_attribute_namespace_wildcard() {
	let stored = AttributeKey::text(QName::any_in(G));
	assert!(stored.matches(&AttributeKey::text(QName::new(G, "price"))));
	assert!(!stored.matches(&AttributeKey::text(QName::new(ATOM, "price"))));
}

#[test]
fn test_attribute_any_namespace() {
	let stored = AttributeKey::text(QName::local("price"));
	assert!(stored.matches(&AttributeKey::text(QName::new(G, "price"))));
	assert!(stored.matches(&AttributeKey::text(QName::new(ATOM, "price"))));
}

#[test]
fn test_datatype_covariance() {
	let number = AttributeKey::new(QName::local("n"), Datatype::Number);
	assert!(number.matches(&AttributeKey::new(QName::local("n"), Datatype::Integer)));
	assert!(!number.matches(&AttributeKey::new(QName::local("n"), Datatype::Text)));
	assert!(number.matches(&AttributeKey::new(QName::local("n"), Datatype::Void)));
}

#[test]
fn test_element_type_covariance() {
	let stored = ElementKey::new(QName::new(ATOM, "feed"), Datatype::Void, feed());
	let request = ElementKey::new(QName::new(ATOM, "feed"), Datatype::Void, album_feed());
	assert!(stored.matches(&request));
	assert!(!request.matches(&stored));
}

#[test]
fn test_type_scoped_key_matches_any_name() {
	let stored = ElementKey::for_type(feed());
	let request = ElementKey::new(QName::new(ATOM, "feed"), Datatype::Text, album_feed());
	assert!(stored.matches(&request));
	assert!(!stored.matches(&ElementKey::of(QName::new(ATOM, "feed"), Datatype::Text)));
}

#[test]
fn test_named_key_does_not_match_nameless_request() {
	let stored = ElementKey::new(QName::new(ATOM, "feed"), Datatype::Void, feed());
	assert!(!stored.matches(&ElementKey::for_type(feed())));
}

#[test]
#[should_panic(expected = "type-scoped element key")]
fn test_type_scoped_root_key_rejected() {
	let _ = ElementKey::for_type(ElementType::any());
}

#[test]
fn test_kinds_never_cross() {
	let attr: MetadataKey = AttributeKey::text(QName::local("x")).into();
	let elem: MetadataKey = ElementKey::of(QName::local("x"), Datatype::Text).into();
	assert!(!attr.matches(&elem));
	assert!(!elem.matches(&attr));
	assert!(attr < elem);
}

#[test]
fn test_root_keys() {
	let attr = AttributeKey::text(QName::new(G, "price"));
	assert_eq!(attr.root_key(), RootKey::Name(QName::any_in(G)));

	let generic = ElementKey::of(QName::new(ATOM, "title"), Datatype::Text);
	assert_eq!(generic.root_key(), RootKey::Name(QName::any_in(ATOM)));

	let album = ElementKey::new(QName::new(ATOM, "feed"), Datatype::Void, album_feed());
	assert_eq!(album.root_key(), RootKey::Type(feed()));
	assert_eq!(ElementKey::for_type(album_feed()).root_key(), RootKey::Type(feed()));
}

#[test]
fn test_element_ordering_absent_id_first() {
	let named = ElementKey::new(QName::new(ATOM, "feed"), Datatype::Void, feed());
	let scoped = ElementKey::for_type(feed());
	assert!(scoped < named);
}

fn arb_datatype() -> impl Strategy<Value = Datatype> {
	prop_oneof![
		Just(Datatype::Any),
		Just(Datatype::Void),
		Just(Datatype::Text),
		Just(Datatype::Bool),
		Just(Datatype::Number),
		Just(Datatype::Integer),
		Just(Datatype::Float),
		Just(Datatype::DateTime),
	]
}

fn arb_type() -> impl Strategy<Value = ElementType> {
	prop_oneof![
		Just(ElementType::any()),
		Just(ElementType::of(&FEED)),
		Just(ElementType::of(&ALBUM_FEED)),
		Just(ElementType::of(&ENTRY)),
	]
}

fn arb_qname() -> impl Strategy<Value = QName> {
	(prop::option::of(prop_oneof![Just(G), Just(ATOM)]), prop_oneof![
		Just("a"),
		Just("b"),
		Just("*")
	])
		.prop_map(|(ns, local)| match ns {
			Some(ns) => QName::new(ns, local),
			None => QName::local(local),
		})
}

fn arb_element_key() -> impl Strategy<Value = ElementKey> {
	(arb_qname(), arb_datatype(), arb_type())
		.prop_map(|(id, datatype, ty)| ElementKey::new(id, datatype, ty))
}

proptest! {
	#[test]
	fn prop_ordering_consistent_with_equality(a in arb_element_key(), b in arb_element_key()) {
		prop_assert_eq!(a.cmp(&b) == std::cmp::Ordering::Equal, a == b);
		prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
	}

	#[test]
	fn prop_ordering_transitive(
		a in arb_element_key(),
		b in arb_element_key(),
		c in arb_element_key(),
	) {
		let mut keys = [a, b, c];
		keys.sort();
		prop_assert!(keys[0] <= keys[1] && keys[1] <= keys[2] && keys[0] <= keys[2]);
	}

	#[test]
	fn prop_matching_is_reflexive(key in arb_element_key()) {
		prop_assert!(key.matches(&key));
	}

	#[test]
	fn prop_match_implies_same_bucket_for_concrete_names(
		stored in arb_element_key(),
		requested in arb_element_key(),
	) {
		let concrete = requested.id().is_some_and(|id| !id.is_pattern());
		let stored_ns_known = stored.id().is_some_and(|id| id.ns().is_some());
		if concrete && stored_ns_known && stored.element_type() == requested.element_type()
			&& stored.matches(&requested)
		{
			prop_assert_eq!(stored.root_key(), requested.root_key());
		}
	}
}
