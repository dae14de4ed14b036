use gmodel_primitives::{
	AttributeKey, Datatype, ELEMENT, ElementKey, ElementType, ElementTypeDef, MetadataContext,
	MetadataKey, QName,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

static ENTRY: ElementTypeDef = ElementTypeDef::new("entry", &ELEMENT);
static PHOTO: ElementTypeDef = ElementTypeDef::new("photo", &ENTRY);

const NS: &str = "http://schemas.example.com/g/2005";

fn attr(local: &str) -> AttributeKey {
	AttributeKey::text(QName::new(NS, local))
}

fn order(keys: &DeclaredKeys<AttributeKey>) -> Vec<String> {
	keys.keys().map(|k| k.id().local_name().to_string()).collect()
}

fn entry_key() -> ElementKey {
	ElementKey::new(QName::new(NS, "entry"), Datatype::Void, ElementType::of(&ENTRY))
}

#[test]
fn test_add_moves_to_end() {
	let mut keys = DeclaredKeys::default();
	keys.add(attr("a"));
	keys.add(attr("b"));
	keys.add(attr("a"));
	assert_eq!(order(&keys), ["b", "a"]);
}

#[test]
fn test_replace_keeps_position() {
	let mut keys = DeclaredKeys::default();
	keys.add(attr("a"));
	keys.add(attr("b"));
	keys.replace(AttributeKey::new(QName::new(NS, "a"), Datatype::Integer));
	assert_eq!(order(&keys), ["a", "b"]);
	assert_eq!(keys.get(&QName::new(NS, "a")).map(|k| k.datatype()), Some(Datatype::Integer));
}

#[test]
fn test_replace_appends_when_absent() {
	let mut keys = DeclaredKeys::default();
	keys.add(attr("a"));
	keys.replace(attr("c"));
	assert_eq!(order(&keys), ["a", "c"]);
}

#[test]
fn test_merge_replays_actions_of_later_layer() {
	let mut base = DeclaredKeys::default();
	base.add(attr("a"));
	base.add(attr("b"));
	base.add(attr("c"));

	let mut layer = DeclaredKeys::default();
	layer.add(attr("a"));
	layer.replace(attr("c"));
	base.merge(&layer);

	assert_eq!(order(&base), ["b", "c", "a"]);
}

#[test]
fn test_compose_scalars_later_wins() {
	let mut first = ElementTransform::default();
	first.fields.required = Some(true);
	first.fields.visible = Some(false);
	first.cardinality = Some(Cardinality::Multiple);

	let mut second = ElementTransform::default();
	second.fields.visible = Some(true);

	let composite = ElementTransform::compose(&entry_key(), [&first, &second]);
	assert_eq!(composite.required(), Some(true));
	assert_eq!(composite.visible(), Some(true));
	assert_eq!(composite.cardinality(), Some(Cardinality::Multiple));
	assert_eq!(composite.content_required(), None);
}

#[test]
fn test_compose_attribute_fields() {
	let mut first = AttributeTransform::default();
	first.fields.name = Some(QName::local("label"));
	let mut second = AttributeTransform::default();
	second.fields.required = Some(true);

	let composite = AttributeTransform::compose([&first, &second]);
	assert_eq!(composite.name(), Some(&QName::local("label")));
	assert_eq!(composite.required(), Some(true));
	assert_eq!(composite.visible(), None);
}

#[test]
fn test_compose_keeps_only_narrowing_adaptations() {
	let photo = ElementKey::new(QName::new(NS, "entry"), Datatype::Void, ElementType::of(&PHOTO));
	let generic = ElementKey::of(QName::new(NS, "entry"), Datatype::Void);

	let mut first = ElementTransform::default();
	first.adaptations.insert("photo".into(), photo.clone());
	let mut second = ElementTransform::default();
	second.adaptations.insert("photo".into(), generic.clone());
	second.adaptations.insert("same".into(), entry_key());

	let composite = ElementTransform::compose(&entry_key(), [&first, &second]);
	assert_eq!(composite.adaptations().len(), 1);
	assert_eq!(composite.adaptations().get("photo"), Some(&photo));
}

#[test]
fn test_adaptation_to_own_type_is_identity() {
	let photo = ElementKey::new(QName::new(NS, "entry"), Datatype::Void, ElementType::of(&PHOTO));
	let generic = ElementKey::of(QName::new(NS, "entry"), Datatype::Void);

	assert_eq!(narrowing(&entry_key(), &photo), Narrowing::Strict);
	assert_eq!(narrowing(&photo, &photo), Narrowing::Identity);
	assert_eq!(narrowing(&entry_key(), &generic), Narrowing::Unrelated);

	// Binding the subtype itself picks up the supertype layer's adaptation.
	let mut base = ElementTransform::default();
	base.adaptations.insert("photo".into(), photo.clone());
	let composite = ElementTransform::compose(&photo, [&base]);
	assert!(composite.adaptations().is_empty());
}

#[test]
fn test_merge_source_content_required_not_inherited() {
	let mut source = ElementTransform::default();
	source.content_required = Some(true);
	source.fields.required = Some(true);
	source.fields.name = Some(QName::local("old"));

	let mut moved = ElementTransform::default();
	moved.fields.name = Some(QName::local("new"));

	let merged = moved.merge_source(&source);
	assert_eq!(merged.content_required(), None);
	assert_eq!(merged.required(), Some(true));
	assert_eq!(merged.name(), Some(&QName::local("new")));
}

#[test]
fn test_merge_source_keeps_source_shape() {
	let mut source = ElementTransform::default();
	source.attributes.add(attr("a"));
	source.attributes.add(attr("b"));

	let mut moved = ElementTransform::default();
	moved.attributes.add(attr("c"));
	moved.attributes.add(attr("a"));

	let merged = moved.merge_source(&source);
	assert_eq!(order(merged.attributes()), ["a", "b", "c"]);
}

#[test]
fn test_report_conflicts_only_for_unordered_scopes() {
	let key = MetadataKey::Attribute(attr("price"));
	let parent = entry_key();
	let json = MetadataContext::format("json");

	let by_parent = TransformKey::new(Some(parent.clone()), key.clone(), None);
	let by_context = TransformKey::new(None, key.clone(), Some(json.clone()));
	let global = TransformKey::new(None, key.clone(), None);
	let request = TransformKey::new(Some(parent), key, Some(json));

	let mut hidden = AttributeTransform::default();
	hidden.fields.visible = Some(false);
	let mut shown = AttributeTransform::default();
	shown.fields.visible = Some(true);

	assert_eq!(report_conflicts(&request, &[(&by_parent, &hidden), (&by_context, &shown)]), 1);
	assert_eq!(report_conflicts(&request, &[(&global, &hidden), (&by_parent, &shown)]), 0);
	assert_eq!(report_conflicts(&request, &[(&by_parent, &hidden), (&by_context, &hidden)]), 0);
}

#[derive(Debug, Clone)]
enum Op {
	Add(u8),
	Replace(u8),
}

fn op() -> impl Strategy<Value = Op> {
	prop_oneof![(0u8..6).prop_map(Op::Add), (0u8..6).prop_map(Op::Replace)]
}

/// Reference model: a plain vector of names.
fn model(ops: &[Op]) -> Vec<String> {
	let mut out: Vec<String> = Vec::new();
	for op in ops {
		match op {
			Op::Add(n) => {
				let name = format!("k{n}");
				out.retain(|k| *k != name);
				out.push(name);
			}
			Op::Replace(n) => {
				let name = format!("k{n}");
				if !out.contains(&name) {
					out.push(name);
				}
			}
		}
	}
	out
}

proptest! {
	#[test]
	fn prop_add_then_replace_order(ops in proptest::collection::vec(op(), 0..24)) {
		let mut keys = DeclaredKeys::default();
		for op in &ops {
			match op {
				Op::Add(n) => keys.add(attr(&format!("k{n}"))),
				Op::Replace(n) => keys.replace(attr(&format!("k{n}"))),
			}
		}
		prop_assert_eq!(order(&keys), model(&ops));
	}

	#[test]
	fn prop_merge_equals_sequential_application(
		first in proptest::collection::vec(op(), 0..12),
		second in proptest::collection::vec(op(), 0..12),
	) {
		let build = |ops: &[Op]| {
			let mut keys = DeclaredKeys::default();
			for op in ops {
				match op {
					Op::Add(n) => keys.add(attr(&format!("k{n}"))),
					Op::Replace(n) => keys.replace(attr(&format!("k{n}"))),
				}
			}
			keys
		};
		// A layer records one entry per name, so replaying it matches
		// sequential application only when its names are distinct.
		let mut seen = std::collections::HashSet::new();
		let distinct = second.iter().all(|op| match op {
			Op::Add(n) | Op::Replace(n) => seen.insert(*n),
		});
		prop_assume!(distinct);

		let mut merged = build(&first);
		merged.merge(&build(&second));
		let all: Vec<Op> = first.iter().chain(second.iter()).cloned().collect();
		prop_assert_eq!(order(&merged), model(&all));
	}
}
