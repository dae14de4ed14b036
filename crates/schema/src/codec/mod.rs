//! Tree-level generation and parsing through bound metadata.
//!
//! # Purpose
//!
//! [`Codec::generate`] turns a typed [`Element`] into a [`RawElement`] using
//! bound names, the metadata-defined attribute and child order, virtual
//! values and flattening. [`Codec::parse`] maps a [`RawElement`] back, routing
//! bound names to declared keys, coercing text to key datatypes, applying
//! adaptations and feeding virtual slots to their parse hooks. Content the
//! metadata does not declare survives as text.
//!
//! Flattening lifts a flattened child's text, attributes and children into
//! its parent on generation. Parsing gives each visible flattened child back
//! the attributes and children its own metadata declares, and the text when
//! the parent carries none of its own.
//!
//! # Invariants
//!
//! - Generate then parse reproduces declared and undeclared content.
//!   - Enforced in: [`Codec::parse`] falling back to declared patterns, then
//!     to text keys, for names no exact declared key binds.
//!   - Tested by: `codec::tests::test_round_trip_keeps_undeclared`,
//!     `codec::tests::test_pattern_declared_attributes_round_trip`,
//!     `codec::tests::test_flattened_child_round_trips`, `tests/round_trip.rs`.
//!   - Failure symptom: extension content is lost on re-serialization.

use gmodel_primitives::{AttributeKey, ContentError, Datatype, ElementKey, QName, Value};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;

mod raw;

pub use raw::RawElement;

use crate::config::CodecConfig;
use crate::document::Element;
use crate::metadata::{AttributeMetadata, ElementMetadata};
use crate::virtuals::VirtualElement;


/// Converts between typed elements and raw trees.
#[derive(Debug, Clone, Default)]
pub struct Codec {
	config: CodecConfig,
}

impl Codec {
	pub fn new(config: CodecConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &CodecConfig {
		&self.config
	}

	/// Renders `element` as described by `metadata`.
	pub fn generate(&self, metadata: &ElementMetadata, element: &Element) -> RawElement {
		let mut raw = RawElement::new(metadata.name().clone());
		raw.text = metadata.generate_value(element).map(|v| v.to_string());

		for attribute in metadata.attribute_iter(element) {
			let key = metadata
				.find_attribute(attribute.name())
				.filter(|k| k.id() == attribute.name())
				.unwrap_or(attribute.key());
			let bound = metadata.bind_attribute(key);
			raw.attributes
				.push((bound.name().clone(), attribute.value().to_string()));
		}

		for child in metadata.element_iter(element) {
			let bound = metadata.bind_element(child.key());
			let generated = self.generate(&bound, &child);
			if bound.is_flattened() {
				if raw.text.is_none() {
					raw.text = generated.text;
				}
				raw.attributes.extend(generated.attributes);
				raw.children.extend(generated.children);
			} else {
				raw.children.push(generated);
			}
		}
		raw
	}

	/// Builds a typed element from `raw` as described by `metadata`.
	///
	/// # Errors
	///
	/// Returns the first [`ContentError`] raised while coercing text or
	/// running a virtual parse hook.
	pub fn parse(&self, metadata: &ElementMetadata, raw: &RawElement) -> Result<Element, ContentError> {
		let adapted;
		let metadata = match self.adaptation(metadata, raw) {
			Some(key) => {
				adapted = metadata.rebind(&key);
				&adapted
			}
			None => metadata,
		};

		let attributes = attribute_table(metadata);
		let children = element_table(metadata);
		let mut element = Element::new(metadata.key().clone());
		let mut text = raw.text.as_ref();
		let mut lifted_attributes = vec![false; raw.attributes.len()];
		let mut lifted_children = vec![false; raw.children.len()];

		for key in metadata.elements() {
			let bound = metadata.bind_element(key);
			if !bound.is_visible() || !bound.is_flattened() || bound.virtual_element().is_some() {
				continue;
			}
			let mut lifted = RawElement::new(bound.name().clone());
			if !carries_text(metadata) && carries_text(&bound) {
				lifted.text = text.take().cloned();
			}
			let own_attributes = attribute_table(&bound);
			for ((name, value), taken) in raw.attributes.iter().zip(&mut lifted_attributes) {
				if !*taken && !attributes.contains_key(name) && own_attributes.contains_key(name) {
					*taken = true;
					lifted.attributes.push((name.clone(), value.clone()));
				}
			}
			let own_children = element_table(&bound);
			for (child, taken) in raw.children.iter().zip(&mut lifted_children) {
				if !*taken && !children.contains_key(&child.name) && own_children.contains_key(&child.name) {
					*taken = true;
					lifted.children.push(child.clone());
				}
			}
			if lifted.text.is_some() || !lifted.attributes.is_empty() || !lifted.children.is_empty() {
				element.add_element(self.parse(&bound, &lifted)?);
			}
		}

		if let Some(text) = text {
			metadata.parse_value(&mut element, Value::Text(text.clone()))?;
		}

		for ((name, text), taken) in raw.attributes.iter().zip(lifted_attributes) {
			if taken {
				continue;
			}
			let value = Value::Text(text.clone());
			if let Some(bound) = attributes.get(name) {
				bound.parse_value(&mut element, value)?;
				continue;
			}
			match metadata.find_attribute(name).filter(|k| k.id().is_pattern()) {
				Some(pattern) => metadata
					.bind_attribute(&AttributeKey::new(name.clone(), pattern.datatype()))
					.parse_value(&mut element, value)?,
				None => element.set_attribute(AttributeKey::text(name.clone()), value)?,
			}
		}

		let mut runs: IndexMap<QName, Vec<Element>> = IndexMap::new();
		for (child, taken) in raw.children.iter().zip(lifted_children) {
			if taken {
				continue;
			}
			let Some(bound) = children.get(&child.name) else {
				let key = match metadata.find_element(&child.name).filter(|k| k.name().is_pattern()) {
					Some(pattern) => ElementKey::new(child.name.clone(), pattern.datatype(), pattern.element_type()),
					None => ElementKey::of(child.name.clone(), Datatype::Text),
				};
				element.add_element(self.parse(&metadata.bind_element(&key), child)?);
				continue;
			};
			let parsed = self.parse(bound, child)?;
			match bound.virtual_element() {
				Some(VirtualElement::Single(generator)) => generator.parse(&mut element, parsed, bound)?,
				Some(VirtualElement::Multiple(_)) => runs.entry(child.name.clone()).or_default().push(parsed),
				None => element.add_element(parsed),
			}
		}
		for (name, parsed) in runs {
			let Some(bound) = children.get(&name) else {
				continue;
			};
			if let Some(VirtualElement::Multiple(generator)) = bound.virtual_element() {
				generator.parse(&mut element, parsed, bound)?;
			}
		}
		Ok(element)
	}

	/// The adapted key selected by the kind attribute of `raw`, if any.
	fn adaptation(&self, metadata: &ElementMetadata, raw: &RawElement) -> Option<ElementKey> {
		if metadata.adaptations().is_empty() {
			return None;
		}
		let (_, kind) = raw
			.attributes
			.iter()
			.find(|(name, _)| self.config.kind_attribute.matches(name))?;
		let adapted = metadata.adapt(kind).cloned();
		if adapted.is_none() {
			tracing::debug!(
				domain = "codec",
				element = %raw.name,
				kind = %kind,
				"no adaptation for kind; keeping declared key",
			);
		}
		adapted
	}
}

/// Declared attributes of `metadata` by bound name.
fn attribute_table(metadata: &ElementMetadata) -> FxHashMap<QName, AttributeMetadata> {
	metadata
		.attributes()
		.iter()
		.map(|key| {
			let bound = metadata.bind_attribute(key);
			(bound.name().clone(), bound)
		})
		.collect()
}

/// Declared children of `metadata` by bound name.
fn element_table(metadata: &ElementMetadata) -> FxHashMap<QName, ElementMetadata> {
	metadata
		.elements()
		.iter()
		.map(|key| {
			let bound = metadata.bind_element(key);
			(bound.name().clone(), bound)
		})
		.collect()
}

fn carries_text(metadata: &ElementMetadata) -> bool {
	metadata.virtual_value().is_some() || metadata.key().datatype() != Datatype::Void
}
