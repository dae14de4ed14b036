use std::fmt;
use std::sync::Arc;

use gmodel_primitives::{AttributeKey, ContentError, ElementKey, MetadataContext, QName, Value};
use indexmap::IndexMap;

use super::AttributeMetadata;
use super::iter::{AttributeIter, ElementIter};
use crate::document::{Attribute, Element};
use crate::schema::{ElementBinding, Schema};
use crate::transform::{Cardinality, ElementTransform, Properties, TransformKey};
use crate::validate::{ElementValidator, ValidationContext};
use crate::virtuals::{VirtualElement, VirtualValue};

/// Resolved metadata of one element request.
#[derive(Clone)]
pub struct ElementMetadata {
	schema: Schema,
	binding: Arc<ElementBinding>,
}

impl ElementMetadata {
	pub(crate) fn new(schema: Schema, binding: Arc<ElementBinding>) -> Self {
		Self { schema, binding }
	}

	/// Returns true if both handles share one cached binding.
	pub fn ptr_eq(&self, other: &ElementMetadata) -> bool {
		Arc::ptr_eq(&self.binding, &other.binding)
	}

	pub fn schema(&self) -> &Schema {
		&self.schema
	}

	/// The request this metadata was bound for.
	pub fn scope(&self) -> &TransformKey {
		&self.binding.scope
	}

	pub fn key(&self) -> &ElementKey {
		&self.binding.key
	}

	pub fn parent(&self) -> Option<&ElementKey> {
		self.binding.scope.parent()
	}

	pub fn context(&self) -> Option<&MetadataContext> {
		self.binding.scope.context()
	}

	/// Returns false for the permissive metadata of an undeclared element.
	pub fn is_declared(&self) -> bool {
		self.binding.declared
	}

	/// The composite transform this metadata was resolved from, after
	/// relocation merging.
	pub fn transform(&self) -> &ElementTransform {
		&self.binding.transform
	}

	/// Name used on the wire.
	pub fn name(&self) -> &QName {
		&self.binding.name
	}

	pub fn is_required(&self) -> bool {
		self.binding.required
	}

	/// False when hidden explicitly or relocated elsewhere.
	pub fn is_visible(&self) -> bool {
		self.binding.visible
	}

	pub fn is_moved(&self) -> bool {
		self.binding.moved
	}

	pub fn cardinality(&self) -> Cardinality {
		self.binding.cardinality
	}

	pub fn is_content_required(&self) -> bool {
		self.binding.content_required
	}

	pub fn is_flattened(&self) -> bool {
		self.binding.flattened
	}

	pub fn validator(&self) -> Option<&Arc<dyn ElementValidator>> {
		self.binding.transform.validator.as_ref()
	}

	pub fn properties(&self) -> Option<&Properties> {
		self.binding.transform.properties.as_ref()
	}

	/// Downcasts the wire-format properties.
	pub fn properties_as<P: 'static>(&self) -> Option<&P> {
		self.properties().and_then(|p| p.downcast_ref::<P>())
	}

	pub fn virtual_value(&self) -> Option<&Arc<dyn VirtualValue>> {
		self.binding.transform.virtual_value()
	}

	pub fn virtual_element(&self) -> Option<&VirtualElement> {
		self.binding.transform.virtual_element.as_ref()
	}

	/// Declared attribute keys in final order.
	pub fn attributes(&self) -> &[AttributeKey] {
		&self.binding.attributes
	}

	/// Declared child element keys in final order.
	pub fn elements(&self) -> &[ElementKey] {
		&self.binding.elements
	}

	/// The declared attribute key that claims `id`: the key with exactly
	/// that id, else the first declared pattern matching it.
	pub fn find_attribute(&self, id: &QName) -> Option<&AttributeKey> {
		let keys = self.attributes();
		keys.iter()
			.find(|k| k.id() == id)
			.or_else(|| keys.iter().find(|k| k.id().matches(id)))
	}

	/// The declared child key that claims `name`, with the same precedence
	/// as [`ElementMetadata::find_attribute`].
	pub fn find_element(&self, name: &QName) -> Option<&ElementKey> {
		let keys = self.elements();
		keys.iter()
			.find(|k| k.name() == *name)
			.or_else(|| keys.iter().find(|k| k.name().matches(name)))
	}

	/// Stored attributes of `element` claimed by the declared `key`, in
	/// storage order.
	pub(crate) fn claimed_attributes<'a>(
		&'a self,
		key: &'a AttributeKey,
		element: &'a Element,
	) -> Vec<&'a Attribute> {
		if !key.id().is_pattern() {
			return element.attribute(key.id()).into_iter().collect();
		}
		element
			.attributes()
			.filter(|a| self.find_attribute(a.name()) == Some(key))
			.collect()
	}

	/// Stored children of `element` claimed by the declared `key`, group by
	/// group in storage order.
	pub(crate) fn claimed_elements<'a>(
		&'a self,
		key: &'a ElementKey,
		element: &'a Element,
	) -> Vec<&'a Element> {
		let name = key.name();
		if !name.is_pattern() {
			return element.elements(&name).iter().collect();
		}
		element
			.children()
			.filter(|(group, _)| self.find_element(group) == Some(key))
			.flat_map(|(_, group)| group)
			.collect()
	}

	pub fn is_declared_attribute(&self, id: &QName) -> bool {
		self.find_attribute(id).is_some()
	}

	pub fn is_declared_element(&self, name: &QName) -> bool {
		self.find_element(name).is_some()
	}

	/// Adaptations available to this element, by discriminator.
	pub fn adaptations(&self) -> &IndexMap<String, ElementKey> {
		&self.binding.adaptations
	}

	/// The subtype key selected by discriminator `kind`.
	pub fn adapt(&self, kind: &str) -> Option<&ElementKey> {
		self.binding.adaptations.get(kind)
	}

	/// Metadata for an attribute of this element.
	pub fn bind_attribute(&self, key: &AttributeKey) -> AttributeMetadata {
		self.schema
			.bind_attribute(Some(self.key()), key, self.context())
	}

	/// Metadata for a child element of this element.
	pub fn bind_element(&self, key: &ElementKey) -> ElementMetadata {
		self.schema.bind_element(Some(self.key()), key, self.context())
	}

	/// Metadata for the same request with the key narrowed to `adapted`.
	pub fn rebind(&self, adapted: &ElementKey) -> ElementMetadata {
		self.schema.bind_element(self.parent(), adapted, self.context())
	}

	/// Text content to emit for `element`.
	pub fn generate_value(&self, element: &Element) -> Option<Value> {
		match self.virtual_value() {
			Some(generator) => generator.generate(element),
			None => element.value().cloned(),
		}
	}

	/// Stores parsed text content on `element`.
	///
	/// # Errors
	///
	/// Returns a [`ContentError`] if the value does not convert to the key's
	/// datatype or the virtual hook rejects it.
	pub fn parse_value(&self, element: &mut Element, value: Value) -> Result<(), ContentError> {
		match self.virtual_value() {
			Some(generator) => generator.parse(element, value),
			None => element.set_value(value),
		}
	}

	/// Attributes of `element` in output order: visible declared attributes
	/// (including generated ones), then undeclared attributes.
	pub fn attribute_iter<'a>(&'a self, element: &'a Element) -> AttributeIter<'a> {
		AttributeIter::new(self, element)
	}

	/// Children of `element` in output order: visible declared children
	/// (including generated ones), then undeclared children.
	pub fn element_iter<'a>(&'a self, element: &'a Element) -> ElementIter<'a> {
		ElementIter::new(self, element)
	}

	/// Checks `element` and its descendants, accumulating failures in `cx`.
	pub fn validate(&self, element: &Element, cx: &mut ValidationContext) {
		let name = self.name();
		for key in self.attributes() {
			let meta = self.bind_attribute(key);
			if meta.is_visible()
				&& meta.is_required()
				&& meta.virtual_value().is_none()
				&& self.claimed_attributes(key, element).is_empty()
			{
				cx.report(name, format!("missing required attribute {}", meta.name()));
			}
		}

		for key in self.elements() {
			let meta = self.bind_element(key);
			if !meta.is_visible() || meta.virtual_element().is_some() {
				continue;
			}
			let count = self.claimed_elements(key, element).len();
			if meta.is_required() && count == 0 {
				cx.report(name, format!("missing required element {}", meta.name()));
			}
			if !meta.cardinality().is_multiple() && count > 1 {
				cx.report(name, format!("element {} occurs {count} times", meta.name()));
			}
		}

		if self.is_content_required() && self.virtual_value().is_none() && element.value().is_none() {
			cx.report(name, "missing required content");
		}

		if let Some(validator) = self.validator() {
			validator.validate(element, self, cx);
		}

		for (_, group) in element.children() {
			for child in group {
				let meta = self.bind_element(child.key());
				if meta.is_visible() {
					meta.validate(child, cx);
				}
			}
		}
	}
}

impl fmt::Debug for ElementMetadata {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ElementMetadata")
			.field("scope", self.scope())
			.field("name", self.name())
			.field("declared", &self.is_declared())
			.field("visible", &self.is_visible())
			.field("cardinality", &self.cardinality())
			.field("attributes", &self.attributes())
			.field("elements", &self.elements())
			.finish()
	}
}
