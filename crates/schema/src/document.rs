//! Concrete document nodes: the data that bound metadata describes.
//!
//! An [`Element`] stores its attributes by name and its children grouped by
//! name, both in the order they were first added. Values are coerced to the
//! owning key's datatype when they are set, so a stored value always has the
//! representation its key promises.

use gmodel_primitives::{AttributeKey, ContentError, ElementKey, QName, Value};
use indexmap::IndexMap;
use smallvec::SmallVec;

/// A stored attribute value.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
	key: AttributeKey,
	value: Value,
}

impl Attribute {
	/// Creates an attribute holding `value` as given, without coercion.
	pub(crate) fn from_parts(key: AttributeKey, value: Value) -> Self {
		Self { key, value }
	}

	/// Creates an attribute, coercing `value` to the key's datatype.
	pub fn new(key: AttributeKey, value: impl Into<Value>) -> Result<Self, ContentError> {
		let value = key.datatype().coerce(value.into())?;
		Ok(Self { key, value })
	}

	pub fn key(&self) -> &AttributeKey {
		&self.key
	}

	pub fn name(&self) -> &QName {
		self.key.id()
	}

	pub fn value(&self) -> &Value {
		&self.value
	}
}

/// Children sharing a name, in insertion order.
pub type Children = SmallVec<[Element; 1]>;

/// A document element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
	key: ElementKey,
	value: Option<Value>,
	attributes: IndexMap<QName, Attribute>,
	children: IndexMap<QName, Children>,
}

impl Element {
	pub fn new(key: ElementKey) -> Self {
		Self {
			key,
			value: None,
			attributes: IndexMap::new(),
			children: IndexMap::new(),
		}
	}

	pub fn key(&self) -> &ElementKey {
		&self.key
	}

	/// Name children of this element are grouped under in their parent.
	pub fn name(&self) -> QName {
		self.key.name()
	}

	pub fn value(&self) -> Option<&Value> {
		self.value.as_ref()
	}

	/// Sets the text content, coerced to the key's datatype.
	pub fn set_value(&mut self, value: impl Into<Value>) -> Result<(), ContentError> {
		self.value = Some(self.key.datatype().coerce(value.into())?);
		Ok(())
	}

	pub fn clear_value(&mut self) {
		self.value = None;
	}

	/// Builder form of [`Element::set_value`].
	pub fn with_value(mut self, value: impl Into<Value>) -> Result<Self, ContentError> {
		self.set_value(value)?;
		Ok(self)
	}

	pub fn attribute(&self, id: &QName) -> Option<&Attribute> {
		self.attributes.get(id)
	}

	pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
		self.attributes.values()
	}

	pub(crate) fn attribute_at(&self, index: usize) -> Option<&Attribute> {
		self.attributes.get_index(index).map(|(_, a)| a)
	}

	pub fn has_attribute(&self, id: &QName) -> bool {
		self.attributes.contains_key(id)
	}

	/// Stores an attribute, replacing one of the same name in place.
	pub fn set_attribute(
		&mut self,
		key: AttributeKey,
		value: impl Into<Value>,
	) -> Result<(), ContentError> {
		let attribute = Attribute::new(key, value)?;
		self.attributes.insert(attribute.name().clone(), attribute);
		Ok(())
	}

	pub fn remove_attribute(&mut self, id: &QName) -> Option<Attribute> {
		self.attributes.shift_remove(id)
	}

	/// Returns the first child with the given name.
	pub fn element(&self, name: &QName) -> Option<&Element> {
		self.children.get(name).and_then(|c| c.first())
	}

	/// Returns every child with the given name.
	pub fn elements(&self, name: &QName) -> &[Element] {
		self.children.get(name).map(|c| c.as_slice()).unwrap_or_default()
	}

	/// Iterates child groups in the order their names were first added.
	pub fn children(&self) -> impl Iterator<Item = (&QName, &[Element])> {
		self.children.iter().map(|(name, c)| (name, c.as_slice()))
	}

	pub(crate) fn child_group_at(&self, index: usize) -> Option<(&QName, &[Element])> {
		self.children.get_index(index).map(|(name, c)| (name, c.as_slice()))
	}

	pub fn has_element(&self, name: &QName) -> bool {
		self.children.get(name).is_some_and(|c| !c.is_empty())
	}

	/// Appends a child after any existing children of the same name.
	pub fn add_element(&mut self, child: Element) {
		self.children.entry(child.name()).or_default().push(child);
	}

	/// Replaces every child of the same name with `child`.
	pub fn set_element(&mut self, child: Element) {
		let mut slot = Children::new();
		let name = child.name();
		slot.push(child);
		self.children.insert(name, slot);
	}

	pub fn remove_elements(&mut self, name: &QName) -> Children {
		self.children.shift_remove(name).unwrap_or_default()
	}

	/// Re-keys this element, typically to an adapted subtype key.
	///
	/// Content is re-coerced to the new key's datatype.
	pub fn adapt(self, key: ElementKey) -> Result<Element, ContentError> {
		let value = match self.value {
			Some(v) => Some(key.datatype().coerce(v)?),
			None => None,
		};
		Ok(Element {
			key,
			value,
			attributes: self.attributes,
			children: self.children,
		})
	}
}
