//! Metadata keys: the identity and typing of attributes and elements.
//!
//! # Matching
//!
//! [`ElementKey::matches`] and [`AttributeKey::matches`] are the single
//! predicate used whenever metadata is looked up. A stored key matches a
//! requested key when:
//!
//! - the stored id, used as a [`QName`] pattern, matches the requested id;
//! - the stored datatype is assignable from the requested one, or the
//!   requested datatype is [`Datatype::Void`];
//! - (elements) the stored node type is the requested node type or a
//!   supertype of it.
//!
//! # Ordering
//!
//! Keys order lexicographically by id (absent ids first), node type
//! (hierarchy depth, then name) and datatype (hierarchy depth, then name).
//! [`MetadataKey`] orders attribute keys before element keys.
//!
//! # Buckets
//!
//! [`RootKey`] is the coarse partition a key's metadata is stored under; see
//! [`AttributeKey::root_key`] and [`ElementKey::root_key`].

use std::fmt;

use crate::datatype::Datatype;
use crate::element_type::ElementType;
use crate::qname::QName;

/// Key of an attribute: a name and a content datatype.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeKey {
	id: QName,
	datatype: Datatype,
}

impl AttributeKey {
	/// Creates an attribute key.
	pub fn new(id: QName, datatype: Datatype) -> Self {
		Self { id, datatype }
	}

	/// Creates a text-valued attribute key.
	pub fn text(id: QName) -> Self {
		Self::new(id, Datatype::Text)
	}

	/// Returns the attribute name.
	pub fn id(&self) -> &QName {
		&self.id
	}

	/// Returns the content datatype.
	pub fn datatype(&self) -> Datatype {
		self.datatype
	}

	/// Returns true if this stored key applies to the `requested` key.
	pub fn matches(&self, requested: &AttributeKey) -> bool {
		self.id.matches(&requested.id) && self.datatype.matches(requested.datatype)
	}

	/// Bucket for this key: its namespace with a wildcard local name.
	pub fn root_key(&self) -> RootKey {
		RootKey::Name(self.id.with_any_local_name())
	}
}

impl fmt::Display for AttributeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "@{}<{}>", self.id, self.datatype)
	}
}

/// Key of an element: an optional name, a content datatype, and a node type.
///
/// A key without an id is type-scoped: it stands for every element of its
/// node type regardless of name and is only used to declare metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementKey {
	id: Option<QName>,
	datatype: Datatype,
	element_type: ElementType,
}

impl ElementKey {
	/// Creates a named element key.
	pub fn new(id: QName, datatype: Datatype, element_type: ElementType) -> Self {
		Self {
			id: Some(id),
			datatype,
			element_type,
		}
	}

	/// Creates a named key of the generic [`ElementType::any`] type.
	pub fn of(id: QName, datatype: Datatype) -> Self {
		Self::new(id, datatype, ElementType::any())
	}

	/// Creates a type-scoped key covering every element of `element_type`.
	///
	/// # Panics
	///
	/// Panics if `element_type` is a hierarchy root: a nameless key on the
	/// root type would match every element in the document.
	pub fn for_type(element_type: ElementType) -> Self {
		assert!(
			!element_type.is_root(),
			"type-scoped element key requires a subtype of the root, got {element_type}"
		);
		Self {
			id: None,
			datatype: Datatype::Any,
			element_type,
		}
	}

	/// Returns the element name, if any.
	pub fn id(&self) -> Option<&QName> {
		self.id.as_ref()
	}

	/// Returns the element name, falling back to the node type's name.
	pub fn name(&self) -> QName {
		match &self.id {
			Some(id) => id.clone(),
			None => QName::local(self.element_type.name()),
		}
	}

	/// Returns the content datatype.
	pub fn datatype(&self) -> Datatype {
		self.datatype
	}

	/// Returns the node type.
	pub fn element_type(&self) -> ElementType {
		self.element_type
	}

	/// Returns this key with a different node type.
	pub fn with_element_type(&self, element_type: ElementType) -> Self {
		Self {
			id: self.id.clone(),
			datatype: self.datatype,
			element_type,
		}
	}

	/// Returns true if this stored key applies to the `requested` key.
	pub fn matches(&self, requested: &ElementKey) -> bool {
		if let Some(id) = &self.id {
			match &requested.id {
				Some(other) if id.matches(other) => {}
				_ => return false,
			}
		}
		self.datatype.matches(requested.datatype)
			&& self.element_type.is_assignable_from(requested.element_type)
	}

	/// Bucket for this key.
	///
	/// Subtyped elements share the bucket of their shallowest supertype below
	/// the root; generic elements are bucketed by namespace like attributes.
	pub fn root_key(&self) -> RootKey {
		if let Some(ty) = self.element_type.root_child() {
			return RootKey::Type(ty);
		}
		match &self.id {
			Some(id) => RootKey::Name(id.with_any_local_name()),
			None => RootKey::Type(self.element_type),
		}
	}
}

impl PartialOrd for ElementKey {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for ElementKey {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.id
			.cmp(&other.id)
			.then_with(|| self.element_type.cmp(&other.element_type))
			.then_with(|| self.datatype.cmp(&other.datatype))
	}
}

impl fmt::Display for ElementKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.id {
			Some(id) => write!(f, "{id}"),
			None => f.write_str("*"),
		}?;
		write!(f, "[{}]<{}>", self.element_type, self.datatype)
	}
}

/// Either kind of key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetadataKey {
	/// An attribute key.
	Attribute(AttributeKey),
	/// An element key.
	Element(ElementKey),
}

impl MetadataKey {
	/// Returns true if this stored key applies to `requested`; kinds never cross.
	pub fn matches(&self, requested: &MetadataKey) -> bool {
		match (self, requested) {
			(MetadataKey::Attribute(a), MetadataKey::Attribute(b)) => a.matches(b),
			(MetadataKey::Element(a), MetadataKey::Element(b)) => a.matches(b),
			_ => false,
		}
	}

	/// Bucket for this key.
	pub fn root_key(&self) -> RootKey {
		match self {
			MetadataKey::Attribute(k) => k.root_key(),
			MetadataKey::Element(k) => k.root_key(),
		}
	}

	/// Returns the attribute key, if this is one.
	pub fn as_attribute(&self) -> Option<&AttributeKey> {
		match self {
			MetadataKey::Attribute(k) => Some(k),
			MetadataKey::Element(_) => None,
		}
	}

	/// Returns the element key, if this is one.
	pub fn as_element(&self) -> Option<&ElementKey> {
		match self {
			MetadataKey::Element(k) => Some(k),
			MetadataKey::Attribute(_) => None,
		}
	}
}

impl From<AttributeKey> for MetadataKey {
	fn from(key: AttributeKey) -> Self {
		MetadataKey::Attribute(key)
	}
}

impl From<ElementKey> for MetadataKey {
	fn from(key: ElementKey) -> Self {
		MetadataKey::Element(key)
	}
}

impl fmt::Display for MetadataKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MetadataKey::Attribute(k) => k.fmt(f),
			MetadataKey::Element(k) => k.fmt(f),
		}
	}
}

/// Coarse partition of stored metadata, derived from a target key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RootKey {
	/// Namespace bucket, always in `{ns}*` form.
	Name(QName),
	/// Bucket of a node type directly below the hierarchy root.
	Type(ElementType),
}

impl fmt::Display for RootKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RootKey::Name(name) => write!(f, "{name}"),
			RootKey::Type(ty) => write!(f, "[{ty}]"),
		}
	}
}

#[cfg(test)]
mod tests;
