use std::fmt;

use gmodel_primitives::{AttributeKey, ElementKey, MetadataContext, MetadataKey, RootKey};

/// Scope of a metadata declaration or lookup: `(parent, key, context)`.
///
/// A missing parent or context means "applies everywhere" when the key is
/// stored, and "no parent" / "no context" when it is requested. Used with
/// exact equality as a map key and with [`TransformKey::matches`] as the
/// resolution predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransformKey {
	parent: Option<ElementKey>,
	key: MetadataKey,
	context: Option<MetadataContext>,
}

impl TransformKey {
	pub fn new(parent: Option<ElementKey>, key: MetadataKey, context: Option<MetadataContext>) -> Self {
		Self {
			parent,
			key,
			context,
		}
	}

	/// Scope of an attribute.
	pub fn attribute(
		parent: Option<&ElementKey>,
		key: &AttributeKey,
		context: Option<&MetadataContext>,
	) -> Self {
		Self::new(parent.cloned(), MetadataKey::Attribute(key.clone()), context.cloned())
	}

	/// Scope of an element.
	pub fn element(
		parent: Option<&ElementKey>,
		key: &ElementKey,
		context: Option<&MetadataContext>,
	) -> Self {
		Self::new(parent.cloned(), MetadataKey::Element(key.clone()), context.cloned())
	}

	pub fn parent(&self) -> Option<&ElementKey> {
		self.parent.as_ref()
	}

	pub fn key(&self) -> &MetadataKey {
		&self.key
	}

	pub fn context(&self) -> Option<&MetadataContext> {
		self.context.as_ref()
	}

	/// Returns the target key if it is an element key.
	pub fn element_key(&self) -> Option<&ElementKey> {
		self.key.as_element()
	}

	/// Returns the target key if it is an attribute key.
	pub fn attribute_key(&self) -> Option<&AttributeKey> {
		self.key.as_attribute()
	}

	/// Bucket the target key is stored under.
	pub fn root_key(&self) -> RootKey {
		self.key.root_key()
	}

	/// Returns true if this stored scope applies to `requested`.
	pub fn matches(&self, requested: &TransformKey) -> bool {
		let parent_ok = match (&self.parent, &requested.parent) {
			(None, _) => true,
			(Some(mine), Some(theirs)) => mine.matches(theirs),
			(Some(_), None) => false,
		};
		let context_ok = match (&self.context, &requested.context) {
			(None, _) => true,
			(Some(mine), Some(theirs)) => mine.matches(theirs),
			(Some(_), None) => false,
		};
		parent_ok && context_ok && self.key.matches(&requested.key)
	}

	/// Returns true if neither scope applies to the other.
	pub fn is_unordered_with(&self, other: &TransformKey) -> bool {
		!self.matches(other) && !other.matches(self)
	}
}

impl fmt::Display for TransformKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if let Some(parent) = &self.parent {
			write!(f, "{parent}/")?;
		}
		write!(f, "{}", self.key)?;
		if let Some(context) = &self.context {
			write!(f, "@{context}")?;
		}
		Ok(())
	}
}
