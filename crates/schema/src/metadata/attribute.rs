use std::fmt;
use std::sync::Arc;

use gmodel_primitives::{AttributeKey, ContentError, ElementKey, MetadataContext, QName, Value};

use crate::document::Element;
use crate::schema::{AttributeBinding, Schema};
use crate::transform::{AttributeTransform, TransformKey};
use crate::virtuals::VirtualValue;

/// Resolved metadata of one attribute request.
#[derive(Clone)]
pub struct AttributeMetadata {
	schema: Schema,
	binding: Arc<AttributeBinding>,
}

impl AttributeMetadata {
	pub(crate) fn new(schema: Schema, binding: Arc<AttributeBinding>) -> Self {
		Self { schema, binding }
	}

	/// Returns true if both handles share one cached binding.
	pub fn ptr_eq(&self, other: &AttributeMetadata) -> bool {
		Arc::ptr_eq(&self.binding, &other.binding)
	}

	pub fn schema(&self) -> &Schema {
		&self.schema
	}

	/// The request this metadata was bound for.
	pub fn scope(&self) -> &TransformKey {
		&self.binding.scope
	}

	pub fn key(&self) -> &AttributeKey {
		&self.binding.key
	}

	pub fn parent(&self) -> Option<&ElementKey> {
		self.binding.scope.parent()
	}

	pub fn context(&self) -> Option<&MetadataContext> {
		self.binding.scope.context()
	}

	/// Returns false for the permissive metadata of an undeclared attribute.
	pub fn is_declared(&self) -> bool {
		self.binding.declared
	}

	/// The composite transform this metadata was resolved from.
	pub fn transform(&self) -> &AttributeTransform {
		&self.binding.transform
	}

	/// Name used on the wire.
	pub fn name(&self) -> &QName {
		&self.binding.name
	}

	pub fn is_required(&self) -> bool {
		self.binding.required
	}

	pub fn is_visible(&self) -> bool {
		self.binding.visible
	}

	pub fn virtual_value(&self) -> Option<&Arc<dyn VirtualValue>> {
		self.binding.transform.virtual_value()
	}

	/// Value to emit for this attribute on `owner`.
	pub fn generate_value(&self, owner: &Element) -> Option<Value> {
		match self.virtual_value() {
			Some(generator) => generator.generate(owner),
			None => owner.attribute(self.key().id()).map(|a| a.value().clone()),
		}
	}

	/// Stores a parsed value for this attribute on `owner`.
	///
	/// # Errors
	///
	/// Returns a [`ContentError`] if the value does not convert to the key's
	/// datatype or the virtual hook rejects it.
	pub fn parse_value(&self, owner: &mut Element, value: Value) -> Result<(), ContentError> {
		match self.virtual_value() {
			Some(generator) => generator.parse(owner, value),
			None => owner.set_attribute(self.key().clone(), value),
		}
	}
}

impl fmt::Debug for AttributeMetadata {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AttributeMetadata")
			.field("scope", self.scope())
			.field("name", self.name())
			.field("declared", &self.is_declared())
			.field("required", &self.is_required())
			.field("visible", &self.is_visible())
			.finish()
	}
}
