use std::sync::Arc;

use gmodel_primitives::QName;

use super::MetadataFields;
use crate::virtuals::VirtualValue;

/// Sparse metadata delta for an attribute.
#[derive(Debug, Clone, Default)]
pub struct AttributeTransform {
	pub(crate) fields: MetadataFields,
}

impl AttributeTransform {
	/// Folds `parts` left to right over an empty transform.
	pub fn compose<'a>(parts: impl IntoIterator<Item = &'a AttributeTransform>) -> Self {
		let mut out = Self::default();
		for part in parts {
			out.fields.merge(&part.fields);
		}
		out
	}

	pub fn name(&self) -> Option<&QName> {
		self.fields.name.as_ref()
	}

	pub fn required(&self) -> Option<bool> {
		self.fields.required
	}

	pub fn visible(&self) -> Option<bool> {
		self.fields.visible
	}

	pub fn virtual_value(&self) -> Option<&Arc<dyn VirtualValue>> {
		self.fields.virtual_value.as_ref()
	}

	pub(crate) fn differing(&self, other: &AttributeTransform) -> Vec<&'static str> {
		self.fields.differing(&other.fields)
	}
}
