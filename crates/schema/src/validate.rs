//! Structural validation of document elements against bound metadata.

use gmodel_primitives::QName;

use crate::document::Element;
use crate::metadata::ElementMetadata;

/// Application-supplied check run after the structural checks of an element.
pub trait ElementValidator: Send + Sync {
	fn validate(&self, element: &Element, metadata: &ElementMetadata, cx: &mut ValidationContext);
}

/// One validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{element}: {message}")]
pub struct ValidationError {
	/// Name of the element the failure was found on.
	pub element: QName,
	pub message: String,
}

/// Accumulates failures across a validation pass.
#[derive(Debug, Default)]
pub struct ValidationContext {
	errors: Vec<ValidationError>,
}

impl ValidationContext {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records a failure on `element`.
	pub fn report(&mut self, element: &QName, message: impl Into<String>) {
		self.errors.push(ValidationError {
			element: element.clone(),
			message: message.into(),
		});
	}

	pub fn is_valid(&self) -> bool {
		self.errors.is_empty()
	}

	pub fn errors(&self) -> &[ValidationError] {
		&self.errors
	}

	pub fn into_errors(self) -> Vec<ValidationError> {
		self.errors
	}
}
