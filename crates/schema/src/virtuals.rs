//! Hooks for declared slots whose content is computed from elsewhere in the
//! document instead of being stored directly.
//!
//! A virtual value stands in for the text of an attribute or element; a
//! virtual element stands in for one child (or, for the multiple variant, a
//! run of children) of its parent. Generation runs during iteration, parsing
//! runs when the codec meets the slot's bound name.

use std::fmt;
use std::sync::Arc;

use gmodel_primitives::{ContentError, Value};

use crate::document::Element;
use crate::metadata::ElementMetadata;

/// Computes the value of a virtual attribute or element content.
pub trait VirtualValue: Send + Sync {
	/// Produces the value from `element`, or `None` to omit it.
	///
	/// For attributes `element` is the owning element; for element content it
	/// is the element itself.
	fn generate(&self, element: &Element) -> Option<Value>;

	/// Stores a parsed `value` back into `element`.
	fn parse(&self, element: &mut Element, value: Value) -> Result<(), ContentError>;
}

/// Synthesizes a single child element.
pub trait SingleVirtualElement: Send + Sync {
	/// Produces the child from `parent`, or `None` to omit it.
	fn generate(&self, parent: &Element, metadata: &ElementMetadata) -> Option<Element>;

	/// Folds a parsed child back into `parent`.
	fn parse(
		&self,
		parent: &mut Element,
		element: Element,
		metadata: &ElementMetadata,
	) -> Result<(), ContentError>;
}

/// Synthesizes a run of child elements.
pub trait MultipleVirtualElement: Send + Sync {
	/// Produces the children from `parent`; an empty vector omits the slot.
	fn generate(&self, parent: &Element, metadata: &ElementMetadata) -> Vec<Element>;

	/// Folds every parsed child of the slot back into `parent` at once.
	fn parse(
		&self,
		parent: &mut Element,
		elements: Vec<Element>,
		metadata: &ElementMetadata,
	) -> Result<(), ContentError>;
}

/// A declared virtual-element generator of either arity.
#[derive(Clone)]
pub enum VirtualElement {
	Single(Arc<dyn SingleVirtualElement>),
	Multiple(Arc<dyn MultipleVirtualElement>),
}

impl VirtualElement {
	pub fn is_multiple(&self) -> bool {
		matches!(self, VirtualElement::Multiple(_))
	}
}

impl fmt::Debug for VirtualElement {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			VirtualElement::Single(_) => f.write_str("VirtualElement::Single"),
			VirtualElement::Multiple(_) => f.write_str("VirtualElement::Multiple"),
		}
	}
}
