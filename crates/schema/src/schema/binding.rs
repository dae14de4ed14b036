//! Resolved metadata records shared by every handle bound to one request.

use std::sync::Arc;

use gmodel_primitives::{AttributeKey, ElementKey, QName};
use indexmap::IndexMap;

use crate::transform::{AttributeTransform, Cardinality, ElementTransform, TransformKey};

pub(crate) struct AttributeBinding {
	pub(crate) scope: TransformKey,
	pub(crate) key: AttributeKey,
	pub(crate) transform: Arc<AttributeTransform>,
	pub(crate) declared: bool,
	pub(crate) name: QName,
	pub(crate) required: bool,
	pub(crate) visible: bool,
}

impl AttributeBinding {
	pub(crate) fn new(
		scope: TransformKey,
		key: AttributeKey,
		transform: Arc<AttributeTransform>,
		declared: bool,
	) -> Self {
		Self {
			name: transform.name().cloned().unwrap_or_else(|| key.id().clone()),
			required: transform.required().unwrap_or(false),
			visible: transform.visible().unwrap_or(true),
			scope,
			key,
			transform,
			declared,
		}
	}
}

pub(crate) struct ElementBinding {
	pub(crate) scope: TransformKey,
	pub(crate) key: ElementKey,
	pub(crate) transform: Arc<ElementTransform>,
	pub(crate) declared: bool,
	pub(crate) name: QName,
	pub(crate) required: bool,
	pub(crate) visible: bool,
	pub(crate) moved: bool,
	pub(crate) cardinality: Cardinality,
	pub(crate) content_required: bool,
	pub(crate) flattened: bool,
	pub(crate) attributes: Vec<AttributeKey>,
	pub(crate) elements: Vec<ElementKey>,
	pub(crate) adaptations: IndexMap<String, ElementKey>,
}

impl ElementBinding {
	pub(crate) fn new(
		scope: TransformKey,
		key: ElementKey,
		transform: Arc<ElementTransform>,
		declared: bool,
	) -> Self {
		let moved = transform.moved().unwrap_or(false);
		Self {
			name: transform.name().cloned().unwrap_or_else(|| key.name()),
			required: transform.required().unwrap_or(false),
			visible: !moved && transform.visible().unwrap_or(true),
			moved,
			cardinality: transform.cardinality().unwrap_or_default(),
			content_required: transform.content_required().unwrap_or(false),
			flattened: transform.flattened().unwrap_or(false),
			attributes: transform.attributes().keys().cloned().collect(),
			elements: transform.elements().keys().cloned().collect(),
			adaptations: transform.adaptations_for(&key),
			scope,
			key,
			transform,
			declared,
		}
	}
}
