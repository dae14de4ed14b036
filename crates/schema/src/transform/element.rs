use std::sync::Arc;

use gmodel_primitives::{AttributeKey, ElementKey, QName};
use indexmap::IndexMap;

use super::{Cardinality, DeclaredKeys, MetadataFields, Properties, TransformKey, differs};
use crate::validate::ElementValidator;
use crate::virtuals::{VirtualElement, VirtualValue};

/// Sparse metadata delta for an element.
#[derive(Clone, Default)]
pub struct ElementTransform {
	pub(crate) fields: MetadataFields,
	pub(crate) cardinality: Option<Cardinality>,
	pub(crate) content_required: Option<bool>,
	pub(crate) validator: Option<Arc<dyn ElementValidator>>,
	pub(crate) properties: Option<Properties>,
	pub(crate) virtual_element: Option<VirtualElement>,
	pub(crate) flattened: Option<bool>,
	pub(crate) moved: Option<bool>,
	pub(crate) attributes: DeclaredKeys<AttributeKey>,
	pub(crate) elements: DeclaredKeys<ElementKey>,
	pub(crate) adaptations: IndexMap<String, ElementKey>,
	pub(crate) source: Option<TransformKey>,
}

impl ElementTransform {
	/// Folds `parts` left to right over an empty transform, as bound to `target`.
	pub fn compose<'a>(
		target: &ElementKey,
		parts: impl IntoIterator<Item = &'a ElementTransform>,
	) -> Self {
		let mut out = Self::default();
		for part in parts {
			out.merge(target, part);
		}
		out
	}

	/// Overlays one later part onto this transform.
	pub(crate) fn merge(&mut self, target: &ElementKey, part: &ElementTransform) {
		self.fields.merge(&part.fields);
		if part.cardinality.is_some() {
			self.cardinality = part.cardinality;
		}
		if part.content_required.is_some() {
			self.content_required = part.content_required;
		}
		if part.validator.is_some() {
			self.validator.clone_from(&part.validator);
		}
		if part.properties.is_some() {
			self.properties.clone_from(&part.properties);
		}
		if part.virtual_element.is_some() {
			self.virtual_element.clone_from(&part.virtual_element);
		}
		if part.flattened.is_some() {
			self.flattened = part.flattened;
		}
		if part.moved.is_some() {
			self.moved = part.moved;
		}
		if part.source.is_some() {
			self.source.clone_from(&part.source);
		}
		self.attributes.merge(&part.attributes);
		self.elements.merge(&part.elements);
		for (kind, adapted) in &part.adaptations {
			match narrowing(target, adapted) {
				Narrowing::Strict => {
					self.adaptations.insert(kind.clone(), adapted.clone());
				}
				// A subtype binding also matches the supertype layer that adapts to it.
				Narrowing::Identity => {
					tracing::trace!(
						domain = "schema",
						key = %target,
						kind = %kind,
						"adaptation to the bound node type itself; skipped",
					);
				}
				Narrowing::Unrelated => {
					tracing::warn!(
						domain = "schema",
						key = %target,
						kind = %kind,
						adapted = %adapted,
						"adaptation does not narrow the bound node type; dropped",
					);
				}
			}
		}
	}

	/// Merges this relocated transform against the transform of its source.
	///
	/// Content-required always comes from `self`. Other scalar fields take
	/// this transform's value when set, the source's otherwise. Ordered maps
	/// keep the source's entries and shape, then append entries only this
	/// transform declares.
	pub fn merge_source(&self, source: &ElementTransform) -> ElementTransform {
		let mut adaptations = source.adaptations.clone();
		for (kind, adapted) in &self.adaptations {
			if !adaptations.contains_key(kind) {
				adaptations.insert(kind.clone(), adapted.clone());
			}
		}
		ElementTransform {
			fields: self.fields.or(&source.fields),
			cardinality: self.cardinality.or(source.cardinality),
			content_required: self.content_required,
			validator: self.validator.clone().or_else(|| source.validator.clone()),
			properties: self.properties.clone().or_else(|| source.properties.clone()),
			virtual_element: self
				.virtual_element
				.clone()
				.or_else(|| source.virtual_element.clone()),
			flattened: self.flattened.or(source.flattened),
			moved: self.moved,
			attributes: DeclaredKeys::merge_source(&source.attributes, &self.attributes),
			elements: DeclaredKeys::merge_source(&source.elements, &self.elements),
			adaptations,
			source: self.source.clone(),
		}
	}

	/// Keeps only adaptations that narrow `target` to a strict subtype.
	pub(crate) fn adaptations_for(&self, target: &ElementKey) -> IndexMap<String, ElementKey> {
		self.adaptations
			.iter()
			.filter(|(_, adapted)| narrowing(target, adapted) == Narrowing::Strict)
			.map(|(kind, adapted)| (kind.clone(), adapted.clone()))
			.collect()
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

	pub fn cardinality(&self) -> Option<Cardinality> {
		self.cardinality
	}

	pub fn content_required(&self) -> Option<bool> {
		self.content_required
	}

	pub fn flattened(&self) -> Option<bool> {
		self.flattened
	}

	pub fn moved(&self) -> Option<bool> {
		self.moved
	}

	pub fn attributes(&self) -> &DeclaredKeys<AttributeKey> {
		&self.attributes
	}

	pub fn elements(&self) -> &DeclaredKeys<ElementKey> {
		&self.elements
	}

	pub fn adaptations(&self) -> &IndexMap<String, ElementKey> {
		&self.adaptations
	}

	pub fn source(&self) -> Option<&TransformKey> {
		self.source.as_ref()
	}

	pub(crate) fn differing(&self, other: &ElementTransform) -> Vec<&'static str> {
		let mut out = self.fields.differing(&other.fields);
		if differs(&self.cardinality, &other.cardinality) {
			out.push("cardinality");
		}
		if differs(&self.content_required, &other.content_required) {
			out.push("content_required");
		}
		if differs(&self.flattened, &other.flattened) {
			out.push("flattened");
		}
		out
	}
}

/// How an adaptation's node type relates to the bound key's node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Narrowing {
	Strict,
	Identity,
	Unrelated,
}

pub(crate) fn narrowing(target: &ElementKey, adapted: &ElementKey) -> Narrowing {
	let bound = target.element_type();
	if bound == adapted.element_type() {
		Narrowing::Identity
	} else if bound.is_strict_supertype_of(adapted.element_type()) {
		Narrowing::Strict
	} else {
		Narrowing::Unrelated
	}
}

impl std::fmt::Debug for ElementTransform {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ElementTransform")
			.field("fields", &self.fields)
			.field("cardinality", &self.cardinality)
			.field("content_required", &self.content_required)
			.field("validator", &self.validator.is_some())
			.field("properties", &self.properties.is_some())
			.field("virtual_element", &self.virtual_element)
			.field("flattened", &self.flattened)
			.field("moved", &self.moved)
			.field("attributes", &self.attributes)
			.field("elements", &self.elements)
			.field("adaptations", &self.adaptations)
			.field("source", &self.source)
			.finish()
	}
}
