//! Declaration handles returned by [`MetadataRegistry`].
//!
//! A creator names one exact `(parent, key, context)` scope. Every setter
//! takes the registry lock for the duration of a single field update and
//! marks the registry dirty, so creators can be held and used from any
//! thread while declarations are being made.

use std::sync::Arc;

use gmodel_primitives::{AttributeKey, ElementKey, MetadataContext, QName};
use indexmap::IndexSet;

use super::MetadataRegistry;
use super::state::{AttributeCreatorState, ElementCreatorState};
use crate::transform::{Cardinality, Properties, TransformKey};
use crate::validate::ElementValidator;
use crate::virtuals::{MultipleVirtualElement, SingleVirtualElement, VirtualElement, VirtualValue};

/// Declares metadata for one attribute scope.
#[derive(Clone)]
pub struct AttributeCreator<'r> {
	registry: &'r MetadataRegistry,
	scope: TransformKey,
}

/// Declares metadata for one element scope.
#[derive(Clone)]
pub struct ElementCreator<'r> {
	registry: &'r MetadataRegistry,
	scope: TransformKey,
	element: ElementKey,
}

impl<'r> AttributeCreator<'r> {
	pub(super) fn new(registry: &'r MetadataRegistry, scope: TransformKey) -> Self {
		registry.with_state_if(|state| state.declare_attribute(&scope));
		Self { registry, scope }
	}

	/// The exact scope this creator declares.
	pub fn scope(&self) -> &TransformKey {
		&self.scope
	}

	fn update(&self, f: impl FnOnce(&mut AttributeCreatorState)) -> &Self {
		self.registry.with_state(|state| f(state.attribute(&self.scope)));
		self
	}
}

impl<'r> ElementCreator<'r> {
	pub(super) fn new(registry: &'r MetadataRegistry, scope: TransformKey, element: ElementKey) -> Self {
		registry.with_state_if(|state| state.declare_element(&scope));
		Self {
			registry,
			scope,
			element,
		}
	}

	/// The exact scope this creator declares.
	pub fn scope(&self) -> &TransformKey {
		&self.scope
	}

	/// The element key this creator declares metadata for.
	pub fn key(&self) -> &ElementKey {
		&self.element
	}

	fn update(&self, f: impl FnOnce(&mut ElementCreatorState)) -> &Self {
		self.registry.with_state(|state| f(state.element(&self.scope)));
		self
	}

	pub fn set_cardinality(&self, cardinality: Cardinality) -> &Self {
		self.update(|s| s.transform.cardinality = Some(cardinality))
	}

	/// Requires the element to carry text content.
	pub fn set_content_required(&self, required: bool) -> &Self {
		self.update(|s| s.transform.content_required = Some(required))
	}

	pub fn set_validator(&self, validator: impl ElementValidator + 'static) -> &Self {
		let validator: Arc<dyn ElementValidator> = Arc::new(validator);
		self.update(|s| s.transform.validator = Some(validator))
	}

	/// Attaches opaque wire-format properties.
	pub fn set_properties<P: std::any::Any + Send + Sync>(&self, properties: P) -> &Self {
		let properties: Properties = Arc::new(properties);
		self.update(|s| s.transform.properties = Some(properties))
	}

	/// Makes this element a single virtual slot.
	pub fn set_virtual_element(&self, generator: impl SingleVirtualElement + 'static) -> &Self {
		let generator = VirtualElement::Single(Arc::new(generator));
		self.update(|s| s.transform.virtual_element = Some(generator))
	}

	/// Makes this element a multiple virtual slot.
	///
	/// Declares [`Cardinality::Multiple`] unless a cardinality is already set.
	pub fn set_multiple_virtual_element(
		&self,
		generator: impl MultipleVirtualElement + 'static,
	) -> &Self {
		let generator = VirtualElement::Multiple(Arc::new(generator));
		self.update(|s| {
			s.transform.virtual_element = Some(generator);
			s.transform.cardinality.get_or_insert(Cardinality::Multiple);
		})
	}

	/// Lifts the element's content into its parent when generating.
	pub fn flatten(&self) -> &Self {
		self.update(|s| s.transform.flattened = Some(true))
	}

	/// Declares `key` as the last attribute, moving it if already declared.
	pub fn add_attribute(&self, key: &AttributeKey) -> AttributeCreator<'r> {
		self.update(|s| s.transform.attributes.add(key.clone()));
		self.registry
			.build_attribute(Some(&self.element), key, self.scope.context())
	}

	/// Declares `key` in place of an attribute of the same name.
	pub fn replace_attribute(&self, key: &AttributeKey) -> AttributeCreator<'r> {
		self.update(|s| s.transform.attributes.replace(key.clone()));
		self.registry
			.build_attribute(Some(&self.element), key, self.scope.context())
	}

	/// Declares `key` as the last child element, moving it if already declared.
	///
	/// The child's node type is registered with the registry.
	pub fn add_element(&self, key: &ElementKey) -> ElementCreator<'r> {
		self.update(|s| s.transform.elements.add(key.clone()));
		self.child(key)
	}

	/// Declares `key` in place of a child element of the same name.
	pub fn replace_element(&self, key: &ElementKey) -> ElementCreator<'r> {
		self.update(|s| s.transform.elements.replace(key.clone()));
		self.child(key)
	}

	fn child(&self, key: &ElementKey) -> ElementCreator<'r> {
		self.registry.register(key.element_type());
		self.registry
			.build_element(Some(&self.element), key, self.scope.context())
	}

	/// Narrows this element to `adapted` when parsing meets discriminator `kind`.
	///
	/// Adaptations that do not name a strict subtype of the bound key's node
	/// type are dropped when the schema resolves them.
	pub fn adapt(&self, kind: &str, adapted: &ElementKey) -> &Self {
		self.update(|s| {
			s.transform
				.adaptations
				.insert(kind.to_string(), adapted.clone());
		});
		self.registry.register(adapted.element_type());
		self
	}

	/// Keeps only the named attributes visible once the schema is frozen.
	pub fn whitelist_attributes<'k>(&self, keys: impl IntoIterator<Item = &'k AttributeKey>) -> &Self {
		let ids: Vec<QName> = keys.into_iter().map(|k| k.id().clone()).collect();
		self.update(|s| {
			s.attribute_whitelist
				.get_or_insert_with(IndexSet::new)
				.extend(ids);
		})
	}

	/// Keeps only the named child elements visible once the schema is frozen.
	pub fn whitelist_elements<'k>(&self, keys: impl IntoIterator<Item = &'k ElementKey>) -> &Self {
		let ids: Vec<QName> = keys.into_iter().map(ElementKey::name).collect();
		self.update(|s| {
			s.element_whitelist
				.get_or_insert_with(IndexSet::new)
				.extend(ids);
		})
	}

	/// Declares each attribute hidden in this scope.
	pub fn blacklist_attributes<'k>(&self, keys: impl IntoIterator<Item = &'k AttributeKey>) -> &Self {
		for key in keys {
			self.replace_attribute(key).set_visible(false);
		}
		self
	}

	/// Declares each child element hidden in this scope.
	pub fn blacklist_elements<'k>(&self, keys: impl IntoIterator<Item = &'k ElementKey>) -> &Self {
		for key in keys {
			self.update(|s| s.transform.elements.replace(key.clone()));
			self.registry
				.build_element(Some(&self.element), key, self.scope.context())
				.set_visible(false);
		}
		self
	}

	/// Hides this scope at its declared location.
	pub fn moved(&self) -> &Self {
		self.update(|s| s.transform.moved = Some(true))
	}

	/// Relocates the element declared at the source scope to this scope.
	///
	/// The source is marked moved. At bind time this scope's metadata is
	/// merged against the source's, keeping the source's child ordering.
	pub fn move_from(
		&self,
		parent: Option<&ElementKey>,
		key: &ElementKey,
		context: Option<&MetadataContext>,
	) -> &Self {
		let source = TransformKey::element(parent, key, context);
		self.update(|s| s.transform.source = Some(source));
		self.registry.build_element(parent, key, context).moved();
		self
	}
}

macro_rules! shared_setters {
	($creator:ident) => {
		impl $creator<'_> {
			/// Overrides the bound name used on the wire.
			pub fn set_name(&self, name: QName) -> &Self {
				self.update(|s| s.transform.fields.name = Some(name))
			}

			pub fn set_required(&self, required: bool) -> &Self {
				self.update(|s| s.transform.fields.required = Some(required))
			}

			pub fn set_visible(&self, visible: bool) -> &Self {
				self.update(|s| s.transform.fields.visible = Some(visible))
			}

			/// Computes the content from elsewhere in the document.
			pub fn set_virtual_value(&self, generator: impl VirtualValue + 'static) -> &Self {
				let generator: Arc<dyn VirtualValue> = Arc::new(generator);
				self.update(|s| s.transform.fields.virtual_value = Some(generator))
			}
		}
	};
}

shared_setters!(AttributeCreator);
shared_setters!(ElementCreator);
