//! Lock-protected builder state behind [`MetadataRegistry`].
//!
//! [`MetadataRegistry`]: super::MetadataRegistry

use gmodel_primitives::{ElementKey, ElementType, QName, RootKey};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::transform::{AttributeTransform, ElementTransform, TransformKey};

/// Scopes of one bucket, in first-declaration order.
pub(crate) type RootBuilder<S> = IndexMap<TransformKey, S>;

/// Accumulated declarations for one attribute scope.
#[derive(Debug, Clone, Default)]
pub(crate) struct AttributeCreatorState {
	pub(crate) transform: AttributeTransform,
}

impl AttributeCreatorState {
	pub(crate) fn merge(&mut self, later: &AttributeCreatorState) {
		self.transform.fields.merge(&later.transform.fields);
	}

	pub(crate) fn to_transform(&self) -> AttributeTransform {
		self.transform.clone()
	}
}

/// Accumulated declarations for one element scope.
#[derive(Debug, Clone, Default)]
pub(crate) struct ElementCreatorState {
	pub(crate) transform: ElementTransform,
	pub(crate) attribute_whitelist: Option<IndexSet<QName>>,
	pub(crate) element_whitelist: Option<IndexSet<QName>>,
}

impl ElementCreatorState {
	pub(crate) fn merge(&mut self, target: &ElementKey, later: &ElementCreatorState) {
		self.transform.merge(target, &later.transform);
		union_into(&mut self.attribute_whitelist, &later.attribute_whitelist);
		union_into(&mut self.element_whitelist, &later.element_whitelist);
	}

	pub(crate) fn to_transform(&self) -> ElementTransform {
		self.transform.clone()
	}

	pub(crate) fn has_whitelist(&self) -> bool {
		self.attribute_whitelist.is_some() || self.element_whitelist.is_some()
	}
}

fn union_into(into: &mut Option<IndexSet<QName>>, from: &Option<IndexSet<QName>>) {
	if let Some(from) = from {
		into.get_or_insert_with(IndexSet::new).extend(from.iter().cloned());
	}
}

/// Everything a registry has declared so far.
#[derive(Debug, Clone, Default)]
pub(crate) struct RegistryState {
	pub(crate) attributes: FxHashMap<RootKey, RootBuilder<AttributeCreatorState>>,
	pub(crate) elements: FxHashMap<RootKey, RootBuilder<ElementCreatorState>>,
	pub(crate) registered: FxHashSet<ElementType>,
}

impl RegistryState {
	/// Returns the state for an attribute scope, creating it on first use.
	pub(crate) fn attribute(&mut self, scope: &TransformKey) -> &mut AttributeCreatorState {
		self.attributes
			.entry(scope.root_key())
			.or_default()
			.entry(scope.clone())
			.or_default()
	}

	/// Returns the state for an element scope, creating it on first use.
	pub(crate) fn element(&mut self, scope: &TransformKey) -> &mut ElementCreatorState {
		self.elements
			.entry(scope.root_key())
			.or_default()
			.entry(scope.clone())
			.or_default()
	}

	/// Declares an empty attribute scope; returns false if it already existed.
	pub(crate) fn declare_attribute(&mut self, scope: &TransformKey) -> bool {
		let bucket = self.attributes.entry(scope.root_key()).or_default();
		if bucket.contains_key(scope) {
			return false;
		}
		bucket.insert(scope.clone(), AttributeCreatorState::default());
		true
	}

	/// Declares an empty element scope; returns false if it already existed.
	pub(crate) fn declare_element(&mut self, scope: &TransformKey) -> bool {
		let bucket = self.elements.entry(scope.root_key()).or_default();
		if bucket.contains_key(scope) {
			return false;
		}
		bucket.insert(scope.clone(), ElementCreatorState::default());
		true
	}

	/// Overlays another registry's declarations onto this one.
	pub(crate) fn merge(&mut self, other: &RegistryState) {
		for (root, bucket) in sorted(&other.attributes) {
			let mine = self.attributes.entry(root.clone()).or_default();
			for (scope, state) in bucket {
				mine.entry(scope.clone()).or_default().merge(state);
			}
		}
		for (root, bucket) in sorted(&other.elements) {
			let mine = self.elements.entry(root.clone()).or_default();
			for (scope, state) in bucket {
				let Some(target) = scope.element_key() else {
					continue;
				};
				mine.entry(scope.clone()).or_default().merge(target, state);
			}
		}
		self.registered.extend(other.registered.iter().copied());
	}

	/// Number of declared scopes across all buckets.
	pub(crate) fn scope_count(&self) -> (usize, usize) {
		(
			self.attributes.values().map(IndexMap::len).sum(),
			self.elements.values().map(IndexMap::len).sum(),
		)
	}
}

/// Buckets in `RootKey` order, for deterministic traversal.
pub(crate) fn sorted<S>(buckets: &FxHashMap<RootKey, RootBuilder<S>>) -> Vec<(&RootKey, &RootBuilder<S>)> {
	let mut out: Vec<_> = buckets.iter().collect();
	out.sort_by(|a, b| a.0.cmp(b.0));
	out
}
