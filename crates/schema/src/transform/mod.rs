//! Immutable, sparse metadata deltas.
//!
//! # Purpose
//!
//! A transform records what one declaration overrides for one scope. Every
//! field is optional; `None` means "not overridden here". Resolution folds
//! the transforms matching a request into a single composite.
//!
//! # Composition
//!
//! Folding is strictly left to right, starting from an empty transform:
//!
//! - scalar fields: a later `Some` overwrites an earlier value;
//! - ordered key lists: an [`Action::Add`] entry is removed from its old
//!   position and appended, so "add" always means "now last"; an
//!   [`Action::Replace`] entry keeps the existing position;
//! - adaptations: a later entry for the same kind wins only if it narrows the
//!   bound key's node type to a strict subtype; other entries are dropped.
//!
//! Relocated transforms are merged against their source with different
//! rules, see [`ElementTransform::merge_source`].
//!
//! # Invariants
//!
//! - ADD repositions, REPLACE preserves position.
//!   - Enforced in: [`DeclaredKeys::add`], [`DeclaredKeys::replace`].
//!   - Tested by: `transform::tests::test_add_moves_to_end`, `prop_add_then_replace_order`.
//!   - Failure symptom: attributes and children serialize in the wrong order.
//! - Content-required is never inherited from a relocation source.
//!   - Enforced in: [`ElementTransform::merge_source`].
//!   - Tested by: `transform::tests::test_merge_source_content_required_not_inherited`.

use std::any::Any;
use std::sync::Arc;

use gmodel_primitives::{AttributeKey, ElementKey, QName};
use indexmap::IndexMap;

mod attribute;
mod conflict;
mod element;
mod key;

pub use attribute::AttributeTransform;
pub(crate) use conflict::report_conflicts;
pub use element::ElementTransform;
pub(crate) use element::{Narrowing, narrowing};
pub use key::TransformKey;

use crate::virtuals::VirtualValue;

#[cfg(test)]
mod tests;

/// Opaque wire-format properties attached to an element declaration.
pub type Properties = Arc<dyn Any + Send + Sync>;

/// How a declared key enters an ordered key list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
	/// Move (or append) the key to the end.
	Add,
	/// Swap the key in place, or append it if absent.
	Replace,
}

/// How many instances of an element a parent may hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Cardinality {
	#[default]
	Single,
	Multiple,
	Set,
}

impl Cardinality {
	pub fn is_multiple(self) -> bool {
		!matches!(self, Cardinality::Single)
	}
}

/// Keys that can appear in a declared key list, identified by name.
pub trait DeclaredKey: Clone {
	fn declared_id(&self) -> QName;
}

impl DeclaredKey for AttributeKey {
	fn declared_id(&self) -> QName {
		self.id().clone()
	}
}

impl DeclaredKey for ElementKey {
	fn declared_id(&self) -> QName {
		self.name()
	}
}

/// One entry of a declared key list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declared<K> {
	pub key: K,
	pub action: Action,
}

/// Ordered child-key declarations, keyed by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredKeys<K> {
	entries: IndexMap<QName, Declared<K>>,
}

impl<K> Default for DeclaredKeys<K> {
	fn default() -> Self {
		Self {
			entries: IndexMap::new(),
		}
	}
}

impl<K: DeclaredKey> DeclaredKeys<K> {
	/// Moves `key` to the end, appending it if it was absent.
	pub fn add(&mut self, key: K) {
		let id = key.declared_id();
		self.entries.shift_remove(&id);
		self.entries.insert(id, Declared {
			key,
			action: Action::Add,
		});
	}

	/// Swaps `key` in at the position of the same name, or appends it.
	pub fn replace(&mut self, key: K) {
		let id = key.declared_id();
		let entry = Declared {
			key,
			action: Action::Replace,
		};
		match self.entries.get_mut(&id) {
			Some(slot) => *slot = entry,
			None => {
				self.entries.insert(id, entry);
			}
		}
	}

	fn apply(&mut self, declared: &Declared<K>) {
		match declared.action {
			Action::Add => self.add(declared.key.clone()),
			Action::Replace => self.replace(declared.key.clone()),
		}
	}

	/// Applies every entry of a later layer in its order.
	pub fn merge(&mut self, later: &DeclaredKeys<K>) {
		for declared in later.entries.values() {
			self.apply(declared);
		}
	}

	/// Source entries first, then relocated entries the source lacks.
	pub fn merge_source(source: &DeclaredKeys<K>, moved: &DeclaredKeys<K>) -> DeclaredKeys<K> {
		let mut out = source.clone();
		for (id, declared) in &moved.entries {
			if !out.entries.contains_key(id) {
				out.entries.insert(id.clone(), declared.clone());
			}
		}
		out
	}

	pub fn get(&self, id: &QName) -> Option<&K> {
		self.entries.get(id).map(|d| &d.key)
	}

	pub fn contains(&self, id: &QName) -> bool {
		self.entries.contains_key(id)
	}

	pub fn keys(&self) -> impl Iterator<Item = &K> {
		self.entries.values().map(|d| &d.key)
	}

	pub fn entries(&self) -> impl Iterator<Item = (&QName, &Declared<K>)> {
		self.entries.iter()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Fields shared by attribute and element transforms.
#[derive(Clone, Default)]
pub(crate) struct MetadataFields {
	pub(crate) name: Option<QName>,
	pub(crate) required: Option<bool>,
	pub(crate) visible: Option<bool>,
	pub(crate) virtual_value: Option<Arc<dyn VirtualValue>>,
}

impl MetadataFields {
	/// Overwrites every field `later` sets.
	pub(crate) fn merge(&mut self, later: &MetadataFields) {
		if later.name.is_some() {
			self.name.clone_from(&later.name);
		}
		if later.required.is_some() {
			self.required = later.required;
		}
		if later.visible.is_some() {
			self.visible = later.visible;
		}
		if later.virtual_value.is_some() {
			self.virtual_value.clone_from(&later.virtual_value);
		}
	}

	/// Own fields where set, `fallback`'s otherwise.
	pub(crate) fn or(&self, fallback: &MetadataFields) -> MetadataFields {
		MetadataFields {
			name: self.name.clone().or_else(|| fallback.name.clone()),
			required: self.required.or(fallback.required),
			visible: self.visible.or(fallback.visible),
			virtual_value: self
				.virtual_value
				.clone()
				.or_else(|| fallback.virtual_value.clone()),
		}
	}

	/// Names of scalar fields both set to different values.
	pub(crate) fn differing(&self, other: &MetadataFields) -> Vec<&'static str> {
		let mut out = Vec::new();
		if differs(&self.name, &other.name) {
			out.push("name");
		}
		if differs(&self.required, &other.required) {
			out.push("required");
		}
		if differs(&self.visible, &other.visible) {
			out.push("visible");
		}
		out
	}
}

pub(crate) fn differs<T: PartialEq>(a: &Option<T>, b: &Option<T>) -> bool {
	matches!((a, b), (Some(x), Some(y)) if x != y)
}

impl std::fmt::Debug for MetadataFields {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MetadataFields")
			.field("name", &self.name)
			.field("required", &self.required)
			.field("visible", &self.visible)
			.field("virtual_value", &self.virtual_value.is_some())
			.finish()
	}
}
