//! Snapshotting builder state into an immutable schema.
//!
//! Runs under the registry lock. Builder state is only read: transforms are
//! copied out, then validated and finalized in the copies.

use std::sync::Arc;

use gmodel_primitives::{AttributeKey, ElementKey, QName, RootKey};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use super::state::{ElementCreatorState, RegistryState, RootBuilder, sorted};
use crate::config::SchemaConfig;
use crate::error::SchemaError;
use crate::schema::SchemaInner;
use crate::transform::{AttributeTransform, Cardinality, ElementTransform, TransformKey};
use crate::virtuals::VirtualElement;

type Frozen<T> = FxHashMap<RootKey, IndexMap<TransformKey, T>>;

pub(super) fn freeze(state: &RegistryState, config: SchemaConfig) -> Result<SchemaInner, SchemaError> {
	let mut attributes: Frozen<AttributeTransform> = copy(&state.attributes, |s| s.to_transform());
	let mut elements: Frozen<ElementTransform> = copy(&state.elements, |s| s.to_transform());

	for (_, bucket) in sorted(&state.elements) {
		for (scope, creator) in bucket {
			check_virtual(scope, &creator.transform)?;
			check_relocation(state, scope, creator)?;
			if creator.has_whitelist() {
				finalize_whitelists(bucket, scope, creator, &mut attributes, &mut elements)?;
			}
		}
	}

	Ok(SchemaInner::new(share(attributes), share(elements), config))
}

fn copy<S, T>(buckets: &FxHashMap<RootKey, RootBuilder<S>>, f: impl Fn(&S) -> T) -> Frozen<T> {
	buckets
		.iter()
		.map(|(root, bucket)| {
			let frozen = bucket.iter().map(|(scope, s)| (scope.clone(), f(s))).collect();
			(root.clone(), frozen)
		})
		.collect()
}

fn share<T>(buckets: Frozen<T>) -> FxHashMap<RootKey, IndexMap<TransformKey, Arc<T>>> {
	buckets
		.into_iter()
		.map(|(root, bucket)| {
			let shared = bucket.into_iter().map(|(scope, t)| (scope, Arc::new(t))).collect();
			(root, shared)
		})
		.collect()
}

fn check_virtual(scope: &TransformKey, transform: &ElementTransform) -> Result<(), SchemaError> {
	let mismatch = match (&transform.virtual_element, transform.cardinality) {
		(Some(VirtualElement::Single(_)), Some(c)) if c.is_multiple() => Some((c, false)),
		(Some(VirtualElement::Multiple(_)), Some(Cardinality::Single)) => Some((Cardinality::Single, true)),
		_ => None,
	};
	match mismatch {
		Some((cardinality, multiple)) => Err(SchemaError::VirtualCardinality {
			scope: scope.clone(),
			cardinality,
			multiple,
		}),
		None => Ok(()),
	}
}

/// Follows exact relocation sources from `scope` and rejects loops.
fn check_relocation(
	state: &RegistryState,
	scope: &TransformKey,
	creator: &ElementCreatorState,
) -> Result<(), SchemaError> {
	let mut path = vec![scope.clone()];
	let mut next = creator.transform.source.clone();
	while let Some(source) = next {
		if path.contains(&source) {
			path.push(source);
			return Err(SchemaError::RelocationCycle { path });
		}
		next = state
			.elements
			.get(&source.root_key())
			.and_then(|bucket| bucket.get(&source))
			.and_then(|s| s.transform.source.clone());
		path.push(source);
	}
	Ok(())
}

/// Hides every child key that matching scopes declare but the whitelist omits.
fn finalize_whitelists(
	bucket: &RootBuilder<ElementCreatorState>,
	scope: &TransformKey,
	creator: &ElementCreatorState,
	attributes: &mut Frozen<AttributeTransform>,
	elements: &mut Frozen<ElementTransform>,
) -> Result<(), SchemaError> {
	let Some(target) = scope.element_key() else {
		return Ok(());
	};

	let mut declared_attributes: IndexMap<QName, AttributeKey> = IndexMap::new();
	let mut declared_elements: IndexMap<QName, ElementKey> = IndexMap::new();
	for (stored, other) in bucket {
		if !stored.matches(scope) {
			continue;
		}
		for (id, declared) in other.transform.attributes.entries() {
			declared_attributes
				.entry(id.clone())
				.or_insert_with(|| declared.key.clone());
		}
		for (id, declared) in other.transform.elements.entries() {
			declared_elements
				.entry(id.clone())
				.or_insert_with(|| declared.key.clone());
		}
	}

	if let Some(whitelist) = &creator.attribute_whitelist {
		if let Some(missing) = whitelist.iter().find(|id| !declared_attributes.contains_key(*id)) {
			return Err(SchemaError::UndeclaredWhitelistAttribute {
				scope: scope.clone(),
				attribute: missing.clone(),
			});
		}
		for (id, key) in &declared_attributes {
			if !whitelist.contains(id) {
				let child = TransformKey::attribute(Some(target), key, scope.context());
				hide(attributes, child, |t: &mut AttributeTransform| t.fields.visible = Some(false));
			}
		}
	}

	if let Some(whitelist) = &creator.element_whitelist {
		if let Some(missing) = whitelist.iter().find(|id| !declared_elements.contains_key(*id)) {
			return Err(SchemaError::UndeclaredWhitelistElement {
				scope: scope.clone(),
				element: missing.clone(),
			});
		}
		for (id, key) in &declared_elements {
			if !whitelist.contains(id) {
				let child = TransformKey::element(Some(target), key, scope.context());
				hide(elements, child, |t: &mut ElementTransform| t.fields.visible = Some(false));
			}
		}
	}
	Ok(())
}

/// Applies `f` to the transform at `child`, in place when it is already
/// declared and as the last declaration of its bucket otherwise.
fn hide<T: Default>(buckets: &mut Frozen<T>, child: TransformKey, f: impl FnOnce(&mut T)) {
	let bucket = buckets.entry(child.root_key()).or_default();
	match bucket.get_mut(&child) {
		Some(transform) => f(transform),
		None => {
			let mut transform = T::default();
			f(&mut transform);
			bucket.insert(child, transform);
		}
	}
}
