//! Frozen schemas and metadata resolution.
//!
//! # Purpose
//!
//! A [`Schema`] is an immutable snapshot of a registry. Binding a request
//! `(parent, key, context)` scans the one bucket the key's [`RootKey`] names,
//! folds every stored transform whose scope matches the request, and wraps the
//! result into bound metadata.
//!
//! # Resolution order
//!
//! Matching transforms are folded in declaration order within the bucket,
//! not by specificity. When two matching scopes are unordered (neither
//! matches the other) and disagree on a field, the later declaration wins and
//! a warning is logged if `warn-on-conflicts` is enabled.
//!
//! # Invariants
//!
//! - Binding the same request twice yields the same instance.
//!   - Enforced in: `BindingCache::insert_if_absent`.
//!   - Tested by: `schema::tests::test_bind_is_cached`, `tests/concurrency.rs`.
//!   - Failure symptom: callers comparing metadata by identity disagree.
//! - Caching never changes observable metadata.
//!   - Enforced in: [`SchemaConfig::cache_bindings`] gates only lookup and insert.
//!   - Tested by: `tests/cascade.rs::test_cache_disabled_matches_cached`.
//!   - Failure symptom: results depend on request history.
//! - Lookup misses bind to permissive undeclared metadata, never an error.
//!   - Enforced in: `SchemaInner::element_binding`, `SchemaInner::attribute_binding`.
//!   - Tested by: `schema::tests::test_unknown_root_is_undeclared`.
//!
//! [`RootKey`]: gmodel_primitives::RootKey

use std::sync::Arc;

use gmodel_primitives::{AttributeKey, ElementKey, MetadataContext, MetadataKey, RootKey};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;

mod binding;
mod cache;

pub(crate) use binding::{AttributeBinding, ElementBinding};
use cache::BindingCache;

use crate::config::SchemaConfig;
use crate::metadata::{AttributeMetadata, ElementMetadata};
use crate::transform::{AttributeTransform, ElementTransform, TransformKey, report_conflicts};

#[cfg(test)]
mod tests;

/// Frozen transforms of one bucket plus their binding cache.
struct RootRegistry<T, B> {
	transforms: IndexMap<TransformKey, Arc<T>>,
	cache: BindingCache<B>,
}

impl<T, B> RootRegistry<T, B> {
	fn new(transforms: IndexMap<TransformKey, Arc<T>>, config: SchemaConfig) -> Self {
		Self {
			transforms,
			cache: BindingCache::new(config.cache_bindings),
		}
	}

	/// Stored transforms whose scope applies to `scope`, in declaration order.
	fn matching(&self, scope: &TransformKey) -> Vec<(&TransformKey, &Arc<T>)> {
		self.transforms
			.iter()
			.filter(|(stored, _)| stored.matches(scope))
			.collect()
	}
}

pub(crate) struct SchemaInner {
	attributes: FxHashMap<RootKey, RootRegistry<AttributeTransform, AttributeBinding>>,
	elements: FxHashMap<RootKey, RootRegistry<ElementTransform, ElementBinding>>,
	undeclared_attributes: BindingCache<AttributeBinding>,
	undeclared_elements: BindingCache<ElementBinding>,
	empty_attribute: Arc<AttributeTransform>,
	empty_element: Arc<ElementTransform>,
	config: SchemaConfig,
}

impl SchemaInner {
	pub(crate) fn new(
		attributes: FxHashMap<RootKey, IndexMap<TransformKey, Arc<AttributeTransform>>>,
		elements: FxHashMap<RootKey, IndexMap<TransformKey, Arc<ElementTransform>>>,
		config: SchemaConfig,
	) -> Self {
		Self {
			attributes: attributes
				.into_iter()
				.map(|(root, bucket)| (root, RootRegistry::new(bucket, config)))
				.collect(),
			elements: elements
				.into_iter()
				.map(|(root, bucket)| (root, RootRegistry::new(bucket, config)))
				.collect(),
			undeclared_attributes: BindingCache::new(config.cache_bindings),
			undeclared_elements: BindingCache::new(config.cache_bindings),
			empty_attribute: Arc::default(),
			empty_element: Arc::default(),
			config,
		}
	}

	fn attribute_binding(&self, scope: &TransformKey, key: &AttributeKey) -> Arc<AttributeBinding> {
		let registry = self.attributes.get(&scope.root_key());
		let cache = registry.map_or(&self.undeclared_attributes, |r| &r.cache);
		if let Some(hit) = cache.get(scope) {
			return hit;
		}
		tracing::trace!(domain = "schema", scope = %scope, "binding cache miss");

		let parts = registry.map(|r| r.matching(scope)).unwrap_or_default();
		let (transform, declared) = match parts.as_slice() {
			[] => (Arc::clone(&self.empty_attribute), false),
			[(_, only)] => (Arc::clone(only), true),
			parts => {
				if self.config.warn_on_conflicts {
					let pairs: Vec<_> = parts.iter().map(|&(k, t)| (k, &**t)).collect();
					report_conflicts(scope, &pairs);
				}
				let composite = AttributeTransform::compose(parts.iter().map(|&(_, t)| &**t));
				(Arc::new(composite), true)
			}
		};
		let binding = AttributeBinding::new(scope.clone(), key.clone(), transform, declared);
		cache.insert_if_absent(scope, Arc::new(binding))
	}

	fn element_binding(&self, scope: &TransformKey, key: &ElementKey) -> Arc<ElementBinding> {
		let registry = self.elements.get(&scope.root_key());
		let cache = registry.map_or(&self.undeclared_elements, |r| &r.cache);
		if let Some(hit) = cache.get(scope) {
			return hit;
		}
		tracing::trace!(domain = "schema", scope = %scope, "binding cache miss");

		let mut visiting = Vec::new();
		let binding = match self.effective_element(scope, key, &mut visiting) {
			Some(transform) => ElementBinding::new(scope.clone(), key.clone(), transform, true),
			None => ElementBinding::new(scope.clone(), key.clone(), Arc::clone(&self.empty_element), false),
		};
		cache.insert_if_absent(scope, Arc::new(binding))
	}

	/// Composite transform for an element request, merged against its
	/// relocation source. `None` when nothing matches.
	fn effective_element(
		&self,
		scope: &TransformKey,
		key: &ElementKey,
		visiting: &mut Vec<TransformKey>,
	) -> Option<Arc<ElementTransform>> {
		let registry = self.elements.get(&scope.root_key())?;
		let parts = registry.matching(scope);
		let mut transform = match parts.as_slice() {
			[] => return None,
			[(_, only)] => Arc::clone(only),
			parts => {
				if self.config.warn_on_conflicts {
					let pairs: Vec<_> = parts.iter().map(|&(k, t)| (k, &**t)).collect();
					report_conflicts(scope, &pairs);
				}
				Arc::new(ElementTransform::compose(key, parts.iter().map(|&(_, t)| &**t)))
			}
		};

		if let Some(source) = transform.source().cloned() {
			if source == *scope || visiting.contains(&source) {
				tracing::warn!(
					domain = "schema",
					scope = %scope,
					source = %source,
					"relocation source loops back; not followed",
				);
				return Some(transform);
			}
			let Some(source_key) = source.element_key().cloned() else {
				return Some(transform);
			};
			visiting.push(scope.clone());
			if let Some(resolved) = self.effective_element(&source, &source_key, visiting) {
				transform = Arc::new(transform.merge_source(&resolved));
			}
			visiting.pop();
		}
		Some(transform)
	}
}

/// An immutable snapshot of declared metadata.
///
/// Cheap to clone; clones share bindings and caches.
#[derive(Clone)]
pub struct Schema {
	inner: Arc<SchemaInner>,
}

impl Schema {
	pub(crate) fn from_inner(inner: Arc<SchemaInner>) -> Self {
		Self { inner }
	}

	/// Returns true if both handles refer to the same frozen snapshot.
	pub fn ptr_eq(&self, other: &Schema) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}

	pub fn config(&self) -> SchemaConfig {
		self.inner.config
	}

	/// Resolves metadata for an attribute.
	pub fn bind_attribute(
		&self,
		parent: Option<&ElementKey>,
		key: &AttributeKey,
		context: Option<&MetadataContext>,
	) -> AttributeMetadata {
		let scope = TransformKey::attribute(parent, key, context);
		AttributeMetadata::new(self.clone(), self.inner.attribute_binding(&scope, key))
	}

	/// Resolves metadata for an element.
	pub fn bind_element(
		&self,
		parent: Option<&ElementKey>,
		key: &ElementKey,
		context: Option<&MetadataContext>,
	) -> ElementMetadata {
		let scope = TransformKey::element(parent, key, context);
		ElementMetadata::new(self.clone(), self.inner.element_binding(&scope, key))
	}

	/// Resolves metadata for either kind of key.
	pub fn bind(
		&self,
		parent: Option<&ElementKey>,
		key: &MetadataKey,
		context: Option<&MetadataContext>,
	) -> Metadata {
		match key {
			MetadataKey::Attribute(k) => Metadata::Attribute(self.bind_attribute(parent, k, context)),
			MetadataKey::Element(k) => Metadata::Element(self.bind_element(parent, k, context)),
		}
	}

	/// The frozen attribute transform stored at exactly `scope`.
	pub fn attribute_transform(&self, scope: &TransformKey) -> Option<&AttributeTransform> {
		let registry = self.inner.attributes.get(&scope.root_key())?;
		registry.transforms.get(scope).map(|t| &**t)
	}

	/// The frozen element transform stored at exactly `scope`.
	pub fn element_transform(&self, scope: &TransformKey) -> Option<&ElementTransform> {
		let registry = self.inner.elements.get(&scope.root_key())?;
		registry.transforms.get(scope).map(|t| &**t)
	}

	/// Number of bindings currently memoized.
	pub fn cached_bindings(&self) -> usize {
		let inner = &self.inner;
		inner.attributes.values().map(|r| r.cache.len()).sum::<usize>()
			+ inner.elements.values().map(|r| r.cache.len()).sum::<usize>()
			+ inner.undeclared_attributes.len()
			+ inner.undeclared_elements.len()
	}
}

impl std::fmt::Debug for Schema {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Schema")
			.field("attribute_buckets", &self.inner.attributes.len())
			.field("element_buckets", &self.inner.elements.len())
			.field("config", &self.inner.config)
			.finish()
	}
}

/// Bound metadata of either kind.
#[derive(Debug, Clone)]
pub enum Metadata {
	Attribute(AttributeMetadata),
	Element(ElementMetadata),
}

impl Metadata {
	pub fn as_attribute(&self) -> Option<&AttributeMetadata> {
		match self {
			Metadata::Attribute(m) => Some(m),
			Metadata::Element(_) => None,
		}
	}

	pub fn as_element(&self) -> Option<&ElementMetadata> {
		match self {
			Metadata::Element(m) => Some(m),
			Metadata::Attribute(_) => None,
		}
	}

	/// Returns true if any declaration matched the request.
	pub fn is_declared(&self) -> bool {
		match self {
			Metadata::Attribute(m) => m.is_declared(),
			Metadata::Element(m) => m.is_declared(),
		}
	}
}
