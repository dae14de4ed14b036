use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::transform::TransformKey;

/// Memoized bindings of one schema, keyed by the exact request.
///
/// Purely an optimization: a disabled cache computes every binding afresh
/// and results differ only in instance identity.
pub(crate) struct BindingCache<B> {
	enabled: bool,
	entries: RwLock<FxHashMap<TransformKey, Arc<B>>>,
}

impl<B> BindingCache<B> {
	pub(crate) fn new(enabled: bool) -> Self {
		Self {
			enabled,
			entries: RwLock::new(FxHashMap::default()),
		}
	}

	pub(crate) fn get(&self, scope: &TransformKey) -> Option<Arc<B>> {
		if !self.enabled {
			return None;
		}
		self.entries.read().get(scope).cloned()
	}

	/// Stores `binding` unless another thread got there first; returns the
	/// instance every caller should use.
	pub(crate) fn insert_if_absent(&self, scope: &TransformKey, binding: Arc<B>) -> Arc<B> {
		if !self.enabled {
			return binding;
		}
		let mut entries = self.entries.write();
		Arc::clone(entries.entry(scope.clone()).or_insert(binding))
	}

	pub(crate) fn len(&self) -> usize {
		self.entries.read().len()
	}
}
