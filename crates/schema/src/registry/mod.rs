//! Mutable metadata registry and its frozen snapshots.
//!
//! # Purpose
//!
//! Application code declares metadata into a [`MetadataRegistry`] through
//! creator handles, then freezes it with [`MetadataRegistry::create_schema`].
//! Declarations are bucketed by the [`RootKey`] of their target key, so a
//! lookup only ever scans one bucket.
//!
//! # Invariants
//!
//! - Every mutation happens under the registry lock and drops the published
//!   schema before the lock is released.
//!   - Enforced in: [`MetadataRegistry::with_state`].
//!   - Tested by: `registry::tests::test_mutation_invalidates_schema`.
//!   - Failure symptom: a schema missing recent declarations is handed out.
//! - An unmodified registry hands out the same schema instance.
//!   - Enforced in: [`MetadataRegistry::create_schema`].
//!   - Tested by: `registry::tests::test_create_schema_is_idempotent`.
//!   - Failure symptom: binding caches are rebuilt on every freeze.
//! - Whitelist finalization never writes back into builder state.
//!   - Enforced in: `freeze::finalize_whitelists`.
//!   - Tested by: `registry::tests::test_whitelist_refreeze_is_stable`.
//!   - Failure symptom: a second freeze hides keys a later declaration re-added.
//!
//! [`RootKey`]: gmodel_primitives::RootKey

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use gmodel_primitives::{AttributeKey, ElementKey, ElementType, MetadataContext};
use parking_lot::Mutex;

mod creator;
mod freeze;
mod plugin;
mod state;

pub use creator::{AttributeCreator, ElementCreator};
pub use plugin::TypeRegistration;
use state::RegistryState;

use crate::config::SchemaConfig;
use crate::error::SchemaError;
use crate::schema::{Schema, SchemaInner};
use crate::transform::TransformKey;


/// The mutable root of all metadata declarations.
pub struct MetadataRegistry {
	state: Mutex<RegistryState>,
	published: ArcSwapOption<SchemaInner>,
	config: SchemaConfig,
}

impl Default for MetadataRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl MetadataRegistry {
	pub fn new() -> Self {
		Self::with_config(SchemaConfig::default())
	}

	pub fn with_config(config: SchemaConfig) -> Self {
		Self {
			state: Mutex::new(RegistryState::default()),
			published: ArcSwapOption::empty(),
			config,
		}
	}

	pub fn config(&self) -> SchemaConfig {
		self.config
	}

	/// Runs a mutation under the registry lock and invalidates the schema.
	pub(crate) fn with_state<R>(&self, f: impl FnOnce(&mut RegistryState) -> R) -> R {
		let mut state = self.state.lock();
		let out = f(&mut state);
		self.published.store(None);
		out
	}

	/// Like [`MetadataRegistry::with_state`], but only invalidates the schema
	/// when `f` reports a change.
	pub(crate) fn with_state_if(&self, f: impl FnOnce(&mut RegistryState) -> bool) {
		let mut state = self.state.lock();
		if f(&mut state) {
			self.published.store(None);
		}
	}

	/// Returns the creator for an attribute scope, declaring it on first use.
	pub fn build_attribute(
		&self,
		parent: Option<&ElementKey>,
		key: &AttributeKey,
		context: Option<&MetadataContext>,
	) -> AttributeCreator<'_> {
		AttributeCreator::new(self, TransformKey::attribute(parent, key, context))
	}

	/// Returns the creator for an element scope, declaring it on first use.
	pub fn build_element(
		&self,
		parent: Option<&ElementKey>,
		key: &ElementKey,
		context: Option<&MetadataContext>,
	) -> ElementCreator<'_> {
		ElementCreator::new(self, TransformKey::element(parent, key, context), key.clone())
	}

	/// Runs the static registrations of `element_type` and its supertypes.
	///
	/// Supertypes run first. Each type is registered at most once per registry;
	/// registrations may declare further types recursively.
	pub fn register(&self, element_type: ElementType) {
		let mut chain: Vec<ElementType> = element_type.ancestors().collect();
		chain.reverse();
		chain.push(element_type);
		for ty in chain {
			let fresh = self.state.lock().registered.insert(ty);
			if !fresh {
				continue;
			}
			for registration in plugin::registrations_for(ty) {
				(registration.register)(self);
			}
		}
	}

	/// Returns true once [`MetadataRegistry::register`] has run for `element_type`.
	pub fn is_registered(&self, element_type: ElementType) -> bool {
		self.state.lock().registered.contains(&element_type)
	}

	/// Layers every declaration of `other` on top of this registry.
	///
	/// Scalars overwrite, ordered key lists merge with the add and replace
	/// rules, whitelists union.
	pub fn merge(&self, other: &MetadataRegistry) {
		if std::ptr::eq(self, other) {
			return;
		}
		let snapshot = other.state.lock().clone();
		self.with_state(|state| state.merge(&snapshot));
	}

	/// Freezes the current declarations into a [`Schema`].
	///
	/// Returns the previously frozen instance when nothing changed since.
	///
	/// # Errors
	///
	/// Returns a [`SchemaError`] for the first invalid declaration found,
	/// visiting buckets in key order and scopes in declaration order.
	pub fn create_schema(&self) -> Result<Schema, SchemaError> {
		if let Some(inner) = self.published.load_full() {
			tracing::debug!(domain = "schema", "reusing frozen schema");
			return Ok(Schema::from_inner(inner));
		}
		let state = self.state.lock();
		if let Some(inner) = self.published.load_full() {
			return Ok(Schema::from_inner(inner));
		}
		let inner = Arc::new(freeze::freeze(&state, self.config)?);
		let (attribute_scopes, element_scopes) = state.scope_count();
		tracing::debug!(
			domain = "schema",
			attribute_buckets = state.attributes.len(),
			element_buckets = state.elements.len(),
			attribute_scopes,
			element_scopes,
			"froze schema",
		);
		self.published.store(Some(Arc::clone(&inner)));
		Ok(Schema::from_inner(inner))
	}
}

impl std::fmt::Debug for MetadataRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.state.lock();
		let (attribute_scopes, element_scopes) = state.scope_count();
		f.debug_struct("MetadataRegistry")
			.field("attribute_scopes", &attribute_scopes)
			.field("element_scopes", &element_scopes)
			.field("registered", &state.registered.len())
			.field("frozen", &self.published.load().is_some())
			.finish()
	}
}
