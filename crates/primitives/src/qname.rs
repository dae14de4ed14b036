//! Qualified names with one-directional wildcard matching.
//!
//! A [`QName`] pairs an optional namespace URI with a local name. A missing
//! namespace and the local name `*` act as wildcards when the name is used as
//! a pattern: `{ns}*` matches every name in `ns`, and a name without a
//! namespace matches the same local name in any namespace.
//!
//! Names render in Clark notation (`{ns}local`), which is also the textual
//! form accepted by [`QName::parse`] and the serde impls.

use std::fmt;
use std::sync::Arc;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// Local name that matches any local name.
pub const ANY_LOCAL_NAME: &str = "*";

/// An immutable qualified name.
///
/// Ordering is by namespace, then local name, with the wildcard namespace
/// sorting before every concrete namespace.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
	ns: Option<Arc<str>>,
	local: Arc<str>,
}

impl QName {
	/// Creates a name in the given namespace.
	pub fn new(ns: &str, local: &str) -> Self {
		Self {
			ns: Some(Arc::from(ns)),
			local: Arc::from(local),
		}
	}

	/// Creates a name with no namespace.
	///
	/// Used as a pattern, it matches `local` in every namespace.
	pub fn local(local: &str) -> Self {
		Self {
			ns: None,
			local: Arc::from(local),
		}
	}

	/// Creates the pattern matching every name in `ns`.
	pub fn any_in(ns: &str) -> Self {
		Self::new(ns, ANY_LOCAL_NAME)
	}

	/// Parses Clark notation: `{ns}local` or a bare `local`.
	///
	/// Returns `None` for an unterminated namespace or an empty local name.
	pub fn parse(text: &str) -> Option<Self> {
		let (ns, local) = match text.strip_prefix('{') {
			Some(rest) => {
				let (ns, local) = rest.split_once('}')?;
				(Some(ns), local)
			}
			None => (None, text),
		};
		if local.is_empty() {
			return None;
		}
		Some(match ns {
			Some(ns) => Self::new(ns, local),
			None => Self::local(local),
		})
	}

	/// Returns the namespace, or `None` for the wildcard namespace.
	pub fn ns(&self) -> Option<&str> {
		self.ns.as_deref()
	}

	/// Returns the local name.
	pub fn local_name(&self) -> &str {
		&self.local
	}

	/// Returns true if the local name is the `*` wildcard.
	pub fn has_any_local_name(&self) -> bool {
		&*self.local == ANY_LOCAL_NAME
	}

	/// Returns true if either position holds a wildcard.
	pub fn is_pattern(&self) -> bool {
		self.ns.is_none() || self.has_any_local_name()
	}

	/// Returns true if this name, used as a pattern, matches `other`.
	///
	/// Wildcards only match in one direction: `{ns}*` matches `{ns}price`,
	/// but `{ns}price` does not match `{ns}*`. Two identical wildcards are
	/// always compatible.
	pub fn matches(&self, other: &QName) -> bool {
		let ns_ok = match &self.ns {
			None => true,
			Some(ns) => other.ns.as_deref() == Some(&**ns),
		};
		ns_ok && (self.has_any_local_name() || self.local == other.local)
	}

	/// Returns the `{ns}*` form of this name, sharing its namespace.
	pub fn with_any_local_name(&self) -> QName {
		if self.has_any_local_name() {
			return self.clone();
		}
		Self {
			ns: self.ns.clone(),
			local: Arc::from(ANY_LOCAL_NAME),
		}
	}
}

impl fmt::Display for QName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.ns {
			Some(ns) => write!(f, "{{{ns}}}{}", self.local),
			None => f.write_str(&self.local),
		}
	}
}

impl fmt::Debug for QName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "QName({self})")
	}
}

impl Serialize for QName {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for QName {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let text = String::deserialize(deserializer)?;
		QName::parse(&text)
			.ok_or_else(|| de::Error::custom(format!("invalid qualified name {text:?}")))
	}
}
