//! Usage contexts that scope metadata declarations.
//!
//! A [`MetadataContext`] narrows where a declaration applies: a wire-format
//! variant, a projection, a protocol version. Unset fields are wildcards on
//! the declaring side, so a context that names only a format applies to every
//! projection and version of that format.

use std::fmt;
use std::sync::Arc;

/// Protocol version, compatible within a major version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
	pub major: u16,
	pub minor: u16,
}

impl Version {
	pub const fn new(major: u16, minor: u16) -> Self {
		Self { major, minor }
	}

	/// Returns true if `other` satisfies a declaration made for this version.
	pub fn is_satisfied_by(self, other: Version) -> bool {
		self.major == other.major && other.minor >= self.minor
	}
}

impl fmt::Display for Version {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}", self.major, self.minor)
	}
}

/// Application-defined discriminator for metadata declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetadataContext {
	format: Option<Arc<str>>,
	projection: Option<Arc<str>>,
	version: Option<Version>,
}

impl MetadataContext {
	/// Context for a wire-format variant such as `"atom"` or `"json"`.
	pub fn format(format: &str) -> Self {
		Self {
			format: Some(Arc::from(format)),
			..Self::default()
		}
	}

	/// Context for a projection such as `"full"` or `"lite"`.
	pub fn projection(projection: &str) -> Self {
		Self {
			projection: Some(Arc::from(projection)),
			..Self::default()
		}
	}

	/// Context for a protocol version.
	pub fn version(version: Version) -> Self {
		Self {
			version: Some(version),
			..Self::default()
		}
	}

	pub fn with_format(mut self, format: &str) -> Self {
		self.format = Some(Arc::from(format));
		self
	}

	pub fn with_projection(mut self, projection: &str) -> Self {
		self.projection = Some(Arc::from(projection));
		self
	}

	pub fn with_version(mut self, version: Version) -> Self {
		self.version = Some(version);
		self
	}

	pub fn format_name(&self) -> Option<&str> {
		self.format.as_deref()
	}

	pub fn projection_name(&self) -> Option<&str> {
		self.projection.as_deref()
	}

	pub fn version_number(&self) -> Option<Version> {
		self.version
	}

	/// Returns true if a declaration made for this context applies to `other`.
	///
	/// Every field set here must be set identically in `other`; versions
	/// match when `other` is a compatible later minor version.
	pub fn matches(&self, other: &MetadataContext) -> bool {
		fn field(mine: &Option<Arc<str>>, theirs: &Option<Arc<str>>) -> bool {
			match mine {
				None => true,
				Some(m) => theirs.as_deref() == Some(&**m),
			}
		}
		let version_ok = match (self.version, other.version) {
			(None, _) => true,
			(Some(mine), Some(theirs)) => mine.is_satisfied_by(theirs),
			(Some(_), None) => false,
		};
		field(&self.format, &other.format) && field(&self.projection, &other.projection) && version_ok
	}
}

impl fmt::Display for MetadataContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut parts = Vec::new();
		if let Some(format) = &self.format {
			parts.push(format!("format={format}"));
		}
		if let Some(projection) = &self.projection {
			parts.push(format!("projection={projection}"));
		}
		if let Some(version) = self.version {
			parts.push(format!("version={version}"));
		}
		write!(f, "{{{}}}", parts.join(","))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_unset_fields_are_wildcards() {
		let json = MetadataContext::format("json");
		assert!(json.matches(&MetadataContext::format("json").with_projection("full")));
		assert!(!json.matches(&MetadataContext::format("atom")));
		assert!(!json.matches(&MetadataContext::projection("full")));
		assert!(MetadataContext::default().matches(&json));
	}

	#[test]
	fn test_version_compatibility() {
		let v2 = MetadataContext::version(Version::new(2, 0));
		assert!(v2.matches(&MetadataContext::version(Version::new(2, 1))));
		assert!(!v2.matches(&MetadataContext::version(Version::new(1, 9))));
		assert!(!MetadataContext::version(Version::new(2, 1)).matches(&MetadataContext::version(Version::new(2, 0))));
	}

	#[test]
	fn test_ordering_unset_first() {
		assert!(MetadataContext::default() < MetadataContext::format("atom"));
		assert!(MetadataContext::format("atom") < MetadataContext::format("json"));
	}
}
