//! Content datatypes and the values stored in document nodes.
//!
//! [`Datatype`] is a closed hierarchy standing in for a host-language class
//! tree: every datatype except [`Datatype::Any`] has exactly one parent, and
//! assignability walks parent pointers. [`Datatype::Void`] doubles as the
//! "unconstrained" placeholder: a lookup keyed by `Void` matches any stored
//! datatype.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, FixedOffset};

use crate::error::ContentError;

/// The datatype of a key's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Datatype {
	/// Root of the hierarchy; accepts every value unchanged.
	Any,
	/// No content. Unconstrained when used on the requesting side of a match.
	Void,
	/// Free text.
	Text,
	/// `true` / `false`.
	Bool,
	/// Either numeric representation.
	Number,
	/// Signed 64-bit integer.
	Integer,
	/// 64-bit floating point.
	Float,
	/// RFC 3339 timestamp with offset.
	DateTime,
}

impl Datatype {
	/// Returns the immediate supertype, or `None` for [`Datatype::Any`].
	pub const fn parent(self) -> Option<Datatype> {
		match self {
			Datatype::Any => None,
			Datatype::Void | Datatype::Text | Datatype::Bool | Datatype::Number | Datatype::DateTime => {
				Some(Datatype::Any)
			}
			Datatype::Integer | Datatype::Float => Some(Datatype::Number),
		}
	}

	/// Returns a stable lowercase name.
	pub const fn name(self) -> &'static str {
		match self {
			Datatype::Any => "any",
			Datatype::Void => "void",
			Datatype::Text => "text",
			Datatype::Bool => "bool",
			Datatype::Number => "number",
			Datatype::Integer => "integer",
			Datatype::Float => "float",
			Datatype::DateTime => "datetime",
		}
	}

	/// Number of ancestors between this datatype and the root.
	pub fn depth(self) -> usize {
		let mut depth = 0;
		let mut cur = self.parent();
		while let Some(p) = cur {
			depth += 1;
			cur = p.parent();
		}
		depth
	}

	/// Returns true if a value of `other` can be used where `self` is expected.
	pub fn is_assignable_from(self, other: Datatype) -> bool {
		let mut cur = Some(other);
		while let Some(t) = cur {
			if t == self {
				return true;
			}
			cur = t.parent();
		}
		false
	}

	/// Key-matching rule for datatypes: a requested `Void` is unconstrained,
	/// otherwise the stored datatype must be assignable from the requested one.
	pub fn matches(self, requested: Datatype) -> bool {
		requested == Datatype::Void || self.is_assignable_from(requested)
	}

	/// Converts `value` into this datatype.
	///
	/// Text is parsed into the target representation; numbers widen into
	/// floats; every value renders into text. `Void` accepts nothing.
	pub fn coerce(self, value: Value) -> Result<Value, ContentError> {
		let fail = |value: &Value| ContentError::Conversion {
			expected: self,
			found: value.datatype(),
			value: value.to_string(),
		};
		match (self, value) {
			(Datatype::Any, v) => Ok(v),
			(Datatype::Void, v) => Err(fail(&v)),
			(Datatype::Text, Value::Text(s)) => Ok(Value::Text(s)),
			(Datatype::Text, v) => Ok(Value::Text(v.to_string())),
			(Datatype::Bool, Value::Bool(b)) => Ok(Value::Bool(b)),
			(Datatype::Bool, Value::Text(s)) => {
				let parsed = match s.trim() {
					"true" | "1" => Some(true),
					"false" | "0" => Some(false),
					_ => None,
				};
				parsed.map(Value::Bool).ok_or_else(|| fail(&Value::Text(s)))
			}
			(Datatype::Integer, Value::Integer(i)) => Ok(Value::Integer(i)),
			(Datatype::Integer, Value::Text(s)) => {
				s.trim().parse().map(Value::Integer).map_err(|_| fail(&Value::Text(s)))
			}
			(Datatype::Float, Value::Float(f)) => Ok(Value::Float(f)),
			(Datatype::Float, Value::Integer(i)) => Ok(Value::Float(i as f64)),
			(Datatype::Float, Value::Text(s)) => {
				s.trim().parse().map(Value::Float).map_err(|_| fail(&Value::Text(s)))
			}
			(Datatype::Number, v @ (Value::Integer(_) | Value::Float(_))) => Ok(v),
			(Datatype::Number, Value::Text(s)) => {
				let t = s.trim();
				if let Ok(i) = t.parse() {
					Ok(Value::Integer(i))
				} else if let Ok(f) = t.parse() {
					Ok(Value::Float(f))
				} else {
					Err(fail(&Value::Text(s)))
				}
			}
			(Datatype::DateTime, Value::DateTime(d)) => Ok(Value::DateTime(d)),
			(Datatype::DateTime, Value::Text(s)) => DateTime::parse_from_rfc3339(s.trim())
				.map(Value::DateTime)
				.map_err(|_| fail(&Value::Text(s))),
			(_, v) => Err(fail(&v)),
		}
	}
}

impl PartialOrd for Datatype {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

/// Hierarchy depth first, then name.
impl Ord for Datatype {
	fn cmp(&self, other: &Self) -> Ordering {
		self.depth()
			.cmp(&other.depth())
			.then_with(|| self.name().cmp(other.name()))
	}
}

impl fmt::Display for Datatype {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// A typed content value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Free text.
	Text(String),
	/// Boolean.
	Bool(bool),
	/// Signed integer.
	Integer(i64),
	/// Floating point.
	Float(f64),
	/// Timestamp with offset.
	DateTime(DateTime<FixedOffset>),
}

impl Value {
	/// Returns the most specific datatype describing this value.
	pub fn datatype(&self) -> Datatype {
		match self {
			Value::Text(_) => Datatype::Text,
			Value::Bool(_) => Datatype::Bool,
			Value::Integer(_) => Datatype::Integer,
			Value::Float(_) => Datatype::Float,
			Value::DateTime(_) => Datatype::DateTime,
		}
	}

	/// Returns the text if this is a `Text` value.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Text(s) => Some(s),
			_ => None,
		}
	}

	/// Returns the boolean if this is a `Bool` value.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(b) => Some(*b),
			_ => None,
		}
	}

	/// Returns the integer if this is an `Integer` value.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			Value::Integer(i) => Some(*i),
			_ => None,
		}
	}

	/// Returns the float if this is a `Float` value.
	pub fn as_float(&self) -> Option<f64> {
		match self {
			Value::Float(f) => Some(*f),
			_ => None,
		}
	}

	/// Extracts a typed copy of this value.
	pub fn get<T: FromValue>(&self) -> Option<T> {
		T::from_value(self)
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Text(s) => f.write_str(s),
			Value::Bool(b) => write!(f, "{b}"),
			Value::Integer(i) => write!(f, "{i}"),
			Value::Float(v) => write!(f, "{v}"),
			Value::DateTime(d) => f.write_str(&d.to_rfc3339()),
		}
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Text(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Text(v)
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Bool(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Integer(v)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Float(v)
	}
}

impl From<DateTime<FixedOffset>> for Value {
	fn from(v: DateTime<FixedOffset>) -> Self {
		Value::DateTime(v)
	}
}

mod sealed {
	pub trait Sealed {}
	impl Sealed for String {}
	impl Sealed for bool {}
	impl Sealed for i64 {}
	impl Sealed for f64 {}
	impl Sealed for chrono::DateTime<chrono::FixedOffset> {}
}

/// Rust types that can be read out of a [`Value`].
pub trait FromValue: sealed::Sealed + Sized {
	/// Extracts the value, returning `None` on a representation mismatch.
	fn from_value(value: &Value) -> Option<Self>;

	/// The datatype this Rust type corresponds to.
	fn datatype() -> Datatype;
}

impl FromValue for String {
	fn from_value(value: &Value) -> Option<Self> {
		value.as_str().map(str::to_string)
	}

	fn datatype() -> Datatype {
		Datatype::Text
	}
}

impl FromValue for bool {
	fn from_value(value: &Value) -> Option<Self> {
		value.as_bool()
	}

	fn datatype() -> Datatype {
		Datatype::Bool
	}
}

impl FromValue for i64 {
	fn from_value(value: &Value) -> Option<Self> {
		value.as_int()
	}

	fn datatype() -> Datatype {
		Datatype::Integer
	}
}

impl FromValue for f64 {
	fn from_value(value: &Value) -> Option<Self> {
		match value {
			Value::Float(f) => Some(*f),
			Value::Integer(i) => Some(*i as f64),
			_ => None,
		}
	}

	fn datatype() -> Datatype {
		Datatype::Float
	}
}

impl FromValue for DateTime<FixedOffset> {
	fn from_value(value: &Value) -> Option<Self> {
		match value {
			Value::DateTime(d) => Some(*d),
			_ => None,
		}
	}

	fn datatype() -> Datatype {
		Datatype::DateTime
	}
}
