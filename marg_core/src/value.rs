//! Context values: scoped lookup, truthiness, and display formatting.
//!
//! The render context is a [`serde_json::Value`]. Mapping key order is
//! preserved, which makes the display form of mappings deterministic.

use std::borrow::Cow;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Write;

use serde_json::Number;
use serde_json::Value;

/// The variables visible while rendering: the caller's context plus the
/// bindings introduced by enclosing `for` loops.
#[derive(Debug)]
pub struct Scope<'a> {
	root: &'a Value,
	locals: Vec<(String, &'a Value)>,
}

impl<'a> Scope<'a> {
	pub fn new(root: &'a Value) -> Self {
		Self {
			root,
			locals: Vec::new(),
		}
	}

	/// Bind `key` to `value`, shadowing any outer binding until the matching
	/// [`Scope::pop`].
	pub fn push(&mut self, key: &str, value: &'a Value) {
		self.locals.push((key.to_string(), value));
	}

	pub fn pop(&mut self) {
		self.locals.pop();
	}

	/// Look up a bare key. Loop bindings are searched innermost first, then
	/// the root mapping.
	pub fn get(&self, key: &str) -> Option<&'a Value> {
		if let Some((_, value)) = self.locals.iter().rev().find(|(k, _)| k == key) {
			return Some(*value);
		}

		match self.root {
			Value::Object(map) => map.get(key),
			_ => None,
		}
	}

	/// Resolve a dotted path such as `user.name`. The first segment is looked
	/// up in scope, the rest through nested mappings. Returns `None` when a
	/// segment is missing or a non-mapping value is indexed.
	pub fn resolve(&self, path: &str) -> Option<&'a Value> {
		let mut segments = path.split('.');
		let head = segments.next()?;
		let mut current = self.get(head)?;

		for segment in segments {
			match current {
				Value::Object(map) => current = map.get(segment)?,
				_ => return None,
			}
		}

		Some(current)
	}
}

/// The truthiness rule used by `if`: `false`, `null`, numeric zero and empty
/// strings, sequences and mappings are falsy.
pub fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::Number(n) => !is_zero(n),
		Value::String(s) => !s.is_empty(),
		Value::Array(items) => !items.is_empty(),
		Value::Object(map) => !map.is_empty(),
	}
}

fn is_zero(number: &Number) -> bool {
	if let Some(n) = number.as_i64() {
		n == 0
	} else if let Some(n) = number.as_u64() {
		n == 0
	} else {
		number.as_f64().is_none_or(|n| n == 0.0)
	}
}

/// Format a context value for output.
///
/// - strings are written verbatim and `null` as the empty string
/// - booleans are `True` / `False`
/// - integers are decimal; floats use the shortest round-trip digits, keep a
///   trailing `.0` when integral and switch to `1e+16` / `1e-05` exponent
///   form outside `[1e-4, 1e16)`
/// - sequences and mappings use the literal form `[1, 'a']` and
///   `{'key': 'value'}`, with mapping keys in insertion order. Nested strings
///   are quoted and nested `null` is `None`.
pub fn format_value(value: &Value) -> Cow<'_, str> {
	match value {
		Value::String(s) => Cow::Borrowed(s.as_str()),
		Value::Null => Cow::Borrowed(""),
		other => Cow::Owned(Literal(other).to_string()),
	}
}

/// The literal display form of a value nested inside a sequence or mapping.
struct Literal<'a>(&'a Value);

impl Display for Literal<'_> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.0 {
			Value::Null => f.write_str("None"),
			Value::Bool(true) => f.write_str("True"),
			Value::Bool(false) => f.write_str("False"),
			Value::Number(n) => write_number(f, n),
			Value::String(s) => write_quoted(f, s),
			Value::Array(items) => {
				f.write_char('[')?;
				for (index, item) in items.iter().enumerate() {
					if index > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{}", Literal(item))?;
				}
				f.write_char(']')
			}
			Value::Object(map) => {
				f.write_char('{')?;
				for (index, (key, item)) in map.iter().enumerate() {
					if index > 0 {
						f.write_str(", ")?;
					}
					write_quoted(f, key)?;
					write!(f, ": {}", Literal(item))?;
				}
				f.write_char('}')
			}
		}
	}
}

fn write_number(f: &mut Formatter<'_>, number: &Number) -> std::fmt::Result {
	match number.as_f64() {
		Some(n) if number.is_f64() => write_float(f, n),
		_ => write!(f, "{number}"),
	}
}

/// Positional notation for magnitudes in `[1e-4, 1e16)`, otherwise a
/// mantissa with a signed exponent of at least two digits, e.g. `1e+16`.
fn write_float(f: &mut Formatter<'_>, n: f64) -> std::fmt::Result {
	let scientific = format!("{n:e}");
	let Some((mantissa, exponent)) = scientific.split_once('e') else {
		return f.write_str(&scientific);
	};
	let exponent: i32 = exponent.parse().unwrap_or_default();

	if n == 0.0 || (-4..16).contains(&exponent) {
		if n.fract() == 0.0 {
			return write!(f, "{n:.1}");
		}
		return write!(f, "{n}");
	}

	let sign = if exponent < 0 { '-' } else { '+' };
	write!(f, "{mantissa}e{sign}{:02}", exponent.unsigned_abs())
}

/// Quote a string the way the literal form expects: single quotes unless the
/// string contains a single quote and no double quote.
fn write_quoted(f: &mut Formatter<'_>, s: &str) -> std::fmt::Result {
	let quote = if s.contains('\'') && !s.contains('"') {
		'"'
	} else {
		'\''
	};

	f.write_char(quote)?;
	for ch in s.chars() {
		match ch {
			'\\' => f.write_str("\\\\")?,
			'\n' => f.write_str("\\n")?,
			'\r' => f.write_str("\\r")?,
			'\t' => f.write_str("\\t")?,
			c if c == quote => {
				f.write_char('\\')?;
				f.write_char(c)?;
			}
			c => f.write_char(c)?,
		}
	}
	f.write_char(quote)
}
