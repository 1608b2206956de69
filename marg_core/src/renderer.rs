use std::path::Path;
use std::path::PathBuf;

use serde_json::Value;

use crate::MargError;
use crate::MargResult;
use crate::Node;
use crate::parse_file;
use crate::value::Scope;
use crate::value::format_value;
use crate::value::is_truthy;

/// Default ceiling on nested includes. A template that includes itself fails
/// with [`MargError::IncludeDepthExceeded`] once this many includes are open.
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 64;

/// Tree-walking renderer. Includes are resolved relative to the base path, or
/// the working directory when none is set.
#[derive(Debug, Clone)]
pub struct Renderer {
	base_path: Option<PathBuf>,
	max_include_depth: usize,
}

impl Default for Renderer {
	fn default() -> Self {
		Self {
			base_path: None,
			max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
		}
	}
}

impl Renderer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Resolve includes relative to `base_path`.
	#[must_use]
	pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
		self.base_path = Some(base_path.into());
		self
	}

	#[must_use]
	pub fn with_max_include_depth(mut self, max_include_depth: usize) -> Self {
		self.max_include_depth = max_include_depth;
		self
	}

	pub fn base_path(&self) -> Option<&Path> {
		self.base_path.as_deref()
	}

	pub fn max_include_depth(&self) -> usize {
		self.max_include_depth
	}

	/// Render a template body against `context`.
	///
	/// Unresolved variables render as the empty string, unresolved conditions
	/// are falsy and unresolved iterables loop zero times. The only failures
	/// come from includes: a missing file or too deep a chain.
	pub fn render(&self, body: &[Node], context: &Value) -> MargResult<String> {
		let mut scope = Scope::new(context);
		let mut output = String::new();
		self.render_nodes(body, &mut scope, &mut output, 0)?;

		Ok(output)
	}

	fn render_nodes<'a>(
		&self,
		nodes: &[Node],
		scope: &mut Scope<'a>,
		output: &mut String,
		depth: usize,
	) -> MargResult<()> {
		for node in nodes {
			match node {
				Node::Text { content } => output.push_str(content),
				Node::Variable { name } => {
					if let Some(value) = scope.resolve(name) {
						output.push_str(&format_value(value));
					}
				}
				Node::If {
					condition,
					true_block,
					false_block,
				} => {
					if scope.get(condition).is_some_and(is_truthy) {
						self.render_nodes(true_block, scope, output, depth)?;
					} else if let Some(false_block) = false_block {
						self.render_nodes(false_block, scope, output, depth)?;
					}
				}
				Node::For {
					iterator,
					iterable,
					block,
				} => {
					let Some(Value::Array(items)) = scope.get(iterable) else {
						continue;
					};

					for item in items {
						scope.push(iterator, item);
						let result = self.render_nodes(block, scope, output, depth);
						scope.pop();
						result?;
					}
				}
				Node::Include { template_name } => {
					self.render_include(template_name, scope, output, depth)?;
				}
			}
		}

		Ok(())
	}

	/// Read, parse and render an included template inline. The include sees
	/// the same scope as the including template and its metadata is dropped.
	fn render_include(
		&self,
		template_name: &str,
		scope: &mut Scope<'_>,
		output: &mut String,
		depth: usize,
	) -> MargResult<()> {
		if depth >= self.max_include_depth {
			return Err(MargError::IncludeDepthExceeded {
				name: template_name.to_string(),
				limit: self.max_include_depth,
			});
		}

		let path = self.resolve_include(template_name);
		tracing::debug!(name = %template_name, path = %path.display(), depth, "rendering include");

		let template = parse_file(&path)?;

		self.render_nodes(&template.body, scope, output, depth + 1)
	}

	fn resolve_include(&self, template_name: &str) -> PathBuf {
		match &self.base_path {
			Some(base_path) => base_path.join(template_name),
			None => PathBuf::from(template_name),
		}
	}
}

/// Render a template body against `context`, resolving includes relative to
/// `base_path` when given.
pub fn render(body: &[Node], context: &Value, base_path: Option<&Path>) -> MargResult<String> {
	let renderer = match base_path {
		Some(base_path) => Renderer::new().with_base_path(base_path),
		None => Renderer::new(),
	};

	renderer.render(body, context)
}
