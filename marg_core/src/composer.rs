use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;

use crate::MargConfig;
use crate::MargResult;
use crate::Renderer;
use crate::Template;
use crate::parse_file;

/// Separator placed between snippets by [`Composer::compose_prompt`] unless
/// another one is configured.
pub const DEFAULT_SEPARATOR: &str = "\n\n";

/// Loads templates by name from a template store directory and renders them.
///
/// Parsed templates are cached for the lifetime of the composer and never
/// re-read, even when the file on disk changes. Every composer owns its own
/// cache.
#[derive(Debug)]
pub struct Composer {
	root: PathBuf,
	renderer: Renderer,
	separator: String,
	cache: HashMap<String, Arc<Template>>,
}

impl Composer {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		let root = root.into();
		let renderer = Renderer::new().with_base_path(root.clone());

		Self {
			root,
			renderer,
			separator: DEFAULT_SEPARATOR.to_string(),
			cache: HashMap::new(),
		}
	}

	/// Create a composer that takes its include depth limit and default
	/// separator from `config`.
	pub fn with_config(root: impl Into<PathBuf>, config: &MargConfig) -> Self {
		let mut composer = Self::new(root);
		composer.renderer = composer
			.renderer
			.with_max_include_depth(config.max_include_depth);
		composer.separator.clone_from(&config.separator);
		composer
	}

	/// The template store directory.
	pub fn root(&self) -> &Path {
		&self.root
	}

	/// The separator used by [`Composer::compose`].
	pub fn separator(&self) -> &str {
		&self.separator
	}

	/// Returns true when `name` has already been loaded.
	pub fn is_cached(&self, name: &str) -> bool {
		self.cache.contains_key(name)
	}

	/// Number of templates in the cache.
	pub fn cached_count(&self) -> usize {
		self.cache.len()
	}

	/// Load and parse `name` relative to the store root. A cached template is
	/// returned as the same shared instance without touching the disk.
	pub fn load_template(&mut self, name: &str) -> MargResult<Arc<Template>> {
		if let Some(template) = self.cache.get(name) {
			tracing::debug!(name = %name, "template cache hit");
			return Ok(Arc::clone(template));
		}

		let path = self.root.join(name);
		tracing::debug!(name = %name, path = %path.display(), "template cache miss");

		let template = Arc::new(parse_file(&path)?);
		self.cache.insert(name.to_string(), Arc::clone(&template));

		Ok(template)
	}

	/// Render the template `name`. Includes resolve relative to the store
	/// root, whatever directory the template itself lives in.
	pub fn render(&mut self, name: &str, context: &Value) -> MargResult<String> {
		let template = self.load_template(name)?;
		self.renderer.render(&template.body, context)
	}

	/// Render each snippet in order and join the results with `separator`.
	/// The first failure aborts the whole composition.
	pub fn compose_prompt<S: AsRef<str>>(
		&mut self,
		snippets: &[S],
		context: &Value,
		separator: &str,
	) -> MargResult<String> {
		let rendered = snippets
			.iter()
			.map(|name| self.render(name.as_ref(), context))
			.collect::<MargResult<Vec<_>>>()?;

		Ok(rendered.join(separator))
	}

	/// [`Composer::compose_prompt`] with the configured separator.
	pub fn compose<S: AsRef<str>>(&mut self, snippets: &[S], context: &Value) -> MargResult<String> {
		let separator = self.separator.clone();
		self.compose_prompt(snippets, context, &separator)
	}
}
