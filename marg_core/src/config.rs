use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::DEFAULT_MAX_INCLUDE_DEPTH;
use crate::DEFAULT_SEPARATOR;
use crate::MargError;
use crate::MargResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["marg.toml", ".marg.toml", ".config/marg.toml"];

/// Default extension of template files picked up when rendering a directory.
pub const DEFAULT_EXTENSION: &str = "marg";

/// Default extension of files written when rendering a directory to an
/// output directory.
pub const DEFAULT_OUTPUT_EXTENSION: &str = "md";

/// Configuration loaded from a `marg.toml` file.
///
/// ```toml
/// max_include_depth = 16
/// extension = "prompt"
/// output_extension = "txt"
/// separator = "\n---\n"
/// ```
///
/// Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MargConfig {
	/// Maximum number of nested includes before rendering fails.
	#[serde(default = "default_max_include_depth")]
	pub max_include_depth: usize,
	/// Extension (without the dot) of template files in a directory.
	#[serde(default = "default_extension")]
	pub extension: String,
	/// Extension (without the dot) used for rendered output files.
	#[serde(default = "default_output_extension")]
	pub output_extension: String,
	/// Text placed between composed snippets.
	#[serde(default = "default_separator")]
	pub separator: String,
}

impl Default for MargConfig {
	fn default() -> Self {
		Self {
			max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
			extension: default_extension(),
			output_extension: default_output_extension(),
			separator: default_separator(),
		}
	}
}

fn default_max_include_depth() -> usize {
	DEFAULT_MAX_INCLUDE_DEPTH
}

fn default_extension() -> String {
	DEFAULT_EXTENSION.to_string()
}

fn default_output_extension() -> String {
	DEFAULT_OUTPUT_EXTENSION.to_string()
}

fn default_separator() -> String {
	DEFAULT_SEPARATOR.to_string()
}

impl MargConfig {
	/// Resolve the first config file that exists under `root`.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if there is no config file.
	pub fn load(root: &Path) -> MargResult<Option<MargConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		tracing::debug!(path = %config_path.display(), "loading config");
		let content = std::fs::read_to_string(&config_path)?;
		let config: MargConfig =
			toml::from_str(&content).map_err(|e| MargError::ConfigParse(e.to_string()))?;

		Ok(Some(config))
	}

	/// Load the config at `root`, falling back to the defaults.
	pub fn load_or_default(root: &Path) -> MargResult<MargConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	/// Returns true when `path` has the configured template extension.
	pub fn is_template(&self, path: &Path) -> bool {
		path.extension()
			.and_then(|ext| ext.to_str())
			.is_some_and(|ext| ext == self.extension)
	}

	/// List the template files directly inside `dir`, sorted by file name.
	pub fn list_templates(&self, dir: &Path) -> MargResult<Vec<PathBuf>> {
		let mut templates = std::fs::read_dir(dir)?
			.map(|entry| entry.map(|entry| entry.path()))
			.collect::<Result<Vec<_>, _>>()?;
		templates.retain(|path| path.is_file() && self.is_template(path));
		templates.sort();

		Ok(templates)
	}
}
