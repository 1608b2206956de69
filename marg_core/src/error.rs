use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum MargError {
	#[error(transparent)]
	#[diagnostic(code(marg::io_error))]
	Io(#[from] std::io::Error),

	#[error("template not found: `{path}`")]
	#[diagnostic(
		code(marg::template_not_found),
		help("template and include names are resolved relative to the template directory")
	)]
	TemplateNotFound { path: String },

	#[error("include depth limit of {limit} exceeded while including `{name}`")]
	#[diagnostic(
		code(marg::include_depth),
		help("check for templates that include themselves, directly or through other templates")
	)]
	IncludeDepthExceeded { name: String, limit: usize },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(marg::config_parse),
		help("check that marg.toml is valid TOML with only the documented keys")
	)]
	ConfigParse(String),

	#[error("failed to load context file `{path}`: {reason}")]
	#[diagnostic(code(marg::context_file))]
	ContextFile { path: String, reason: String },

	#[error("failed to parse context: {0}")]
	#[diagnostic(
		code(marg::context_parse),
		help("inline context must be a JSON value, e.g. '{{\"name\": \"World\"}}'")
	)]
	ContextParse(String),

	#[error("unsupported context file format: `{0}`")]
	#[diagnostic(
		code(marg::unsupported_format),
		help("supported formats: json, toml, yaml, yml")
	)]
	UnsupportedContextFormat(String),

	#[error("`{0}` is neither a file nor a directory")]
	#[diagnostic(code(marg::invalid_path))]
	NotAFileOrDirectory(String),

	#[error("no `*.{extension}` templates found in directory: `{path}`")]
	#[diagnostic(
		code(marg::no_templates),
		help("set `extension` in marg.toml if your templates use a different file extension")
	)]
	NoTemplatesFound { path: String, extension: String },
}

impl MargError {
	/// Map an I/O failure while reading a template to the not-found
	/// condition when the file is missing.
	pub(crate) fn from_read(error: std::io::Error, path: &std::path::Path) -> Self {
		if error.kind() == std::io::ErrorKind::NotFound {
			Self::TemplateNotFound {
				path: path.display().to_string(),
			}
		} else {
			Self::Io(error)
		}
	}

	/// Returns true for the not-found condition.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::TemplateNotFound { .. })
	}
}

pub type MargResult<T> = Result<T, MargError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
