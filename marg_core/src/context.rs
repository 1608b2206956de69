//! Loading render contexts from JSON, TOML and YAML.

use std::path::Path;
use std::path::PathBuf;

use serde_json::Value;

use crate::MargError;
use crate::MargResult;

/// Parse `content` as a context value in the given format. Formats are
/// matched case-insensitively: `json`, `toml`, `yaml` and `yml`.
pub fn parse_context(content: &str, format: &str) -> MargResult<Value> {
	match format.to_ascii_lowercase().as_str() {
		"json" => serde_json::from_str(content).map_err(|e| MargError::ContextParse(e.to_string())),
		"toml" => {
			let value: toml::Value =
				toml::from_str(content).map_err(|e| MargError::ContextParse(e.to_string()))?;
			toml_to_json(value)
		}
		"yaml" | "yml" => {
			serde_yaml_ng::from_str(content).map_err(|e| MargError::ContextParse(e.to_string()))
		}
		other => Err(MargError::UnsupportedContextFormat(other.to_string())),
	}
}

/// Read a context file, choosing the format from its extension.
pub fn load_context_file(path: &Path) -> MargResult<Value> {
	let format = path
		.extension()
		.and_then(|ext| ext.to_str())
		.unwrap_or("")
		.to_ascii_lowercase();
	let content = std::fs::read_to_string(path).map_err(|e| {
		MargError::ContextFile {
			path: path.display().to_string(),
			reason: e.to_string(),
		}
	})?;

	tracing::debug!(path = %path.display(), format = %format, "loading context file");

	match parse_context(&content, &format) {
		Err(MargError::ContextParse(reason)) => {
			Err(MargError::ContextFile {
				path: path.display().to_string(),
				reason,
			})
		}
		result => result,
	}
}

/// The `.json` file next to a template, e.g. `greeting.json` for
/// `greeting.marg`, when it exists.
pub fn sibling_context_path(template_path: &Path) -> Option<PathBuf> {
	let path = template_path.with_extension("json");
	(path != template_path && path.is_file()).then_some(path)
}

/// Load the sibling `.json` context of a template. Returns `None` when the
/// template has no sibling context file.
pub fn sibling_context(template_path: &Path) -> MargResult<Option<Value>> {
	sibling_context_path(template_path)
		.map(|path| load_context_file(&path))
		.transpose()
}

fn toml_to_json(value: toml::Value) -> MargResult<Value> {
	let json = match value {
		toml::Value::String(s) => Value::String(s),
		toml::Value::Integer(i) => Value::Number(i.into()),
		toml::Value::Float(f) => {
			Value::Number(serde_json::Number::from_f64(f).ok_or_else(|| {
				MargError::ContextParse(format!("`{f}` cannot be represented in a context"))
			})?)
		}
		toml::Value::Boolean(b) => Value::Bool(b),
		toml::Value::Datetime(dt) => Value::String(dt.to_string()),
		toml::Value::Array(items) => {
			Value::Array(items.into_iter().map(toml_to_json).collect::<MargResult<_>>()?)
		}
		toml::Value::Table(table) => {
			let mut map = serde_json::Map::new();
			for (key, value) in table {
				map.insert(key, toml_to_json(value)?);
			}
			Value::Object(map)
		}
	};

	Ok(json)
}
