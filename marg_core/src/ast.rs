use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

/// Document-level metadata collected from `@key: value` lines.
pub type Metadata = BTreeMap<String, String>;

/// A node in the template syntax tree. Block nodes own their children; no
/// node refers back to its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
	/// Literal text, rendered verbatim.
	Text { content: String },
	/// A dotted path looked up in the render context.
	Variable { name: String },
	/// A conditional on a single context key. `false_block` is `None` when
	/// the source has no `{% else %}`.
	If {
		condition: String,
		true_block: Vec<Node>,
		false_block: Option<Vec<Node>>,
	},
	/// A loop binding `iterator` to each element of the `iterable` sequence.
	For {
		iterator: String,
		iterable: String,
		block: Vec<Node>,
	},
	/// Inline expansion of another template file.
	Include { template_name: String },
}

impl Node {
	pub fn text(content: impl Into<String>) -> Self {
		Self::Text {
			content: content.into(),
		}
	}

	pub fn variable(name: impl Into<String>) -> Self {
		Self::Variable { name: name.into() }
	}

	pub fn include(template_name: impl Into<String>) -> Self {
		Self::Include {
			template_name: template_name.into(),
		}
	}
}

/// A parsed template: its metadata and the body that gets rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
	pub metadata: Metadata,
	pub body: Vec<Node>,
}

impl Template {
	/// Split the template into its `(metadata, body)` pair.
	pub fn into_parts(self) -> (Metadata, Vec<Node>) {
		(self.metadata, self.body)
	}
}
