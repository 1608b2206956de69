use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;

use crate::Node;

/// Create a template store containing the given `(name, source)` files.
/// Names may contain `/` to place templates in subdirectories.
pub fn template_store(files: &[(&str, &str)]) -> TempDir {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));

	for (name, source) in files {
		let path = tmp.path().join(name);
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create_dir_all: {e}"));
		}
		std::fs::write(&path, source).unwrap_or_else(|e| panic!("write: {e}"));
	}

	tmp
}

pub fn user_context() -> Value {
	json!({
		"user": { "name": "Alice", "id": 42 },
		"items": ["Apple", "Banana"],
		"admin": true,
	})
}

pub fn if_node(condition: &str, true_block: Vec<Node>, false_block: Option<Vec<Node>>) -> Node {
	Node::If {
		condition: condition.to_string(),
		true_block,
		false_block,
	}
}

pub fn for_node(iterator: &str, iterable: &str, block: Vec<Node>) -> Node {
	Node::For {
		iterator: iterator.to_string(),
		iterable: iterable.to_string(),
		block,
	}
}
