//! `marg_core` is the core library for the marg prompt template language. It
//! provides the tokenizer, parser, renderer and composer used to turn
//! `*.marg` templates into plain text prompts.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Template source
//!   -> Tokenizer (directives, text runs and metadata; comments dropped)
//!   -> Parser (nests if/else and for blocks into a syntax tree)
//!   -> Renderer (walks the tree against a context, expanding includes)
//!   -> Composer (loads templates by name, caches them, joins snippets)
//! ```
//!
//! ## Syntax
//!
//! ```text
//! @title: Greeting
//! {# comments are removed #}
//! Hello, {{user.name}}!
//! {% if admin %}You are an admin.{% else %}Welcome back.{% endif %}
//! {% for item in items %}- {{item}}
//! {% endfor %}
//! {% include "footer.marg" %}
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Configuration loading from `marg.toml`.
//! - [`context`] - Render contexts loaded from JSON, TOML and YAML.
//! - [`value`] - Scoped variable lookup, truthiness and value display.
//!
//! ## Key Types
//!
//! - [`Template`] - Parsed metadata plus the body syntax tree.
//! - [`Node`] - A node of the body syntax tree.
//! - [`Renderer`] - Renders a body against a context.
//! - [`Composer`] - A template store with a parse cache.
//! - [`MargConfig`] - Configuration loaded from `marg.toml`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use marg_core::Composer;
//! use serde_json::json;
//!
//! let mut composer = Composer::new("prompts");
//! let context = json!({ "name": "World" });
//!
//! let greeting = composer.render("greeting.marg", &context).unwrap();
//! let prompt = composer
//! 	.compose_prompt(&["system.marg", "task.marg"], &context, "\n\n")
//! 	.unwrap();
//! ```

pub use ast::*;
pub use composer::*;
pub use config::*;
pub use error::*;
pub use lexer::tokenize;
pub use parser::*;
pub use renderer::*;
pub use tokens::*;

mod ast;
mod composer;
pub mod config;
pub mod context;
#[allow(unused_assignments)]
mod error;
mod lexer;
mod parser;
mod renderer;
mod tokens;
pub mod value;

#[cfg(test)]
mod __fixtures;
