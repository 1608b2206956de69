use std::fmt::Display;

/// A directive or run of text recognised by the tokenizer. Metadata lines and
/// comments never become tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
	/// Literal text between directives.
	Text(String),
	/// `{{name}}` or `{{a.b.c}}`
	Variable(String),
	/// `{% if condition %}`
	IfStart(String),
	/// `{% else %}`
	Else,
	/// `{% endif %}`
	EndIf,
	/// `{% for iterator in iterable %}`
	ForStart { iterator: String, iterable: String },
	/// `{% endfor %}`
	EndFor,
	/// `{% include "name" %}`
	Include(String),
}

/// The payload-free discriminant of a [`Token`], used by the parser's stop
/// sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
	Text,
	Variable,
	IfStart,
	Else,
	EndIf,
	ForStart,
	EndFor,
	Include,
}

impl Token {
	pub fn kind(&self) -> TokenKind {
		match self {
			Token::Text(_) => TokenKind::Text,
			Token::Variable(_) => TokenKind::Variable,
			Token::IfStart(_) => TokenKind::IfStart,
			Token::Else => TokenKind::Else,
			Token::EndIf => TokenKind::EndIf,
			Token::ForStart { .. } => TokenKind::ForStart,
			Token::EndFor => TokenKind::EndFor,
			Token::Include(_) => TokenKind::Include,
		}
	}
}

impl Display for Token {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Token::Text(content) => write!(f, "{content}"),
			Token::Variable(name) => write!(f, "{{{{{name}}}}}"),
			Token::IfStart(condition) => write!(f, "{{% if {condition} %}}"),
			Token::Else => write!(f, "{{% else %}}"),
			Token::EndIf => write!(f, "{{% endif %}}"),
			Token::ForStart { iterator, iterable } => {
				write!(f, "{{% for {iterator} in {iterable} %}}")
			}
			Token::EndFor => write!(f, "{{% endfor %}}"),
			Token::Include(name) => write!(f, "{{% include \"{name}\" %}}"),
		}
	}
}
