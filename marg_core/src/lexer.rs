use std::ops::Range;
use std::sync::LazyLock;

use logos::Logos;
use regex::Captures;
use regex::Regex;

use crate::Metadata;
use crate::tokens::Token;

/// Raw tokens produced by logos. Every directive, comment and metadata line
/// starts with `@` or `{`, so those bytes are the only positions where a
/// pattern can match. Everything else is plain text.
#[derive(Logos, Debug, PartialEq)]
enum RawToken {
	#[token("@")]
	At,
	#[token("{")]
	BraceOpen,
	#[regex(r"[^@{]+")]
	Plain,
}

/// What a pattern does with its match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternKind {
	Metadata,
	Comment,
	IfStart,
	Else,
	EndIf,
	ForStart,
	EndFor,
	Include,
	Variable,
}

struct Pattern {
	kind: PatternKind,
	regex: Regex,
}

impl Pattern {
	fn new(kind: PatternKind, source: &str) -> Self {
		Self {
			kind,
			regex: Regex::new(source).unwrap_or_else(|e| panic!("invalid {kind:?} pattern: {e}")),
		}
	}
}

/// Directive patterns in priority order. Each one is anchored to the start of
/// the haystack, so it only matches at the cursor. Everything except variables
/// swallows a single trailing newline.
static PATTERNS: LazyLock<[Pattern; 9]> = LazyLock::new(|| {
	[
		Pattern::new(PatternKind::Metadata, r"^@(\w+):\s*(.+?)(?:\n|$)"),
		Pattern::new(PatternKind::Comment, r"(?s)^\{#.*?#\}\n?"),
		Pattern::new(PatternKind::IfStart, r"^\{%\s*if\s+(\w+)\s*%\}\n?"),
		Pattern::new(PatternKind::Else, r"^\{%\s*else\s*%\}\n?"),
		Pattern::new(PatternKind::EndIf, r"^\{%\s*endif\s*%\}\n?"),
		Pattern::new(
			PatternKind::ForStart,
			r"^\{%\s*for\s+(\w+)\s+in\s+(\w+)\s*%\}\n?",
		),
		Pattern::new(PatternKind::EndFor, r"^\{%\s*endfor\s*%\}\n?"),
		Pattern::new(PatternKind::Include, r#"^\{%\s*include\s+"([^"]+)"\s*%\}\n?"#),
		Pattern::new(PatternKind::Variable, r"^\{\{([\w.]+)\}\}"),
	]
});

/// Walks the candidate positions found by logos and tries the directive
/// patterns at each one, collecting the text in between.
struct TokenWalker<'a> {
	/// The full template source.
	source: &'a str,
	/// Candidate tokens and their byte spans.
	raw_tokens: Vec<(Result<RawToken, ()>, Range<usize>)>,
	/// Byte offset up to which the source has been consumed by directives.
	cursor: usize,
	/// Start of the text run that has not been emitted yet.
	text_start: usize,
	/// Collected tokens.
	tokens: Vec<Token>,
	/// Collected metadata. Later keys overwrite earlier ones.
	metadata: Metadata,
}

impl<'a> TokenWalker<'a> {
	fn new(source: &'a str) -> Self {
		let raw_tokens: Vec<_> = RawToken::lexer(source).spanned().collect();

		Self {
			source,
			raw_tokens,
			cursor: 0,
			text_start: 0,
			tokens: vec![],
			metadata: Metadata::new(),
		}
	}

	fn process(&mut self) {
		for index in 0..self.raw_tokens.len() {
			let (result, span) = &self.raw_tokens[index];

			// Anything before the cursor was swallowed by a directive.
			if span.start < self.cursor {
				continue;
			}

			if matches!(result, Ok(RawToken::At | RawToken::BraceOpen)) {
				let start = span.start;
				self.try_directive(start);
			}
		}

		self.push_text(self.source.len());
	}

	/// Try every pattern at `start` in priority order. The first match wins.
	fn try_directive(&mut self, start: usize) {
		let rest = &self.source[start..];

		for pattern in PATTERNS.iter() {
			let Some(captures) = pattern.regex.captures(rest) else {
				continue;
			};

			let end = start + captures.get(0).map_or(0, |m| m.end());
			self.push_text(start);
			self.apply(pattern.kind, &captures);
			self.cursor = end;
			self.text_start = end;
			return;
		}
	}

	/// Emit the pending text run ending at `end`, if it is not empty.
	fn push_text(&mut self, end: usize) {
		if end > self.text_start {
			let text = &self.source[self.text_start..end];
			self.tokens.push(Token::Text(text.to_string()));
		}
		self.text_start = end;
	}

	fn apply(&mut self, kind: PatternKind, captures: &Captures<'_>) {
		let group = |index: usize| {
			captures
				.get(index)
				.map_or_else(String::new, |m| m.as_str().to_string())
		};

		match kind {
			PatternKind::Metadata => {
				self.metadata.insert(group(1), group(2).trim().to_string());
			}
			PatternKind::Comment => {}
			PatternKind::IfStart => self.tokens.push(Token::IfStart(group(1))),
			PatternKind::Else => self.tokens.push(Token::Else),
			PatternKind::EndIf => self.tokens.push(Token::EndIf),
			PatternKind::ForStart => {
				self.tokens.push(Token::ForStart {
					iterator: group(1),
					iterable: group(2),
				});
			}
			PatternKind::EndFor => self.tokens.push(Token::EndFor),
			PatternKind::Include => self.tokens.push(Token::Include(group(1))),
			PatternKind::Variable => self.tokens.push(Token::Variable(group(1))),
		}
	}
}

/// Split a template source into its metadata and a flat token stream.
///
/// Comments and metadata lines are consumed here and never reach the parser.
/// Adjacent text tokens are only produced when a comment or metadata line
/// separates them; merging them is left to the parser.
pub fn tokenize(source: &str) -> (Metadata, Vec<Token>) {
	let mut walker = TokenWalker::new(source);
	walker.process();

	tracing::trace!(
		tokens = walker.tokens.len(),
		metadata = walker.metadata.len(),
		"tokenized template"
	);

	(walker.metadata, walker.tokens)
}
