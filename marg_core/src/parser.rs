use std::path::Path;

use crate::MargError;
use crate::MargResult;
use crate::Node;
use crate::Template;
use crate::lexer::tokenize;
use crate::tokens::Token;
use crate::tokens::TokenKind;

/// Deepest `if`/`for` nesting the parser builds. Block tags opened below this
/// level are kept as text.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parse a template source into its metadata and syntax tree.
///
/// Parsing never fails. Unterminated blocks are closed at the end of the
/// input, stray `else`, `endif` or `endfor` tags are dropped, and blocks
/// nested deeper than [`MAX_NESTING_DEPTH`] are written out as text.
pub fn parse(source: impl AsRef<str>) -> Template {
	let (metadata, tokens) = tokenize(source.as_ref());
	let body = parse_tokens(&tokens);

	Template { metadata, body }
}

/// Read and parse a template file. A missing file is reported as
/// [`MargError::TemplateNotFound`].
pub fn parse_file(path: &Path) -> MargResult<Template> {
	let source = std::fs::read_to_string(path).map_err(|e| MargError::from_read(e, path))?;
	Ok(parse(source))
}

/// Build a syntax tree from an already tokenized stream.
pub fn parse_tokens(tokens: &[Token]) -> Vec<Node> {
	let mut parser = TokenParser {
		tokens,
		pos: 0,
		depth: 0,
		flattened: 0,
	};
	let nodes = parser.parse_nodes(&[]);

	if parser.flattened > 0 {
		tracing::warn!(
			blocks = parser.flattened,
			max_depth = MAX_NESTING_DEPTH,
			"block nesting too deep, kept inner block tags as text"
		);
	}

	tracing::trace!(nodes = nodes.len(), "parsed template body");
	nodes
}

/// Recursive-descent parser over a flat token list.
struct TokenParser<'a> {
	tokens: &'a [Token],
	/// Index of the next token to consume.
	pos: usize,
	/// Number of enclosing `if`/`for` blocks.
	depth: usize,
	/// Block tags kept as text because of the nesting limit.
	flattened: usize,
}

impl TokenParser<'_> {
	fn peek_kind(&self) -> Option<TokenKind> {
		self.tokens.get(self.pos).map(Token::kind)
	}

	/// Consume the next token when it has the given kind.
	fn eat(&mut self, kind: TokenKind) -> bool {
		if self.peek_kind() == Some(kind) {
			self.pos += 1;
			true
		} else {
			false
		}
	}

	/// Parse a nested block, one level deeper than the current one.
	fn parse_block(&mut self, stop: &[TokenKind]) -> Vec<Node> {
		self.depth += 1;
		let nodes = self.parse_nodes(stop);
		self.depth -= 1;
		nodes
	}

	/// Parse nodes until a token in `stop` or the end of the stream. The stop
	/// token itself is left for the caller.
	fn parse_nodes(&mut self, stop: &[TokenKind]) -> Vec<Node> {
		let tokens = self.tokens;
		let mut nodes = vec![];

		while let Some(token) = tokens.get(self.pos) {
			if stop.contains(&token.kind()) {
				break;
			}

			self.pos += 1;

			match token {
				Token::Text(content) => push_text(&mut nodes, content),
				Token::Variable(name) => nodes.push(Node::variable(name.as_str())),
				Token::Include(name) => nodes.push(Node::include(name.as_str())),
				Token::IfStart(_) | Token::ForStart { .. } if self.depth >= MAX_NESTING_DEPTH => {
					self.flattened += 1;
					push_text(&mut nodes, &token.to_string());
				}
				Token::IfStart(condition) => {
					let true_block = self.parse_block(&[TokenKind::Else, TokenKind::EndIf]);
					let false_block = self
						.eat(TokenKind::Else)
						.then(|| self.parse_block(&[TokenKind::EndIf]));
					self.eat(TokenKind::EndIf);

					nodes.push(Node::If {
						condition: condition.clone(),
						true_block,
						false_block,
					});
				}
				Token::ForStart { iterator, iterable } => {
					let block = self.parse_block(&[TokenKind::EndFor]);
					self.eat(TokenKind::EndFor);

					nodes.push(Node::For {
						iterator: iterator.clone(),
						iterable: iterable.clone(),
						block,
					});
				}
				// Closing tags outside of their block.
				Token::Else | Token::EndIf | Token::EndFor => {}
			}
		}

		nodes
	}
}

/// Append text, merging with the previous text node when possible.
fn push_text(nodes: &mut Vec<Node>, text: &str) {
	if let Some(Node::Text { content }) = nodes.last_mut() {
		content.push_str(text);
	} else {
		nodes.push(Node::text(text));
	}
}
