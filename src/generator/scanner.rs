//! # Enum body scanner
//!
//! Walks the raw text of a `.proto` file from the opening brace of one enum
//! and yields the enum values it finds, together with the documentation
//! comments written around them.
//!
//! Only enum bodies are understood. The scanner does not parse the rest of
//! the schema language and makes a best effort on malformed input: an
//! unterminated block comment stops the scan for that body, keeping whatever
//! was found before it.
//!
//! ## Tokens
//!
//! [`Lexer`] makes a single forward pass and produces typed [`Token`]s:
//!
//! ```text
//! NONE = 0; // do nothing
//! ^^^^ ^    ^^^^^^^^^^^^^^ ^
//! |    |    LineComment    LineBreak
//! |    Assignment
//! identifier (text between the previous token and the `=`)
//! ```
//!
//! [`EnumScanner`] turns tokens into [`Member`]s. A comment on the same line
//! after an assignment documents that member; comments on their own lines
//! document the next member.

use memchr::{memchr, memchr3, memmem};
use serde::Serialize;
use tracing::debug;

use super::comments::CommentAccumulator;
use super::naming::IdentifierNormalizer;

/// One value of an upstream enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    /// Identifier as written in the `.proto` file, e.g. `CryptoTransfer`
    pub original_name: String,
    /// Constant-case name used in Java, e.g. `CRYPTO_TRANSFER`
    pub canonical_name: String,
    /// Documentation lines, stripped of comment markers
    pub doc_lines: Vec<String>,
}

/// Markers the lexer looks for, in tie-break priority order.
///
/// When two markers could start at the same offset the lower variant wins:
/// assignment, then line comment, then block comment, then terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkerKind {
    Assignment,
    LineComment,
    BlockComment,
    Terminator,
}

impl MarkerKind {
    /// Every marker, highest priority first.
    pub const BY_PRIORITY: [MarkerKind; 4] = [
        MarkerKind::Assignment,
        MarkerKind::LineComment,
        MarkerKind::BlockComment,
        MarkerKind::Terminator,
    ];

    /// Whether this marker starts at `bytes[at..]`.
    fn matches_at(self, bytes: &[u8], at: usize) -> bool {
        let rest = &bytes[at..];
        match self {
            MarkerKind::Assignment => rest.starts_with(b"="),
            MarkerKind::LineComment => rest.starts_with(b"//"),
            MarkerKind::BlockComment => rest.starts_with(b"/*"),
            MarkerKind::Terminator => rest.starts_with(b"}"),
        }
    }

    /// The highest-priority marker starting at `at`, if any.
    pub fn classify(bytes: &[u8], at: usize) -> Option<MarkerKind> {
        Self::BY_PRIORITY
            .into_iter()
            .find(|kind| kind.matches_at(bytes, at))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `=` between a member name and its number
    Assignment,
    /// `//` up to (not including) the end of the line
    LineComment,
    /// `/*` through the matching `*/`
    BlockComment,
    /// `/*` with no closer before the end of input
    UnterminatedComment,
    /// `\n`
    LineBreak,
    /// `}` closing the enum body
    Terminator,
}

impl From<MarkerKind> for TokenKind {
    fn from(kind: MarkerKind) -> Self {
        match kind {
            MarkerKind::Assignment => TokenKind::Assignment,
            MarkerKind::LineComment => TokenKind::LineComment,
            MarkerKind::BlockComment => TokenKind::BlockComment,
            MarkerKind::Terminator => TokenKind::Terminator,
        }
    }
}

/// A classified span of the source, in byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

/// Forward-only tokenizer over an enum body.
///
/// Text between tokens (identifiers, numbers, `;`) is not tokenized; callers
/// slice it out of the source using token offsets.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str, start: usize) -> Self {
        Self {
            text,
            pos: start.min(text.len()),
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn next_token(&mut self) -> Option<Token> {
        let bytes = self.text.as_bytes();
        loop {
            let rest = &bytes[self.pos..];
            let marker = memchr3(b'=', b'/', b'}', rest);
            // Only look for a line break in the span before the next marker
            let window = marker.map_or(rest, |m| &rest[..m]);
            if let Some(nl) = memchr(b'\n', window) {
                let start = self.pos + nl;
                self.pos = start + 1;
                return Some(self.token(TokenKind::LineBreak, start, self.pos));
            }

            let at = self.pos + marker?;
            let Some(kind) = MarkerKind::classify(bytes, at) else {
                // A lone `/`, e.g. inside an option value
                self.pos = at + 1;
                continue;
            };

            let token = match kind {
                MarkerKind::Assignment | MarkerKind::Terminator => {
                    Token {
                        kind: kind.into(),
                        start: at,
                        end: at + 1,
                    }
                }
                MarkerKind::LineComment => {
                    let end = memchr(b'\n', &bytes[at..]).map_or(bytes.len(), |n| at + n);
                    Token {
                        kind: TokenKind::LineComment,
                        start: at,
                        end,
                    }
                }
                MarkerKind::BlockComment => match memmem::find(&bytes[at + 2..], b"*/") {
                    Some(close) => Token {
                        kind: TokenKind::BlockComment,
                        start: at,
                        end: at + 2 + close + 2,
                    },
                    None => Token {
                        kind: TokenKind::UnterminatedComment,
                        start: at,
                        end: bytes.len(),
                    },
                },
            };
            self.pos = token.end;
            return Some(token);
        }
    }

    fn token(&self, kind: TokenKind, start: usize, end: usize) -> Token {
        Token { kind, start, end }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Why a scan stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEnd {
    /// The closing `}` of the enum body
    Terminator,
    /// End of the text with no closing brace
    EndOfInput,
    /// A `/*` with no `*/`; the rest of the body is ignored
    UnterminatedComment { offset: usize },
}

/// Text of a `.proto` file plus the start of one enum body.
#[derive(Debug, Clone, Copy)]
pub struct RawSource<'a> {
    text: &'a str,
    body_start: usize,
}

impl<'a> RawSource<'a> {
    /// Locate `enum <name> {` in `text`.
    pub fn locate(text: &'a str, enum_name: &str) -> Option<Self> {
        locate_enum_body(text, enum_name).map(|body_start| Self { text, body_start })
    }

    /// Offset just past the body's opening brace.
    pub fn body_start(&self) -> usize {
        self.body_start
    }

    pub fn scan(self, normalizer: &'a IdentifierNormalizer) -> EnumScanner<'a> {
        EnumScanner::new(self.text, self.body_start, normalizer)
    }
}

/// Offset just past the `{` opening `enum <name>`, if the enum exists.
///
/// The name must match a whole word, so `SubType` does not match
/// `enum SubTypeV2`.
pub fn locate_enum_body(text: &str, enum_name: &str) -> Option<usize> {
    let needle = format!("enum {enum_name}");
    let finder = memmem::Finder::new(needle.as_bytes());
    let bytes = text.as_bytes();

    for hit in finder.find_iter(bytes) {
        let before_ok = hit == 0 || !is_ident_byte(bytes[hit - 1]);
        let after = hit + needle.len();
        let after_ok = bytes.get(after).map_or(true, |b| !is_ident_byte(*b));
        if before_ok && after_ok {
            return memchr(b'{', &bytes[after..]).map(|brace| after + brace + 1);
        }
    }
    None
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Yields the members of one enum body, one per call to `next`.
///
/// The scanner owns all of its state (cursor, pending comment lines), so a
/// body is scanned exactly once and cannot be restarted.
#[derive(Debug)]
pub struct EnumScanner<'a> {
    text: &'a str,
    lexer: Lexer<'a>,
    normalizer: &'a IdentifierNormalizer,
    comments: CommentAccumulator,
    /// Where the next identifier starts
    ident_start: usize,
    /// Token read while finishing a member, handled on the next call
    pending: Option<Token>,
    end: Option<ScanEnd>,
}

impl<'a> EnumScanner<'a> {
    pub fn new(text: &'a str, start: usize, normalizer: &'a IdentifierNormalizer) -> Self {
        let lexer = Lexer::new(text, start);
        let ident_start = lexer.position();
        Self {
            text,
            lexer,
            normalizer,
            comments: CommentAccumulator::new(),
            ident_start,
            pending: None,
            end: None,
        }
    }

    /// How the scan ended, once it has.
    pub fn end(&self) -> Option<ScanEnd> {
        self.end
    }

    fn stop(&mut self, end: ScanEnd) {
        if let ScanEnd::UnterminatedComment { offset } = end {
            debug!(offset, "Unterminated block comment, halting enum scan");
        }
        self.comments.clear();
        self.end = Some(end);
    }

    fn next_token(&mut self) -> Option<Token> {
        self.pending.take().or_else(|| self.lexer.next_token())
    }

    fn block_body(&self, token: Token) -> &'a str {
        &self.text[token.start + 2..token.end - 2]
    }

    /// Collect same-line trailing comments, then build the member.
    fn finish_member(&mut self, assignment: Token) -> Option<Member> {
        let text = self.text;
        let original = text[self.ident_start..assignment.start].trim();
        let mut halted = None;

        while let Some(token) = self.lexer.next_token() {
            match token.kind {
                TokenKind::LineBreak => {
                    self.ident_start = token.end;
                    break;
                }
                TokenKind::LineComment => {
                    self.comments
                        .push_line_comment(&text[token.start..token.end]);
                    self.ident_start = token.end;
                }
                TokenKind::BlockComment => {
                    let body = self.block_body(token);
                    self.comments.push_block_comment(body);
                    self.ident_start = token.end;
                }
                TokenKind::UnterminatedComment => {
                    halted = Some(ScanEnd::UnterminatedComment {
                        offset: token.start,
                    });
                    break;
                }
                TokenKind::Terminator => {
                    self.pending = Some(token);
                    break;
                }
                // Part of the value, e.g. `FOO = 1 [deprecated = true];`
                TokenKind::Assignment => {}
            }
        }

        let doc_lines = self.comments.take();
        if let Some(end) = halted {
            self.stop(end);
        }

        if original.is_empty() {
            debug!(offset = assignment.start, "Skipping assignment without identifier");
            return None;
        }
        Some(Member {
            original_name: original.to_string(),
            canonical_name: self.normalizer.canonicalize(original),
            doc_lines,
        })
    }
}

impl Iterator for EnumScanner<'_> {
    type Item = Member;

    fn next(&mut self) -> Option<Member> {
        while self.end.is_none() {
            let Some(token) = self.next_token() else {
                self.stop(ScanEnd::EndOfInput);
                break;
            };
            match token.kind {
                TokenKind::LineBreak => self.ident_start = token.end,
                TokenKind::LineComment => {
                    self.comments
                        .push_line_comment(&self.text[token.start..token.end]);
                    self.ident_start = token.end;
                }
                TokenKind::BlockComment => {
                    let body = self.block_body(token);
                    self.comments.push_block_comment(body);
                    self.ident_start = token.end;
                }
                TokenKind::UnterminatedComment => {
                    self.stop(ScanEnd::UnterminatedComment {
                        offset: token.start,
                    });
                }
                TokenKind::Terminator => self.stop(ScanEnd::Terminator),
                TokenKind::Assignment => {
                    if let Some(member) = self.finish_member(token) {
                        return Some(member);
                    }
                }
            }
        }
        None
    }
}

/// Scan the body of `enum_name`, collecting every member.
///
/// Returns `None` when the enum is not declared in `text`.
pub fn scan_enum(
    text: &str,
    enum_name: &str,
    normalizer: &IdentifierNormalizer,
) -> Option<(Vec<Member>, Option<ScanEnd>)> {
    let source = RawSource::locate(text, enum_name)?;
    let mut scanner = source.scan(normalizer);
    let members: Vec<Member> = scanner.by_ref().collect();
    Some((members, scanner.end()))
}
