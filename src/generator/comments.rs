// Documentation comment handling
//
// Collects the `//` and `/* */` comments that surround enum values in a
// `.proto` body and renders them back out as Javadoc.

use askama::Template;

use super::assembler::indent;

/// Ordered buffer of documentation lines waiting for their enum member.
///
/// Lines are stored exactly as stripped from the source. Text substitutions
/// happen when the block is rendered, see [`render_doc_block`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentAccumulator {
    lines: Vec<String>,
}

impl CommentAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stripped line. Empty lines are dropped.
    pub fn push(&mut self, line: &str) {
        if !line.is_empty() {
            self.lines.push(line.to_string());
        }
    }

    /// Append the text of a `//` comment (marker included).
    pub fn push_line_comment(&mut self, raw: &str) {
        self.push(strip_line_comment(raw));
    }

    /// Append every non-empty line of a block comment body.
    pub fn push_block_comment(&mut self, body: &str) {
        for line in block_comment_lines(body) {
            self.push(line);
        }
    }

    /// Hand the buffered lines to the caller and leave the buffer empty.
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Text of a `//` comment without the marker and surrounding whitespace.
pub fn strip_line_comment(raw: &str) -> &str {
    raw.trim_start()
        .strip_prefix("//")
        .unwrap_or(raw)
        .trim()
}

/// Lines of a block comment body (the text between `/*` and `*/`).
///
/// Each line is trimmed and loses at most one leading `*`; empty results are
/// skipped.
pub fn block_comment_lines(body: &str) -> impl Iterator<Item = &str> {
    body.split('\n')
        .map(|line| {
            let line = line.trim();
            line.strip_prefix('*').map_or(line, str::trim)
        })
        .filter(|line| !line.is_empty())
}

/// Literal substitutions applied to each documentation line on output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextReplacements {
    pairs: Vec<(String, String)>,
}

impl TextReplacements {
    pub fn new<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(a, b)| (a.into(), b.into()))
                .collect(),
        }
    }

    /// Apply every pair in order.
    pub fn apply(&self, text: &str) -> String {
        self.pairs
            .iter()
            .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[derive(Template)]
#[template(
    source = "{{ pad }}/**{% for line in lines %}\n{{ pad }} * {{ line }}{% endfor %}\n{{ pad }} */",
    ext = "txt",
    escape = "none"
)]
struct DocBlock<'a> {
    pad: &'a str,
    lines: &'a [String],
}

/// Render `lines` as a Javadoc block at the given indent level.
///
/// Returns an empty string when there is nothing to document.
pub fn render_doc_block(
    lines: &[String],
    level: usize,
    replacements: &TextReplacements,
) -> anyhow::Result<String> {
    if lines.is_empty() {
        return Ok(String::new());
    }
    let lines: Vec<String> = lines.iter().map(|l| replacements.apply(l)).collect();
    let pad = indent(level);
    let mut rendered = DocBlock {
        pad: &pad,
        lines: &lines,
    }
    .render()?;
    rendered.push('\n');
    Ok(rendered)
}
