//! Import path rewriting.
//!
//! Line-oriented recognition of quoted import paths. This is deliberately not
//! a parser: the only contract is "every quoted path inside an import
//! statement that belongs to the old identity now belongs to the new one".
//!
//! ```text
//!            trimmed == opener
//!   Outside ───────────────────▶ InImportBlock
//!      ▲  │                           │
//!      │  │ starts with prefix        │ trimmed == closer
//!      │  ▼                           │
//!   SingleLineImport ◀────────────────┘ (back to Outside)
//! ```
//!
//! Candidate lines (single-line imports and lines inside a block) are scanned
//! for paired double quotes, left to right, non-greedy.

use std::ops::Range;

use crate::domain::{DomainError, Identity};

/// Import statement tokens for a source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSyntax {
    /// Prefix of a single-line import statement (trimmed line).
    pub single_line_prefix: &'static str,
    /// A trimmed line equal to this opens a multi-line import block.
    pub block_opener: &'static str,
    /// A trimmed line equal to this closes the block.
    pub block_closer: &'static str,
}

/// Go import syntax.
pub const GO_IMPORTS: ImportSyntax = ImportSyntax {
    single_line_prefix: "import ",
    block_opener: "import (",
    block_closer: ")",
};

/// Where the scanner is relative to import statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    Outside,
    SingleLineImport,
    InImportBlock,
}

impl LineState {
    pub fn is_candidate(self) -> bool {
        !matches!(self, Self::Outside)
    }
}

/// Tracks block membership across lines.
#[derive(Debug)]
pub struct ImportScanner {
    syntax: ImportSyntax,
    in_block: bool,
}

impl ImportScanner {
    pub fn new(syntax: ImportSyntax) -> Self {
        Self {
            syntax,
            in_block: false,
        }
    }

    /// Classify `line` and advance the block state.
    ///
    /// Opener and closer lines are reported as `Outside`: they hold no paths.
    pub fn classify(&mut self, line: &str) -> LineState {
        let trimmed = line.trim();

        if trimmed == self.syntax.block_opener {
            self.in_block = true;
            return LineState::Outside;
        }
        if self.in_block {
            if trimmed == self.syntax.block_closer {
                self.in_block = false;
                return LineState::Outside;
            }
            return LineState::InImportBlock;
        }
        if trimmed.starts_with(self.syntax.single_line_prefix) {
            return LineState::SingleLineImport;
        }
        LineState::Outside
    }
}

/// A quoted import path found on a candidate line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReference<'a> {
    pub path: &'a str,
    pub alias: Option<&'a str>,
    /// Byte range of `path` within the line, quotes excluded.
    pub span: Range<usize>,
}

/// Find every quoted substring on `line`, pairing quotes left to right.
///
/// An unpaired trailing quote is returned as `Err(position)`.
pub fn quoted_spans(line: &str) -> Result<Vec<Range<usize>>, usize> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    while let Some(open) = line[cursor..].find('"') {
        let open = cursor + open;
        let Some(close) = line[open + 1..].find('"') else {
            return Err(open);
        };
        let close = open + 1 + close;
        spans.push(open + 1..close);
        cursor = close + 1;
    }

    Ok(spans)
}

/// Quoted paths on `line` together with their alias, if any.
pub fn import_references(line: &str) -> Result<Vec<ImportReference<'_>>, usize> {
    let spans = quoted_spans(line)?;
    let mut refs = Vec::with_capacity(spans.len());
    let mut previous_end = 0;

    for span in spans {
        let before = line[previous_end..span.start - 1].trim();
        let before = before
            .strip_prefix("import")
            .map(str::trim_start)
            .unwrap_or(before);
        let alias = before
            .split_whitespace()
            .last()
            .filter(|token| !token.is_empty());

        previous_end = span.end + 1;
        refs.push(ImportReference {
            path: &line[span.clone()],
            alias,
            span,
        });
    }

    Ok(refs)
}

/// Result of rewriting one file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    pub content: String,
    pub replacements: usize,
}

impl RewriteOutcome {
    pub fn changed(&self) -> bool {
        self.replacements > 0
    }
}

/// Rewrite every import path under `old` to live under `new`.
///
/// Candidate lines that mention `old` but contain a raw string, an escape or
/// an unterminated quote are rejected instead of being guessed at.
pub fn rewrite_imports(
    content: &str,
    old: &Identity,
    new: &Identity,
    syntax: ImportSyntax,
) -> Result<RewriteOutcome, DomainError> {
    if old == new {
        return Err(DomainError::IdentityUnchanged {
            identity: old.to_string(),
        });
    }

    let mut scanner = ImportScanner::new(syntax);
    let mut replacements = 0;
    let mut lines: Vec<String> = Vec::new();

    for (index, line) in content.split('\n').enumerate() {
        let state = scanner.classify(line);
        if !state.is_candidate() || !line.contains(old.as_str()) {
            lines.push(line.to_string());
            continue;
        }

        let (rewritten, count) = rewrite_line(line, old, new).map_err(|reason| {
            DomainError::UnsupportedImportLiteral {
                line: index + 1,
                reason,
            }
        })?;
        replacements += count;
        lines.push(rewritten);
    }

    Ok(RewriteOutcome {
        content: lines.join("\n"),
        replacements,
    })
}

/// Byte offset where a trailing `//` comment starts, or the line length.
///
/// Quotes pair the same way as in [`quoted_spans`], so `//` inside a path
/// does not count.
pub fn code_end(line: &str) -> usize {
    let mut in_quote = false;
    let mut previous_slash = false;

    for (index, ch) in line.char_indices() {
        match ch {
            '"' => {
                in_quote = !in_quote;
                previous_slash = false;
            }
            '/' if !in_quote && previous_slash => return index - 1,
            '/' => previous_slash = !in_quote,
            _ => previous_slash = false,
        }
    }
    line.len()
}

/// Rewrite the quoted paths on a single candidate line.
///
/// Only the code before a trailing comment is scanned; the comment is kept.
fn rewrite_line(line: &str, old: &Identity, new: &Identity) -> Result<(String, usize), String> {
    let code = &line[..code_end(line)];
    if code.contains('`') {
        return Err("raw string literals are not supported in import paths".into());
    }

    let refs = import_references(code)
        .map_err(|pos| format!("unterminated quoted path at column {}", pos + 1))?;

    let mut out = String::with_capacity(line.len());
    let mut cursor = 0;
    let mut count = 0;

    for reference in refs {
        if reference.path.contains('\\') {
            return Err(format!("escape sequence in import path \"{}\"", reference.path));
        }
        if let Some(rebased) = old.rebase(reference.path, new) {
            out.push_str(&line[cursor..reference.span.start]);
            out.push_str(&rebased);
            cursor = reference.span.end;
            count += 1;
        }
    }
    out.push_str(&line[cursor..]);

    Ok((out, count))
}
