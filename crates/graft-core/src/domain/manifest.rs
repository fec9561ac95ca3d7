//! Manifest declaration handling.
//!
//! A manifest is a text file containing a line of the form
//! `<keyword> <identity>` (for Go: `module github.com/acme/api`). Only the
//! first such line matters; dependency pins and version pragmas pass through
//! untouched.

use std::ops::Range;

use crate::domain::{DomainError, Identity};

/// Find the identity declared on the first declaration line.
///
/// The identity is the first token after the keyword; a trailing `//`
/// comment is ignored.
pub fn declared_identity(content: &str, keyword: &str) -> Result<Identity, DomainError> {
    content
        .split('\n')
        .find_map(|line| declaration_token(line, keyword).map(|token| &line[token]))
        .ok_or_else(|| DomainError::MissingDeclaration {
            keyword: keyword.to_string(),
        })
        .and_then(Identity::new)
}

/// Rewrite the identity on the first declaration line.
///
/// Only the identity token changes. The rest of that line and every other
/// line, including line endings, are preserved byte for byte.
pub fn with_declared_identity(
    content: &str,
    keyword: &str,
    identity: &Identity,
) -> Result<String, DomainError> {
    let mut lines: Vec<String> = content.split('\n').map(str::to_owned).collect();

    let (line, token) = lines
        .iter_mut()
        .find_map(|line| declaration_token(line.as_str(), keyword).map(|token| (line, token)))
        .ok_or_else(|| DomainError::MissingDeclaration {
            keyword: keyword.to_string(),
        })?;

    line.replace_range(token, identity.as_str());
    Ok(lines.join("\n"))
}

/// Byte range of the declared token on `line`, if it is a declaration.
///
/// A declaration starts at column zero with `keyword` followed by a space or
/// tab. Surrounding double quotes are not part of the token.
fn declaration_token(line: &str, keyword: &str) -> Option<Range<usize>> {
    let rest = line.strip_prefix(keyword)?;
    if !rest.starts_with([' ', '\t']) {
        return None;
    }

    let start = line.len() - rest.trim_start().len();
    let body = &line[start..];
    let body = &body[..body.find("//").unwrap_or(body.len())];
    let len = body.find(char::is_whitespace).unwrap_or(body.len());

    let token = &line[start..start + len];
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        return Some(start + 1..start + len - 1);
    }
    Some(start..start + len)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GO_MOD: &str = "module github.com/test/example\n\ngo 1.21\n\nrequire (\n\tgithub.com/stretchr/testify v1.8.0\n)\n";

    #[test]
    fn extracts_first_declaration() {
        let id = declared_identity(GO_MOD, "module").unwrap();
        assert_eq!(id.as_str(), "github.com/test/example");
    }

    #[test]
    fn missing_declaration_is_error() {
        let err = declared_identity("go 1.21\n", "module").unwrap_err();
        assert!(matches!(err, DomainError::MissingDeclaration { .. }));
    }

    #[test]
    fn indented_lines_do_not_count() {
        let err = declared_identity("  module github.com/x/y\n", "module").unwrap_err();
        assert!(matches!(err, DomainError::MissingDeclaration { .. }));
    }

    #[test]
    fn only_first_line_is_rewritten() {
        let content = "module a/b\nmodule c/d\n";
        let new = Identity::new("x/y").unwrap();
        let out = with_declared_identity(content, "module", &new).unwrap();
        assert_eq!(out, "module x/y\nmodule c/d\n");
    }

    #[test]
    fn other_lines_pass_through() {
        let new = Identity::new("github.com/new/thing").unwrap();
        let out = with_declared_identity(GO_MOD, "module", &new).unwrap();
        assert_eq!(
            out,
            GO_MOD.replacen("module github.com/test/example", "module github.com/new/thing", 1)
        );
    }

    #[test]
    fn crlf_is_preserved() {
        let new = Identity::new("x/y").unwrap();
        let out = with_declared_identity("module a/b\r\ngo 1.22\r\n", "module", &new).unwrap();
        assert_eq!(out, "module x/y\r\ngo 1.22\r\n");
    }

    #[test]
    fn trailing_comment_is_not_part_of_identity() {
        let content = "module github.com/old/module // template\n\ngo 1.22\n";
        let id = declared_identity(content, "module").unwrap();
        assert_eq!(id.as_str(), "github.com/old/module");

        let new = Identity::new("github.com/acme/shop").unwrap();
        let out = with_declared_identity(content, "module", &new).unwrap();
        assert_eq!(out, "module github.com/acme/shop // template\n\ngo 1.22\n");
    }

    #[test]
    fn tab_after_keyword_is_a_declaration() {
        let content = "module\tgithub.com/old/module\n";
        let id = declared_identity(content, "module").unwrap();
        assert_eq!(id.as_str(), "github.com/old/module");

        let new = Identity::new("x/y").unwrap();
        let out = with_declared_identity(content, "module", &new).unwrap();
        assert_eq!(out, "module\tx/y\n");
    }

    #[test]
    fn quoted_identity_keeps_its_quotes() {
        let content = "module \"github.com/old/module\"\n";
        let id = declared_identity(content, "module").unwrap();
        assert_eq!(id.as_str(), "github.com/old/module");

        let new = Identity::new("x/y").unwrap();
        let out = with_declared_identity(content, "module", &new).unwrap();
        assert_eq!(out, "module \"x/y\"\n");
    }

    #[test]
    fn keyword_prefix_of_longer_word_is_not_a_declaration() {
        let err = declared_identity("modules a/b\n", "module").unwrap_err();
        assert!(matches!(err, DomainError::MissingDeclaration { .. }));
    }

    #[test]
    fn set_then_extract_round_trips() {
        let new = Identity::new("github.com/round/trip").unwrap();
        let out = with_declared_identity(GO_MOD, "module", &new).unwrap();
        assert_eq!(declared_identity(&out, "module").unwrap(), new);
    }
}
