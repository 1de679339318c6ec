//! Recognition of the two inline purity comment grammars (§6 "Inline
//! annotations").
//!
//! Both grammars are plain leading-comment text matches; neither requires
//! attaching semantic meaning to comment *kind*, so this module extracts raw
//! comment bodies from source text by span and works on strings from there.

use oxc_ast::Comment;
use oxc_span::Span;

const DOMAIN_PREFIX: &str = "tree-shaking";
const NO_SIDE_EFFECTS_DIRECTIVE: &str = "no-side-effects-when-called";

/// An index over a program's comments, queryable by "is there a recognized
/// purity marker immediately preceding this span".
pub struct CommentIndex<'a> {
    source_text: &'a str,
    comments: &'a [Comment],
}

impl<'a> CommentIndex<'a> {
    pub fn new(source_text: &'a str, comments: &'a [Comment]) -> Self {
        Self {
            source_text,
            comments,
        }
    }

    fn body_of(&self, comment: &Comment) -> &'a str {
        strip_comment_delimiters(comment.span.source_text(self.source_text))
    }

    /// True if a leading comment immediately before `span` (separated only by
    /// whitespace) has a body of exactly `@__PURE__` or `#__PURE__`.
    pub fn has_pure_call_marker(&self, span: Span) -> bool {
        self.leading_comments(span)
            .any(|comment| is_pure_marker(self.body_of(comment)))
    }

    /// True if a leading comment immediately before `span` declares the
    /// domain directive `tree-shaking no-side-effects-when-called`.
    pub fn has_no_side_effects_directive(&self, span: Span) -> bool {
        self.leading_comments(span)
            .any(|comment| is_no_side_effects_directive(self.body_of(comment)))
    }

    /// Comments whose span ends at or before `span.start`, with only
    /// whitespace in the source text between the comment and the node.
    fn leading_comments(&self, span: Span) -> impl Iterator<Item = &'a Comment> + '_ {
        self.comments.iter().filter(move |comment| {
            comment.span.end <= span.start
                && self
                    .source_text
                    .get(comment.span.end as usize..span.start as usize)
                    .is_some_and(|between| between.trim().is_empty())
        })
    }
}

fn strip_comment_delimiters(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_markers = trimmed
        .strip_prefix("//")
        .or_else(|| trimmed.strip_prefix("/*").and_then(|s| s.strip_suffix("*/")))
        .unwrap_or(trimmed);
    // JSDoc-style block comments prefix each continuation line with `*`.
    without_markers
        .lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

fn is_pure_marker(body: &str) -> bool {
    body == "@__PURE__" || body == "#__PURE__"
}

fn is_no_side_effects_directive(body: &str) -> bool {
    let mut tokens = body.split_whitespace();
    tokens.next() == Some(DOMAIN_PREFIX) && tokens.any(|tok| tok == NO_SIDE_EFFECTS_DIRECTIVE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_line_comment_markers() {
        assert_eq!(strip_comment_delimiters("// @__PURE__"), "@__PURE__");
    }

    #[test]
    fn strips_block_comment_markers() {
        assert_eq!(strip_comment_delimiters("/*#__PURE__*/"), "#__PURE__");
    }

    #[test]
    fn recognizes_domain_directive() {
        assert!(is_no_side_effects_directive(
            "tree-shaking no-side-effects-when-called"
        ));
        assert!(!is_no_side_effects_directive("no-side-effects-when-called"));
    }
}
