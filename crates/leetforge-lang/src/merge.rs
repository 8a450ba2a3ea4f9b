//! Block merge engine
//!
//! A generated file is an ordered arena of segments: plain boilerplate and
//! named regions bounded by `<comment> @lc <name>=begin` / `<comment> @lc
//! <name>=end` lines. The `code` region holds the user's solution. When a
//! file already exists, the content of every region named in the new layout
//! is carried over byte for byte; everything else is rendered fresh.

use std::{ops::Range, path::Path};

use leetforge_config::REGION_MARKER_TAG;
use tracing::debug;

use crate::error::{LangError, Result};

pub use leetforge_config::CODE_REGION;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Begin,
    End,
}

/// Recognize a region marker line, returning the region name and edge
pub fn parse_marker(line: &str) -> Option<(&str, Edge)> {
    let line = line.trim();
    let at = line.find(REGION_MARKER_TAG)?;
    // Only a comment token may precede the tag
    if line[..at].trim().contains(char::is_whitespace) {
        return None;
    }
    let rest = &line[at + REGION_MARKER_TAG.len()..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let (name, edge) = rest.trim().split_once('=')?;
    let edge = match edge.trim() {
        "begin" => Edge::Begin,
        "end" => Edge::End,
        _ => return None,
    };
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    valid.then_some((name, edge))
}

/// A span of the scanned text; `marker` is set for region content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub marker: Option<String>,
    pub span: Range<usize>,
}

/// An existing file split into segments
#[derive(Debug)]
pub struct SegmentedFile<'a> {
    text: &'a str,
    segments: Vec<Segment>,
}

impl<'a> SegmentedFile<'a> {
    /// Split `text` into segments.
    ///
    /// Unmatched, nested or repeated markers are errors: the caller must not
    /// guess which text belongs to the user.
    pub fn scan(text: &'a str) -> std::result::Result<Self, String> {
        let mut segments = Vec::new();
        let mut open: Option<(&str, usize, usize)> = None;
        let mut outside_start = 0;
        let mut offset = 0;

        for (idx, line) in text.split_inclusive('\n').enumerate() {
            let line_no = idx + 1;
            let line_start = offset;
            offset += line.len();

            let Some((name, edge)) = parse_marker(line) else {
                continue;
            };
            match (edge, open) {
                (Edge::Begin, Some((outer, _, outer_line))) => {
                    return Err(format!(
                        "line {line_no}: begin marker for {name} inside region {outer} opened at line {outer_line}"
                    ));
                }
                (Edge::Begin, None) => {
                    if segments
                        .iter()
                        .any(|s: &Segment| s.marker.as_deref() == Some(name))
                    {
                        return Err(format!("line {line_no}: region {name} appears twice"));
                    }
                    if outside_start < line_start {
                        segments.push(Segment {
                            marker: None,
                            span: outside_start..line_start,
                        });
                    }
                    open = Some((name, offset, line_no));
                }
                (Edge::End, Some((opened, content_start, _))) if opened == name => {
                    segments.push(Segment {
                        marker: Some(name.to_string()),
                        span: content_start..line_start,
                    });
                    open = None;
                    outside_start = offset;
                }
                (Edge::End, _) => {
                    return Err(format!(
                        "line {line_no}: end marker for {name} without matching begin"
                    ));
                }
            }
        }

        if let Some((name, _, line_no)) = open {
            return Err(format!(
                "line {line_no}: begin marker for {name} has no matching end"
            ));
        }
        if outside_start < text.len() {
            segments.push(Segment {
                marker: None,
                span: outside_start..text.len(),
            });
        }
        Ok(Self { text, segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Content of a named region, exactly as it appears in the file
    pub fn region(&self, name: &str) -> Option<&'a str> {
        self.segments
            .iter()
            .find(|s| s.marker.as_deref() == Some(name))
            .map(|s| &self.text[s.span.clone()])
    }
}

/// A piece of the file layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// Boilerplate, recomputed every run
    Text(String),
    /// Preserved-by-name region with its fresh default body
    Region {
        name: String,
        comment: String,
        body: String,
    },
}

impl Part {
    pub fn region(name: impl Into<String>, comment: impl Into<String>, body: impl Into<String>) -> Self {
        Part::Region {
            name: name.into(),
            comment: comment.into(),
            body: body.into(),
        }
    }
}

/// Wrap a region body in its marker lines
pub fn render_region(comment: &str, name: &str, body: &str) -> String {
    let mut out = format!("{comment} {REGION_MARKER_TAG} {name}=begin\n");
    out.push_str(body);
    if !body.is_empty() && !body.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&format!("{comment} {REGION_MARKER_TAG} {name}=end"));
    out
}

/// Assemble a file from its layout, merging with the previous content.
///
/// Parts are separated by a blank line and the file ends with a newline.
/// With `existing` content, regions found there keep their content verbatim;
/// a file without a `code` region, or with broken markers, is a
/// [`LangError::Merge`] and nothing is produced.
pub fn assemble(parts: &[Part], existing: Option<&str>, path: &Path) -> Result<String> {
    let merge_error = |message: String| LangError::Merge {
        path: path.to_path_buf(),
        message,
    };

    let scanned = match existing {
        Some(text) if !text.trim().is_empty() => {
            let file = SegmentedFile::scan(text).map_err(merge_error)?;
            if file.region(CODE_REGION).is_none() {
                return Err(merge_error(format!(
                    "no {CODE_REGION} region markers found"
                )));
            }
            debug!(path = %path.display(), segments = file.segments().len(), "merging existing file");
            Some(file)
        }
        _ => None,
    };
    let rendered: Vec<String> = parts
        .iter()
        .map(|part| match part {
            Part::Text(text) => text.clone(),
            Part::Region {
                name,
                comment,
                body,
            } => match scanned.as_ref().and_then(|f| f.region(name)) {
                Some(kept) => render_region(comment, name, kept),
                None => render_region(comment, name, body),
            },
        })
        .collect();

    let mut out = rendered.join("\n\n");
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(header: &str, code: &str) -> Vec<Part> {
        vec![
            Part::Text(header.to_string()),
            Part::region(CODE_REGION, "//", code),
            Part::Text("// driver".to_string()),
        ]
    }

    #[test]
    fn test_parse_marker() {
        assert_eq!(parse_marker("// @lc code=begin"), Some(("code", Edge::Begin)));
        assert_eq!(parse_marker("// @lcx code=begin"), None);
        assert_eq!(parse_marker("  # @lc header=end  \n"), Some(("header", Edge::End)));
        assert_eq!(parse_marker("@lc code=end"), Some(("code", Edge::End)));
        assert_eq!(parse_marker("// @lc app=leetforge id=1 lang=go"), None);
        assert_eq!(parse_marker("let s = \"x // @lc code=begin\";"), None);
    }

    #[test]
    fn test_rendered_markers_parse_back() {
        let region = render_region("#", CODE_REGION, "pass");
        let lines: Vec<_> = region.lines().collect();
        assert_eq!(lines, vec!["# @lc code=begin", "pass", "# @lc code=end"]);
        assert_eq!(parse_marker(lines[0]), Some((CODE_REGION, Edge::Begin)));
        assert_eq!(parse_marker(lines[2]), Some((CODE_REGION, Edge::End)));
    }

    #[test]
    fn test_fresh_assembly() {
        let out = assemble(&layout("// head", "func f() {}"), None, Path::new("a.go")).unwrap();
        assert_eq!(
            out,
            "// head\n\n// @lc code=begin\nfunc f() {}\n// @lc code=end\n\n// driver\n"
        );
    }

    #[test]
    fn test_merge_preserves_code_region() {
        let first = assemble(&layout("// v1", "fresh"), None, Path::new("a.go")).unwrap();
        let edited = first.replace("fresh\n", "mine\n\n  more mine\n");

        let second = assemble(&layout("// v2", "fresh"), Some(&edited), Path::new("a.go")).unwrap();
        assert!(second.starts_with("// v2\n"));
        assert!(second.contains("// @lc code=begin\nmine\n\n  more mine\n// @lc code=end"));
    }

    #[test]
    fn test_regeneration_is_byte_identical() {
        let parts = layout("// head", "body");
        let first = assemble(&parts, None, Path::new("a.go")).unwrap();
        let second = assemble(&parts, Some(&first), Path::new("a.go")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_region_round_trips() {
        let parts = layout("// head", "");
        let first = assemble(&parts, None, Path::new("a.go")).unwrap();
        assert!(first.contains("// @lc code=begin\n// @lc code=end"));
        let second = assemble(&parts, Some(&first), Path::new("a.go")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_begin_without_end() {
        let existing = "// head\n// @lc code=begin\nuser code\n";
        let err = assemble(&layout("// h", "x"), Some(existing), Path::new("a.go")).unwrap_err();
        match err {
            LangError::Merge { path, message } => {
                assert_eq!(path, Path::new("a.go"));
                assert!(message.contains("no matching end"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_end_without_begin() {
        let existing = "user code\n// @lc code=end\n";
        assert!(matches!(
            assemble(&layout("// h", "x"), Some(existing), Path::new("a.go")),
            Err(LangError::Merge { .. })
        ));
    }

    #[test]
    fn test_nested_and_duplicate_regions() {
        let nested = "// @lc code=begin\n// @lc header=begin\n// @lc header=end\n// @lc code=end\n";
        assert!(SegmentedFile::scan(nested).is_err());

        let twice = "// @lc code=begin\n// @lc code=end\n// @lc code=begin\n// @lc code=end\n";
        assert!(SegmentedFile::scan(twice).unwrap_err().contains("twice"));
    }

    #[test]
    fn test_missing_code_region() {
        let existing = "package main\n\nfunc main() {}\n";
        assert!(matches!(
            assemble(&layout("// h", "x"), Some(existing), Path::new("a.go")),
            Err(LangError::Merge { .. })
        ));
    }

    #[test]
    fn test_named_regions_preserved_by_name() {
        let parts = vec![
            Part::region("header", "#", "# default header"),
            Part::region(CODE_REGION, "#", "pass"),
        ];
        let existing = "# @lc header=begin\n# my header\n# @lc header=end\n\n# @lc code=begin\nprint(1)\n# @lc code=end\n";
        let out = assemble(&parts, Some(existing), Path::new("a.py")).unwrap();
        assert_eq!(out, existing);
    }

    #[test]
    fn test_segments_cover_text() {
        let text = "a\n// @lc code=begin\nb\n// @lc code=end\nc\n";
        let file = SegmentedFile::scan(text).unwrap();
        let segments = file.segments();
        assert_eq!(segments.len(), 3);
        assert_eq!(&text[segments[0].span.clone()], "a\n");
        assert_eq!(segments[1].marker.as_deref(), Some("code"));
        assert_eq!(file.region("code"), Some("b\n"));
        assert_eq!(&text[segments[2].span.clone()], "c\n");
    }
}
