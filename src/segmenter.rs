//! Phrase boundary segmentation for typing mode. The engine renders a line
//! of units as inline span markup, hands it to an external line-breaking
//! collaborator (e.g. a budoux CLI), and decodes the returned markup back
//! into units. Break points are zero-width spaces (U+200B); the codec owns
//! splitting and re-stitching so a surface character is never separated from
//! its reading.

use std::io::Write;
use std::process::{Command, Stdio};

use log::debug;

use crate::error::TransliterateError;
use crate::Unit;

const ZWSP: char = '\u{200B}';

/// External line-breaking contract: return the same markup with additional
/// U+200B break points inserted at good wrap positions. Implementations must
/// not remove or reorder content.
pub trait PhraseSegmenter: Send + Sync {
    fn insert_breaks(&self, markup: &str) -> Result<String, TransliterateError>;
}

/// Identity segmenter: no extra break points. The default, and the
/// deterministic choice for tests.
#[derive(Debug, Default)]
pub struct PassthroughSegmenter;

impl PhraseSegmenter for PassthroughSegmenter {
    fn insert_breaks(&self, markup: &str) -> Result<String, TransliterateError> {
        Ok(markup.to_string())
    }
}

/// Segmenter backed by an external program reading markup on stdin and
/// writing the break-annotated markup to stdout.
pub struct CommandSegmenter {
    program: String,
    args: Vec<String>,
}

impl CommandSegmenter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        CommandSegmenter {
            program: program.into(),
            args,
        }
    }
}

impl PhraseSegmenter for CommandSegmenter {
    fn insert_breaks(&self, markup: &str) -> Result<String, TransliterateError> {
        debug!("invoking {} for phrase segmentation", self.program);
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| TransliterateError::SegmentationFailure(e.to_string()))?;
        child
            .stdin
            .take()
            .ok_or_else(|| TransliterateError::SegmentationFailure("no stdin handle".into()))?
            .write_all(markup.as_bytes())
            .map_err(|e| TransliterateError::SegmentationFailure(e.to_string()))?;
        let output = child
            .wait_with_output()
            .map_err(|e| TransliterateError::SegmentationFailure(e.to_string()))?;
        if !output.status.success() {
            return Err(TransliterateError::SegmentationFailure(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }
        String::from_utf8(output.stdout)
            .map(|s| s.trim_end_matches('\n').to_string())
            .map_err(|e| TransliterateError::SegmentationFailure(e.to_string()))
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape_html(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Render a line of units as span markup: plain units become escaped text,
/// ruby units become `<span data-ruby="…">…</span>`, with a U+200B separator
/// between all units.
pub(crate) fn encode_ruby_spans(units: &[Unit]) -> String {
    let mut markup = String::new();
    for (idx, unit) in units.iter().enumerate() {
        if idx > 0 {
            markup.push(ZWSP);
        }
        if unit.surface.trim() == unit.reading.trim() {
            markup.push_str(&escape_html(&unit.surface));
        } else {
            markup.push_str(&format!(
                r#"<span data-ruby="{}">{}</span>"#,
                escape_html(&unit.reading),
                escape_html(&unit.surface)
            ));
        }
    }
    markup
}

enum Node {
    Text(String),
    Span { ruby: String, text: String },
}

const SPAN_OPEN: &str = "<span data-ruby=\"";
const SPAN_CLOSE: &str = "</span>";

fn parse_nodes(markup: &str) -> Result<Vec<Node>, TransliterateError> {
    let mut nodes = Vec::new();
    let mut rest = markup;
    while !rest.is_empty() {
        match rest.find(SPAN_OPEN) {
            None => {
                nodes.push(Node::Text(rest.to_string()));
                break;
            }
            Some(pos) => {
                if pos > 0 {
                    nodes.push(Node::Text(rest[..pos].to_string()));
                }
                let after_open = &rest[pos + SPAN_OPEN.len()..];
                let attr_end = after_open.find("\">").ok_or_else(|| {
                    TransliterateError::SegmentationFailure("unterminated span attribute".into())
                })?;
                let ruby = &after_open[..attr_end];
                let body = &after_open[attr_end + 2..];
                let close = body.find(SPAN_CLOSE).ok_or_else(|| {
                    TransliterateError::SegmentationFailure("unterminated span".into())
                })?;
                nodes.push(Node::Span {
                    ruby: ruby.to_string(),
                    text: body[..close].to_string(),
                });
                rest = &body[close + SPAN_CLOSE.len()..];
            }
        }
    }
    Ok(nodes)
}

/// Decode segmenter output back into units. Every U+200B is a break
/// opportunity and is stripped from the result; a span split mid-ruby is
/// stitched back into one unit.
pub(crate) fn decode_ruby_spans(markup: &str) -> Result<Vec<Unit>, TransliterateError> {
    let mut units: Vec<Unit> = Vec::new();
    // Whether the next node starts a new unit (line start, or a break point
    // immediately before it).
    let mut boundary = true;
    for node in parse_nodes(markup)? {
        match node {
            Node::Text(text) => {
                let pieces: Vec<&str> = text.split(ZWSP).collect();
                for (idx, piece) in pieces.iter().enumerate() {
                    if piece.is_empty() {
                        continue;
                    }
                    let piece = unescape_html(piece);
                    let starts_new = idx > 0 || boundary;
                    match units.last_mut() {
                        Some(last) if !starts_new => {
                            last.surface.push_str(&piece);
                            last.reading.push_str(&piece);
                        }
                        _ => units.push(Unit::plain(piece)),
                    }
                }
                boundary = text.ends_with(ZWSP);
            }
            Node::Span { ruby, text } => {
                let starts_new = boundary || text.starts_with(ZWSP);
                let ends_with_break = text.ends_with(ZWSP);
                let surface = unescape_html(&text.replace(ZWSP, ""));
                let ruby = unescape_html(&ruby);
                match units.last_mut() {
                    Some(last) if !starts_new => {
                        last.surface.push_str(&surface);
                        last.reading.push_str(&ruby);
                    }
                    _ => units.push(Unit::new(surface, ruby)),
                }
                boundary = ends_with_break;
            }
        }
    }
    Ok(units)
}
