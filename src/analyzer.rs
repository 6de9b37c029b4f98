//! Contract around the external Japanese morphological analyzer. The engine
//! never segments Japanese itself; it consumes `(surface, reading)` records
//! with line-break markers from whatever implements
//! [`MorphologicalAnalyzer`]. The bundled [`MecabAnalyzer`] shells out to a
//! `mecab` binary with a custom node format.

use std::io::Write;
use std::process::{Command, Stdio};

use log::debug;

use crate::error::TransliterateError;

/// One analyzed word, or a line-break marker separating input lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Morpheme {
    pub surface: String,
    /// `None` means the analyzer had no reading; use the surface verbatim.
    pub reading: Option<String>,
    /// Forward log-probability of the analysis; informational only.
    pub confidence: f32,
    pub is_line_break: bool,
}

impl Morpheme {
    pub fn word(surface: impl Into<String>, reading: Option<&str>) -> Self {
        Morpheme {
            surface: surface.into(),
            reading: reading.map(str::to_owned),
            confidence: 0.0,
            is_line_break: false,
        }
    }

    pub fn line_break() -> Self {
        Morpheme {
            surface: String::new(),
            reading: None,
            confidence: 0.0,
            is_line_break: true,
        }
    }

    /// Reading to use for this morpheme, falling back to the surface.
    pub(crate) fn effective_reading(&self) -> &str {
        self.reading.as_deref().unwrap_or(&self.surface)
    }
}

/// External analyzer contract. The record sequence must carry exactly
/// `line_count - 1` line-break markers so the document can be rebuilt;
/// failures of the external process surface as
/// [`TransliterateError::AnalysisFailure`] for the whole call.
pub trait MorphologicalAnalyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Result<Vec<Morpheme>, TransliterateError>;
}

/// Field separator in the mecab node format; U+200C never occurs in lyrics.
const FIELD_SEP: char = '\u{200C}';

/// Process adapter for mecab. Surfaces and readings are emitted on one line
/// per node, separated by U+200C; `--marginal` adds the forward
/// log-probability. Lines without a separator (the end-of-sentence marker)
/// become line breaks.
pub struct MecabAnalyzer {
    command: String,
}

impl MecabAnalyzer {
    pub fn new() -> Self {
        MecabAnalyzer {
            command: "mecab".to_string(),
        }
    }

    /// Use a different mecab executable (e.g. an absolute path).
    pub fn with_command(command: impl Into<String>) -> Self {
        MecabAnalyzer {
            command: command.into(),
        }
    }

    fn parse_line(line: &str) -> Morpheme {
        let fields: Vec<&str> = line.split(FIELD_SEP).collect();
        if fields.len() < 2 {
            return Morpheme::line_break();
        }
        // mecab escapes `!` in its format expansion.
        let surface = fields[0].replace("\\!", "!");
        let reading = match fields[1] {
            "*" | "" => None,
            r => Some(r.to_string()),
        };
        let confidence = fields
            .get(2)
            .and_then(|f| f.parse::<f32>().ok())
            .unwrap_or(0.0);
        Morpheme {
            surface,
            reading,
            confidence,
            is_line_break: false,
        }
    }
}

impl Default for MecabAnalyzer {
    fn default() -> Self {
        MecabAnalyzer::new()
    }
}

impl MorphologicalAnalyzer for MecabAnalyzer {
    fn analyze(&self, text: &str) -> Result<Vec<Morpheme>, TransliterateError> {
        debug!("invoking {} on {} bytes", self.command, text.len());
        let mut child = Command::new(&self.command)
            .arg(format!("--node-format=%M{FIELD_SEP}%f[7]{FIELD_SEP}%pA\n"))
            .arg(format!("--unk-format=%M{FIELD_SEP}%M{FIELD_SEP}%pA\n"))
            .arg("--marginal")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| TransliterateError::AnalysisFailure(e.to_string()))?;

        child
            .stdin
            .take()
            .ok_or_else(|| TransliterateError::AnalysisFailure("no stdin handle".into()))?
            .write_all(text.as_bytes())
            .map_err(|e| TransliterateError::AnalysisFailure(e.to_string()))?;

        let output = child
            .wait_with_output()
            .map_err(|e| TransliterateError::AnalysisFailure(e.to_string()))?;
        if !output.status.success() {
            return Err(TransliterateError::AnalysisFailure(format!(
                "{} exited with {}",
                self.command, output.status
            )));
        }
        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| TransliterateError::AnalysisFailure(e.to_string()))?;

        let mut morphemes: Vec<Morpheme> = stdout
            .lines()
            .filter(|line| !line.is_empty())
            .map(Self::parse_line)
            .collect();
        // mecab terminates every sentence, including the last, with an
        // end-of-sentence marker; the contract wants separators only.
        if morphemes.last().is_some_and(|m| m.is_line_break) {
            morphemes.pop();
        }
        Ok(morphemes)
    }
}
