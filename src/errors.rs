//! Error types with rich diagnostics using miette
//!
//! Geometry never fails: degenerate arcs fall back to straight lines, layouts
//! that are not ready are retried, and illegal drag targets are ignored. What is
//! left are malformed persisted specs and API misuse.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::host::RegionId;

/// Result alias used across the crate
pub type Result<T, E = ComicalError> = std::result::Result<T, E>;

/// Errors surfaced to callers of the bubble engine
#[derive(Error, Diagnostic, Debug)]
pub enum ComicalError {
    #[error("malformed bubble spec: {message}")]
    #[diagnostic(
        code(comical::spec::malformed),
        help("the attribute must hold a JSON bubble spec with `\"` written as a backtick")
    )]
    MalformedSpec {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("parsing stopped here")]
        span: SourceSpan,
    },

    #[error("unknown bubble style: {style}")]
    #[diagnostic(
        code(comical::spec::unknown_style),
        help("expected one of: none, speech, shout, ellipse, caption, thought")
    )]
    UnknownStyle { style: String },

    #[error("invalid bubble spec: {reason}")]
    #[diagnostic(code(comical::spec::invalid))]
    InvalidSpec { reason: String },

    #[error("no bubble is attached to region {region}")]
    #[diagnostic(code(comical::region::unknown))]
    UnknownRegion { region: RegionId },
}

impl ComicalError {
    /// Build a `MalformedSpec` from a serde_json failure, pointing the label at
    /// the line/column serde_json reports.
    pub(crate) fn malformed(source: &str, err: &serde_json::Error) -> Self {
        let offset = offset_of(source, err.line(), err.column());
        ComicalError::MalformedSpec {
            message: err.to_string(),
            src: NamedSource::new("bubble-spec", source.to_string()),
            span: SourceSpan::from((offset, 0)),
        }
    }
}

/// Convert a 1-based line and column into a byte offset, clamped to the source.
fn offset_of(source: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(source.len())
}
