//! Non-fatal decode failures.
//!
//! A broken unit never aborts ingestion: the failure is recorded here, logged,
//! and decoding resumes at the next unit when its start is known.

use std::fmt;

use crate::ParseError;

/// Classification of a unit-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// The unit header is inconsistent (zero `line_range`, zero `opcode_base`,
    /// bad directory index, unsupported version).
    MalformedHeader,
    /// The bytecode itself could not be decoded.
    MalformedProgram,
    /// An aranges header uses an address size other than 2; its tuples were
    /// not read.
    UnsupportedAddressSize,
    /// A read ran past the end of the unit or section.
    TruncatedSection,
}

impl WarningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedHeader => "malformed header",
            Self::MalformedProgram => "malformed program",
            Self::UnsupportedAddressSize => "unsupported address size",
            Self::TruncatedSection => "truncated section",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{section} unit at {offset:#x}: {kind}: {message}")]
pub struct DecodeWarning {
    /// Section the failure occurred in.
    pub section: &'static str,
    /// Byte offset of the affected unit within the section.
    pub offset: usize,
    pub kind: WarningKind,
    pub message: String,
}

impl DecodeWarning {
    pub fn new(
        section: &'static str,
        offset: usize,
        kind: WarningKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            section,
            offset,
            kind,
            message: message.into(),
        }
    }

    /// Wrap a parse error, classifying truncation separately from everything
    /// else. `fallback` is used for non-truncation errors.
    pub fn from_error(
        section: &'static str,
        offset: usize,
        fallback: WarningKind,
        error: &ParseError,
    ) -> Self {
        let kind = if error.is_truncation() {
            WarningKind::TruncatedSection
        } else {
            fallback
        };
        Self::new(section, offset, kind, error.to_string())
    }

    /// Emit this warning as a `tracing` event.
    pub(crate) fn log(&self) {
        tracing::warn!(
            section = self.section,
            offset = self.offset,
            kind = %self.kind,
            "{}",
            self.message
        );
    }
}
