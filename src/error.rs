use crate::Scalar;
use std::fmt;

/// Broad classification of [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid input detected before any work has started
    Configuration,
    /// Turtle state stack was misused by the interpreted string
    InterpreterState,
    /// Internal invariant violation, indicates a defect in the caller or the library
    EncodingInvariant,
    /// IO error propagated from the output stream
    Io,
}

#[derive(Debug)]
pub enum Error {
    /// Rule symbol is not exactly one character
    InvalidRuleKey(String),
    /// Rule is not in the `symbol=replacement` form
    InvalidRule(String),
    /// Same symbol is defined by more than one rule
    DuplicateRule(char),
    /// Canvas must have positive dimensions
    InvalidCanvasSize { width: usize, height: usize },
    /// Margin fraction must be finite and inside `[0, 0.5)`
    InvalidMargin(Scalar),
    /// Numeric parameter is out of its domain
    InvalidParameter { name: &'static str, value: Scalar },
    /// Expanded string would exceed configured limit
    ExpansionLimit { limit: usize, length: usize },
    /// Preset with such name does not exist
    UnknownPreset(String),
    /// `]` without matching `[` at the provided character offset
    UnmatchedPop { offset: usize },
    /// `[` nesting exceeded the stack bound at the provided character offset
    StackOverflow { offset: usize, depth: usize },
    /// Encoder received data it can not represent
    EncodingInvariant(String),
    /// Error reported by an external encoder implementation
    #[cfg(feature = "png")]
    ExternalEncoder(String),
    /// JSON error
    #[cfg(feature = "serde")]
    Json(serde_json::Error),
    /// IO error propagated while writing output stream
    IoError(std::io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        use Error::*;
        match self {
            InvalidRuleKey(_)
            | InvalidRule(_)
            | DuplicateRule(_)
            | InvalidCanvasSize { .. }
            | InvalidMargin(_)
            | InvalidParameter { .. }
            | ExpansionLimit { .. }
            | UnknownPreset(_) => ErrorKind::Configuration,
            #[cfg(feature = "serde")]
            Json(_) => ErrorKind::Configuration,
            UnmatchedPop { .. } | StackOverflow { .. } => ErrorKind::InterpreterState,
            EncodingInvariant(_) => ErrorKind::EncodingInvariant,
            #[cfg(feature = "png")]
            ExternalEncoder(_) => ErrorKind::EncodingInvariant,
            IoError(_) => ErrorKind::Io,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Error::*;
        match self {
            InvalidRuleKey(key) => {
                write!(f, "rule symbol must be a single character: {:?}", key)
            }
            InvalidRule(rule) => write!(f, "rule must be `symbol=replacement`: {:?}", rule),
            DuplicateRule(symbol) => write!(f, "rule for {:?} is defined more than once", symbol),
            InvalidCanvasSize { width, height } => {
                write!(f, "canvas size must be positive: {}x{}", width, height)
            }
            InvalidMargin(margin) => write!(f, "margin must be inside [0, 0.5): {}", margin),
            InvalidParameter { name, value } => write!(f, "invalid {}: {}", name, value),
            ExpansionLimit { limit, length } => write!(
                f,
                "expanded string length {} exceeds the limit {}",
                length, limit
            ),
            UnknownPreset(name) => write!(f, "unknown preset: {:?}", name),
            UnmatchedPop { offset } => write!(f, "unmatched `]` at offset {}", offset),
            StackOverflow { offset, depth } => write!(
                f,
                "`[` at offset {} exceeds maximum stack depth {}",
                offset, depth
            ),
            EncodingInvariant(msg) => write!(f, "encoding invariant violated: {}", msg),
            #[cfg(feature = "png")]
            ExternalEncoder(msg) => write!(f, "external encoder failed: {}", msg),
            #[cfg(feature = "serde")]
            Json(error) => write!(f, "invalid json: {}", error),
            IoError(error) => write!(f, "io error: {}", error),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::IoError(error)
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error)
    }
}

impl From<Error> for std::io::Error {
    fn from(error: Error) -> Self {
        match error {
            Error::IoError(error) => error,
            _ => Self::new(std::io::ErrorKind::InvalidData, error),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(error) => Some(error),
            #[cfg(feature = "serde")]
            Error::Json(error) => Some(error),
            _ => None,
        }
    }
}
