//! Error types.
//!
//! - `PeakError`: failures of the analysis core (parsing, segmentation,
//!   extraction, fitting). Library functions return this.
//! - `AppError`: what the binary reports, carrying a process exit code.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::PeakSpan;

/// Why a growth-curve fit was abandoned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitFailure {
    #[error("need at least 3 distinct x samples, found {distinct}")]
    TooFewSamples { distinct: usize },
    #[error("x has {x_len} samples but h has {h_len}")]
    LengthMismatch { x_len: usize, h_len: usize },
    #[error("input contains non-finite values")]
    NonFiniteInput,
    #[error("Jacobian is singular at the current parameters")]
    SingularJacobian,
    #[error("evaluation budget of {max_evals} exhausted")]
    BudgetExhausted { max_evals: usize },
    #[error("damping diverged without reducing the residuals")]
    Stalled,
    #[error("parameters became non-finite")]
    NonFiniteParameters,
}

/// All the ways the analysis core can fail.
#[derive(Debug, Clone, Error)]
pub enum PeakError {
    #[error("Channel lengths differ: x={x}, h={h}, m={m}")]
    ChannelLengthMismatch { x: usize, h: usize, m: usize },

    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("Width computation returned {widths} entries for {peaks} detected peaks")]
    ShapeMismatch { peaks: usize, widths: usize },

    #[error("Span [{left}, {right}) is empty")]
    EmptySpan { left: usize, right: usize },

    #[error("Index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("rel_height must lie in (0, 1], got {0}")]
    InvalidRelHeight(f64),

    #[error("min_height must be finite, got {0}")]
    InvalidMinHeight(f64),

    #[error("Invalid sample settings: {0}")]
    InvalidSample(String),

    #[error("Growth-curve fit did not converge{}: {reason}", describe_span(.span))]
    FitDidNotConverge {
        span: Option<PeakSpan>,
        reason: FitFailure,
    },

    #[error("I/O error on '{}': {message}", .path.display())]
    Io { path: PathBuf, message: String },
}

impl PeakError {
    pub fn io(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        PeakError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Attach the span a fit failure belongs to. Other variants pass through.
    pub fn with_span(self, span: PeakSpan) -> Self {
        match self {
            PeakError::FitDidNotConverge { reason, .. } => PeakError::FitDidNotConverge {
                span: Some(span),
                reason,
            },
            other => other,
        }
    }
}

impl From<FitFailure> for PeakError {
    fn from(reason: FitFailure) -> Self {
        PeakError::FitDidNotConverge { span: None, reason }
    }
}

fn describe_span(span: &Option<PeakSpan>) -> String {
    match span {
        Some(s) => format!(" for span [{}, {})", s.left_index, s.right_index),
        None => String::new(),
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<PeakError> for AppError {
    fn from(err: PeakError) -> Self {
        let exit_code = match &err {
            PeakError::ChannelLengthMismatch { .. }
            | PeakError::MalformedRow { .. }
            | PeakError::InvalidRelHeight(_)
            | PeakError::InvalidMinHeight(_)
            | PeakError::InvalidSample(_)
            | PeakError::Io { .. } => 2,
            PeakError::ShapeMismatch { .. }
            | PeakError::EmptySpan { .. }
            | PeakError::IndexOutOfRange { .. } => 4,
            PeakError::FitDidNotConverge { .. } => 5,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
