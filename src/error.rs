//! Error types for fraglink.
//!
//! Two families exist and they are handled very differently:
//!
//! - [`LinkError`] - configuration errors. These are programming or setup
//!   mistakes (an unknown condition name, a duplicate registry key, attaching
//!   listeners with nothing enabled) and are returned as hard errors.
//! - [`DecodeError`] - anomalies in a decoded token value. Tokens arrive from
//!   shared links and may be stale or hand-edited, so these are recovered:
//!   the controller logs a warning, skips the entry, and keeps going.

use thiserror::Error;

/// Fatal configuration error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    /// A condition name or key character that no registered condition answers to.
    #[error("unknown condition `{0}`")]
    UnknownCondition(String),

    /// Two conditions tried to claim the same token key character.
    ///
    /// Token decoding is keyed by a single-character prefix, so a duplicate
    /// key would make decoding ambiguous.
    #[error("duplicate condition key `{key}`: `{incoming}` collides with `{existing}`")]
    DuplicateKey {
        /// The contested key character.
        key: char,
        /// Name of the condition already holding the key.
        existing: &'static str,
        /// Name of the condition that tried to register it again.
        incoming: &'static str,
    },

    /// Two conditions tried to claim the same name.
    #[error("duplicate condition name `{0}`")]
    DuplicateName(&'static str),

    /// `attach_events` / `detach_events` called with an empty enabled set.
    ///
    /// Silently doing nothing here would mask a configuration mistake, so
    /// the call fails instead.
    #[error("no enabled conditions to attach or detach")]
    NoEnabledConditions,
}

/// Recoverable anomaly in a single decoded token value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// A value that should have been a decimal integer was not.
    #[error("invalid integer `{0}`")]
    InvalidNumber(String),

    /// Percent-decoded bytes were not valid UTF-8.
    #[error("invalid percent-encoding in `{0}`")]
    InvalidPercentEncoding(String),

    /// A value that must carry at least one character was empty.
    #[error("empty value")]
    Empty,

    /// Sort direction character other than `a` or `d`.
    #[error("unknown sort direction `{0}`")]
    UnknownDirection(char),

    /// Column-visibility flag character other than `t` or `f`.
    #[error("invalid visibility flag `{0}`")]
    InvalidVisibilityFlag(char),

    /// A `first-last` column range that could not be parsed.
    #[error("invalid index range `{0}`")]
    InvalidRange(String),
}
