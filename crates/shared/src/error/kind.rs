//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum shared by every crate in the workspace.

use serde::Serialize;

/// Classification of application errors.
///
/// The engine embeds into a host application and never surfaces raw errors
/// to it, so kinds classify failures for logging and degradation decisions
/// rather than for any transport mapping.
///
/// ## Notes
/// * `non_exhaustive` - more variants may be added later
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::NotFound;
/// assert_eq!(kind.as_str(), "Not Found");
/// assert!(!kind.is_transient());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// A persistence backend failed (read, write, or delete)
    Storage,
    /// Stored or fetched data could not be serialized/deserialized
    Serialization,
    /// A requested record does not exist
    NotFound,
    /// A stored record exists but is too old to honor
    Stale,
    /// A remote source could not be reached
    Network,
    /// Configuration is missing or rejected as nonsense
    Config,
    /// Invariant violation inside the engine itself
    Internal,
}

impl ErrorKind {
    /// User-facing string representation.
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::Storage.as_str(), "Storage");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Storage => "Storage",
            ErrorKind::Serialization => "Serialization",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::Stale => "Stale",
            ErrorKind::Network => "Network",
            ErrorKind::Config => "Config",
            ErrorKind::Internal => "Internal",
        }
    }

    /// Whether a retry of the same operation could plausibly succeed.
    ///
    /// Transient kinds are logged at a lower severity because the engine
    /// degrades through them without losing the session.
    #[inline]
    pub const fn is_transient(&self) -> bool {
        matches!(self, ErrorKind::Storage | ErrorKind::Network)
    }

    /// Whether the error indicates data that should be discarded and
    /// replaced rather than retried.
    #[inline]
    pub const fn is_data_error(&self) -> bool {
        matches!(self, ErrorKind::Serialization | ErrorKind::Stale)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
