#![forbid(unsafe_code)]

//! Client error model.
//!
//! Domain-specific typed errors in the hand-rolled Display/Error style:
//! callers match on what matters and propagate the rest. Variants carry
//! string detail rather than boxed sources so results can be shared with
//! single-flight followers by cloning.

use std::fmt;

use crate::algorithm::Algorithm;

/// A fetch for one algorithm's result set failed.
///
/// The renderer shows a visible error state for any of these; none of
/// them writes a cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The backend answered with a non-2xx status.
    Http { algorithm: Algorithm, status: u16 },
    /// The request never completed (connect, timeout, I/O).
    Transport { algorithm: Algorithm, detail: String },
    /// The response body was not a valid point array.
    Parse { algorithm: Algorithm, detail: String },
    /// A newer selection cancelled this fetch before it finished.
    Cancelled { algorithm: Algorithm },
    /// The transport could not be constructed; no request was made.
    Setup { detail: String },
}

impl FetchError {
    /// The algorithm whose fetch failed, if one was requested.
    pub const fn algorithm(&self) -> Option<Algorithm> {
        match self {
            Self::Http { algorithm, .. }
            | Self::Transport { algorithm, .. }
            | Self::Parse { algorithm, .. }
            | Self::Cancelled { algorithm } => Some(*algorithm),
            Self::Setup { .. } => None,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http { algorithm, status } => {
                write!(f, "backend returned HTTP {status} for {algorithm}")
            }
            Self::Transport { algorithm, detail } => {
                write!(f, "transport failure fetching {algorithm}: {detail}")
            }
            Self::Parse { algorithm, detail } => {
                write!(f, "malformed response for {algorithm}: {detail}")
            }
            Self::Cancelled { algorithm } => {
                write!(f, "fetch for {algorithm} was cancelled")
            }
            Self::Setup { detail } => {
                write!(f, "building HTTP client: {detail}")
            }
        }
    }
}

impl std::error::Error for FetchError {}

/// A cached entry could not be deserialized.
///
/// Treated as a cache miss by the client; surfaced only in logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeserializeError {
    /// The cache key whose entry is corrupt.
    pub key: String,
    /// What the JSON parser objected to.
    pub detail: String,
}

impl fmt::Display for DeserializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "corrupt cache entry for '{}': {}", self.key, self.detail)
    }
}

impl std::error::Error for DeserializeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_reports_algorithm() {
        let err = FetchError::Http {
            algorithm: Algorithm::Dbscan,
            status: 500,
        };
        assert_eq!(err.algorithm(), Some(Algorithm::Dbscan));
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("DBSCAN"));
    }

    #[test]
    fn cancelled_display_names_algorithm() {
        let err = FetchError::Cancelled {
            algorithm: Algorithm::KMeans,
        };
        assert!(err.to_string().contains("k-means"));
    }

    #[test]
    fn setup_error_names_no_algorithm() {
        let err = FetchError::Setup {
            detail: "invalid TLS configuration".into(),
        };
        assert_eq!(err.algorithm(), None);
        for algorithm in [Algorithm::KMeans, Algorithm::Dbscan, Algorithm::Hierarchical] {
            assert!(!err.to_string().contains(&algorithm.to_string()));
        }
    }

    #[test]
    fn deserialize_error_names_key() {
        let err = DeserializeError {
            key: "kmeans".into(),
            detail: "expected value at line 1".into(),
        };
        assert!(err.to_string().contains("kmeans"));
    }
}
