#![forbid(unsafe_code)]

//! Clustering algorithm identifiers.

use std::fmt;

/// The clustering result sets the viewer can display.
///
/// Wire names keep the backend's original spelling (`hierarquical`
/// included) so existing deployments and data dumps keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    KMeans,
    Dbscan,
    Hierarchical,
}

impl Algorithm {
    /// All selectable algorithms, in UI order.
    pub const ALL: [Algorithm; 3] = [Self::KMeans, Self::Dbscan, Self::Hierarchical];

    /// The identifier sent to the backend and used as the cache key.
    #[inline]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::KMeans => "kmeans",
            Self::Dbscan => "dbscan",
            Self::Hierarchical => "hierarquical",
        }
    }

    /// The static data file for legacy mode.
    #[inline]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::KMeans => "kmeans.json",
            Self::Dbscan => "dbscan.json",
            Self::Hierarchical => "hierarquical.json",
        }
    }

    /// Human-readable name for the UI.
    #[inline]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::KMeans => "k-means",
            Self::Dbscan => "DBSCAN",
            Self::Hierarchical => "hierarchical",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_backend_spelling() {
        assert_eq!(Algorithm::KMeans.wire_name(), "kmeans");
        assert_eq!(Algorithm::Dbscan.wire_name(), "dbscan");
        assert_eq!(Algorithm::Hierarchical.wire_name(), "hierarquical");
    }

    #[test]
    fn file_names_follow_wire_names() {
        for algorithm in Algorithm::ALL {
            assert_eq!(
                algorithm.file_name(),
                format!("{}.json", algorithm.wire_name())
            );
        }
    }
}
