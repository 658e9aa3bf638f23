#![forbid(unsafe_code)]

//! Cluster result transports.
//!
//! The backend contract is `POST {base}/do_cluster` with body
//! `{"type": <wire name>, "params": {...}}`. The canonical response is a
//! JSON array of `{x, y, cluster}`; older backend revisions wrapped it as
//! `{"cluster": [...], "bestK": n}`, and both shapes are accepted.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use bioscatter_core::PointSet;

use crate::algorithm::Algorithm;
use crate::error::FetchError;

/// One request for a clustering result set.
#[derive(Debug, Clone)]
pub struct ClusterRequest {
    pub algorithm: Algorithm,
    /// Opaque algorithm parameters, forwarded to the backend unchanged.
    pub params: serde_json::Value,
}

impl ClusterRequest {
    /// Build a request with empty parameters.
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            params: serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    /// Build a request with explicit parameters.
    pub fn with_params(algorithm: Algorithm, params: serde_json::Value) -> Self {
        Self { algorithm, params }
    }
}

/// Transport seam between the client and the clustering service.
pub trait ClusterBackend: Send + Sync {
    /// Produce the point set for one request.
    fn fetch(&self, request: &ClusterRequest) -> Result<PointSet, FetchError>;
}

/// Either response shape the backend has historically produced.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponseBody {
    Bare(PointSet),
    Enveloped {
        cluster: PointSet,
        #[serde(rename = "bestK", default)]
        #[allow(dead_code)]
        best_k: Option<u32>,
    },
}

impl ResponseBody {
    fn into_points(self) -> PointSet {
        match self {
            Self::Bare(points) => points,
            Self::Enveloped { cluster, .. } => cluster,
        }
    }
}

/// Parse a response body in either supported shape.
pub(crate) fn parse_points(algorithm: Algorithm, body: &str) -> Result<PointSet, FetchError> {
    serde_json::from_str::<ResponseBody>(body)
        .map(ResponseBody::into_points)
        .map_err(|e| FetchError::Parse {
            algorithm,
            detail: e.to_string(),
        })
}

/// HTTP transport to the clustering service.
#[derive(Debug)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpBackend {
    /// Default request timeout; clustering a full dataset is slow.
    const TIMEOUT: Duration = Duration::from_secs(120);

    /// Create a backend for the given base URL (no trailing slash needed).
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Self::TIMEOUT)
            .build()
            .map_err(|e| FetchError::Setup {
                detail: e.to_string(),
            })?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/do_cluster", self.base_url)
    }
}

impl ClusterBackend for HttpBackend {
    fn fetch(&self, request: &ClusterRequest) -> Result<PointSet, FetchError> {
        let algorithm = request.algorithm;
        let body = serde_json::json!({
            "type": algorithm.wire_name(),
            "params": request.params,
        });

        tracing::debug!(%algorithm, endpoint = %self.endpoint(), "requesting cluster result");
        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .map_err(|e| FetchError::Transport {
                algorithm,
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                algorithm,
                status: status.as_u16(),
            });
        }

        let text = response.text().map_err(|e| FetchError::Transport {
            algorithm,
            detail: e.to_string(),
        })?;
        parse_points(algorithm, &text)
    }
}

/// Legacy transport: pre-computed result files in a local directory.
///
/// Looks for `kmeans.json`, `dbscan.json`, `hierarquical.json`; field
/// naming may be canonical or the old `UMAP1`/`UMAP2` scheme.
#[derive(Debug)]
pub struct StaticFileBackend {
    dir: PathBuf,
}

impl StaticFileBackend {
    /// Create a backend reading from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ClusterBackend for StaticFileBackend {
    fn fetch(&self, request: &ClusterRequest) -> Result<PointSet, FetchError> {
        let algorithm = request.algorithm;
        let path = self.dir.join(algorithm.file_name());
        tracing::debug!(%algorithm, path = %path.display(), "reading static result file");
        let text = std::fs::read_to_string(&path).map_err(|e| FetchError::Transport {
            algorithm,
            detail: format!("{}: {e}", path.display()),
        })?;
        parse_points(algorithm, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bioscatter_core::Point;

    #[test]
    fn bare_array_parses() {
        let body = r#"[{"x":0,"y":0,"cluster":0},{"x":10,"y":10,"cluster":1}]"#;
        let points = parse_points(Algorithm::KMeans, body).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points.points()[1], Point::new(10.0, 10.0, 1));
    }

    #[test]
    fn enveloped_response_parses() {
        let body = r#"{"cluster":[{"x":1,"y":2,"cluster":-1}],"bestK":4}"#;
        let points = parse_points(Algorithm::Hierarchical, body).unwrap();
        assert_eq!(points.points(), &[Point::new(1.0, 2.0, -1)]);
    }

    #[test]
    fn legacy_umap_fields_parse() {
        let body = r#"[{"UMAP1":3.5,"UMAP2":-1.5,"cluster":2}]"#;
        let points = parse_points(Algorithm::Dbscan, body).unwrap();
        assert_eq!(points.points(), &[Point::new(3.5, -1.5, 2)]);
    }

    #[test]
    fn malformed_body_is_parse_error() {
        let err = parse_points(Algorithm::KMeans, "not json").unwrap_err();
        assert!(matches!(err, FetchError::Parse { .. }));
        assert_eq!(err.algorithm(), Some(Algorithm::KMeans));
    }

    #[test]
    fn static_backend_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("kmeans.json"),
            r#"[{"UMAP1":0.5,"UMAP2":1.5,"cluster":0}]"#,
        )
        .unwrap();
        let backend = StaticFileBackend::new(dir.path());
        let points = backend.fetch(&ClusterRequest::new(Algorithm::KMeans)).unwrap();
        assert_eq!(points.points(), &[Point::new(0.5, 1.5, 0)]);
    }

    #[test]
    fn static_backend_missing_file_is_transport_error() {
        let dir = tempfile::tempdir().unwrap();
        let backend = StaticFileBackend::new(dir.path());
        let err = backend
            .fetch(&ClusterRequest::new(Algorithm::Dbscan))
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }
}
