//! Where the candidate list comes from.
//!
//! A source is asked exactly once, at startup, for every candidate in a zone.
//! Filtering never happens server side; see [`crate::core::search::suggest`].

pub mod fetch;

use crate::core::{Candidate, ZoneId};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub use fetch::CandidateFetch;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("candidate payload is malformed: {0}")]
    Decode(#[from] serde_json::Error),
}

pub trait CandidateSource: Send {
    fn fetch(&self, zone: &ZoneId) -> Result<Vec<Candidate>, SourceError>;

    fn describe(&self) -> String;
}

/// Decodes a JSON array of `{id, name}` records. Extra fields are ignored.
pub fn decode_candidates(raw: &str) -> Result<Vec<Candidate>, SourceError> {
    Ok(serde_json::from_str(raw)?)
}

/// `GET {base_url}/api/services?zoneId={zone}`.
pub struct HttpSource {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/services", self.base_url)
    }
}

impl CandidateSource for HttpSource {
    fn fetch(&self, zone: &ZoneId) -> Result<Vec<Candidate>, SourceError> {
        let url = self.endpoint();
        debug!(%url, %zone, "requesting candidates");
        let response = self
            .agent
            .get(&url)
            .query("zoneId", zone.as_str())
            .call()
            .map_err(|err| match err {
                ureq::Error::Status(status, _) => SourceError::Status {
                    url: url.clone(),
                    status,
                },
                ureq::Error::Transport(transport) => SourceError::Transport {
                    url: url.clone(),
                    message: transport.to_string(),
                },
            })?;
        let body = response
            .into_string()
            .map_err(|err| SourceError::Transport {
                url: url.clone(),
                message: err.to_string(),
            })?;
        decode_candidates(&body)
    }

    fn describe(&self) -> String {
        self.endpoint()
    }
}

/// Reads the same JSON payload the HTTP endpoint serves from a local file.
/// The zone is not part of the lookup; one file holds one zone.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CandidateSource for FileSource {
    fn fetch(&self, _zone: &ZoneId) -> Result<Vec<Candidate>, SourceError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        decode_candidates(&raw)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

pub struct StaticSource {
    candidates: Vec<Candidate>,
}

impl StaticSource {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }
}

impl CandidateSource for StaticSource {
    fn fetch(&self, _zone: &ZoneId) -> Result<Vec<Candidate>, SourceError> {
        Ok(self.candidates.clone())
    }

    fn describe(&self) -> String {
        format!("static ({} candidates)", self.candidates.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};
    use std::time::{Duration, Instant};

    /// Answers a single request with `status` and `body`, then hands back the
    /// request line it received.
    fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept connection");
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
            let mut request_line = String::new();
            reader.read_line(&mut request_line).expect("read request line");
            loop {
                let mut header = String::new();
                let read = reader.read_line(&mut header).expect("read header");
                if read == 0 || header == "\r\n" {
                    break;
                }
            }
            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .expect("write response");
            request_line.trim_end().to_string()
        });
        (format!("http://{addr}"), handle)
    }

    #[test]
    fn file_source_reads_json_array() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"[{{"id":"7","name":"Gardening"}}]"#).expect("write fixture");

        let source = FileSource::new(file.path());
        let candidates = source.fetch(&ZoneId::default()).expect("fetch should succeed");
        assert_eq!(candidates, vec![Candidate::new("7", "Gardening")]);
    }

    #[test]
    fn file_source_reports_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let source = FileSource::new(dir.path().join("absent.json"));
        let err = source
            .fetch(&ZoneId::default())
            .expect_err("missing file should fail");
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[test]
    fn non_array_payload_is_a_decode_error() {
        let err = decode_candidates(r#"{"services":[]}"#).expect_err("object is not a list");
        assert!(matches!(err, SourceError::Decode(_)));
    }

    #[test]
    fn http_source_requests_zone_services() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"[{"id":"1","name":"Plumbing","zoneId":3},{"id":"2","name":"Painting"}]"#,
        );
        let source = HttpSource::new(format!("{base_url}/"));

        let candidates = source.fetch(&ZoneId::new("3")).expect("fetch should succeed");
        assert_eq!(
            candidates,
            vec![Candidate::new("1", "Plumbing"), Candidate::new("2", "Painting")]
        );
        assert_eq!(
            server.join().expect("server thread"),
            "GET /api/services?zoneId=3 HTTP/1.1"
        );
    }

    #[test]
    fn http_error_status_is_reported() {
        let (base_url, server) = serve_once("503 Service Unavailable", "");
        let source = HttpSource::new(base_url);

        let err = source
            .fetch(&ZoneId::default())
            .expect_err("503 should fail");
        assert!(matches!(err, SourceError::Status { status: 503, .. }));
        assert_eq!(
            server.join().expect("server thread"),
            "GET /api/services?zoneId=1 HTTP/1.1"
        );
    }

    #[test]
    fn http_failure_degrades_to_no_candidates() {
        let (base_url, server) = serve_once("503 Service Unavailable", "");
        let mut fetch = CandidateFetch::spawn(Box::new(HttpSource::new(base_url)), ZoneId::default());

        let deadline = Instant::now() + Duration::from_secs(5);
        let candidates = loop {
            if let Some(candidates) = fetch.poll() {
                break candidates;
            }
            assert!(Instant::now() < deadline, "fetch did not resolve");
            thread::sleep(Duration::from_millis(5));
        };
        assert!(candidates.is_empty());
        server.join().expect("server thread");
    }

    #[test]
    fn http_endpoint_trims_trailing_slash() {
        let source = HttpSource::new("http://localhost:8080/");
        assert_eq!(source.endpoint(), "http://localhost:8080/api/services");
    }
}
