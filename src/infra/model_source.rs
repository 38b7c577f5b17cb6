// ============================================================
// Layer 6 — Model Sources
// ============================================================
// Where the serialized model document comes from.
//
//   FileModelSource — a JSON file on disk
//                     e.g. model.json next to the binary
//   HttpModelSource — a JSON document served over HTTP
//                     e.g. http://localhost:8000/model.json
//
// Both only move bytes. Parsing and shape validation happen in
// ModelSource::load → Model::from_json, so a source never has to
// know what a valid model looks like.
//
// Failure mapping:
//   unreadable file, refused connection,
//   non-2xx status, broken body           → DigitError::Fetch
//   anything wrong inside the document    → DigitError::Schema
//
// Reference: reqwest documentation (blocking client)
//            Rust Book §9 (Error Handling)

use std::{fs, path::PathBuf, time::Duration};

use crate::domain::error::{DigitError, Result};
use crate::domain::traits::ModelSource;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

// ─── FileModelSource ──────────────────────────────────────────────────────────
pub struct FileModelSource {
    path: PathBuf,
}

impl FileModelSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ModelSource for FileModelSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| DigitError::fetch(self.location(), e))
    }
}

// ─── HttpModelSource ──────────────────────────────────────────────────────────
pub struct HttpModelSource {
    url:    String,
    client: reqwest::blocking::Client,
}

impl HttpModelSource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url    = url.into();
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| DigitError::fetch(url.clone(), e))?;
        Ok(Self { url, client })
    }
}

impl ModelSource for HttpModelSource {
    fn location(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<String> {
        tracing::debug!("GET {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| DigitError::fetch(self.url.clone(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DigitError::fetch(self.url.clone(), status));
        }

        response
            .text()
            .map_err(|e| DigitError::fetch(self.url.clone(), e))
    }
}

/// Pick a source for a location: URLs go over HTTP, anything else is a path.
pub fn model_source_for(location: &str) -> Result<Box<dyn ModelSource>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpModelSource::new(location)?))
    } else {
        Ok(Box::new(FileModelSource::new(location)))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ModelShape;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    const TINY_MODEL: &str = r#"{ "weights": [[1.0], [2.0]], "bias": [0.0, 0.5], "epoch": 4 }"#;

    /// Serve exactly one HTTP response on a local port and return its URL.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr     = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 4096];
            let _ = stream.read(&mut request);
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{addr}/model.json")
    }

    #[test]
    fn test_file_source_loads_model() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TINY_MODEL.as_bytes()).unwrap();

        let source = FileModelSource::new(file.path());
        let model  = source.load(ModelShape::for_grid(1, 2)).unwrap();
        assert_eq!(model.epoch(), 4);
        assert_eq!(model.bias(), &[0.0, 0.5]);
    }

    #[test]
    fn test_missing_file_is_fetch_error() {
        let source = FileModelSource::new("/no/such/model.json");
        assert!(matches!(source.fetch(), Err(DigitError::Fetch { .. })));
    }

    #[test]
    fn test_malformed_file_is_schema_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{ "weights": [[1.0]], "bias": [0.0], "epoch": 1 }"#).unwrap();

        let source = FileModelSource::new(file.path());
        let err    = source.load(ModelShape::for_grid(1, 2)).unwrap_err();
        assert!(matches!(err, DigitError::Schema(_)));
    }

    #[test]
    fn test_http_source_loads_model() {
        let url    = serve_once("200 OK", TINY_MODEL);
        let source = HttpModelSource::new(url).unwrap();
        let model  = source.load(ModelShape::for_grid(1, 2)).unwrap();
        assert_eq!(model.classes(), 2);
    }

    #[test]
    fn test_http_error_status_is_fetch_error() {
        let url    = serve_once("404 Not Found", "");
        let source = HttpModelSource::new(url).unwrap();
        let err    = source.fetch().unwrap_err();
        assert!(matches!(err, DigitError::Fetch { reason, .. } if reason.contains("404")));
    }

    #[test]
    fn test_unreachable_host_is_fetch_error() {
        // Bind then drop to get a port nobody listens on
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let source = HttpModelSource::new(format!("http://127.0.0.1:{port}/model.json")).unwrap();
        assert!(matches!(source.fetch(), Err(DigitError::Fetch { .. })));
    }

    #[test]
    fn test_source_selection() {
        assert_eq!(
            model_source_for("https://example.com/model.json").unwrap().location(),
            "https://example.com/model.json"
        );
        assert_eq!(model_source_for("weights/model.json").unwrap().location(), "weights/model.json");
    }
}
