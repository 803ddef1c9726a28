//! Upload boundary and detection request transport.
//!
//! Responsible for:
//! - Validating the file type against the accepted MIME allowlist
//! - Sniffing MIME from file magic bytes (extension as fallback)
//! - Encoding the multipart/form-data request body
//! - POSTing to the detect endpoint and parsing the JSON response
//!
//! Validation failures are synchronous and issue no request.

use anyhow::{anyhow, Context, Result};
use image::GenericImageView;
use rand::RngCore;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::geometry::SourceSize;
use crate::DetectionResponse;

/// The only file types the detection service accepts.
pub const ACCEPTED_MIME_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/jpg", "image/webp"];

/// Form field name the service expects the file under.
const FILE_FIELD: &str = "file";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Reject any MIME type outside the accepted set.
pub fn validate_upload_mime(mime: &str) -> Result<()> {
    if ACCEPTED_MIME_TYPES.contains(&mime) {
        return Ok(());
    }
    Err(anyhow!(
        "unsupported file type '{}'; expected JPEG, PNG, or WEBP",
        mime
    ))
}

/// Determine MIME from leading magic bytes.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.len() >= 3 && bytes[..3] == [0xFF, 0xD8, 0xFF] {
        return Some("image/jpeg");
    }
    if bytes.len() >= 8 && bytes[..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
        return Some("image/png");
    }
    if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    None
}

fn mime_from_extension(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "jpeg" => Some("image/jpeg"),
        "jpg" => Some("image/jpg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// A file object ready for submission.
#[derive(Clone, Debug)]
pub struct UploadFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read a file from disk, trusting content (magic bytes) over the
    /// filename extension, and validate it against the allowlist.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read upload file {}", path.display()))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        let mime = sniff_mime(&bytes)
            .or_else(|| mime_from_extension(&name))
            .ok_or_else(|| anyhow!("could not determine file type of {}", path.display()))?;
        validate_upload_mime(mime)?;
        Ok(Self::new(name, mime, bytes))
    }

    /// Natural pixel dimensions, decoded client-side so geometry mapping has
    /// its source size without waiting on a rendering surface.
    pub fn source_size(&self) -> Result<SourceSize> {
        let img = image::load_from_memory(&self.bytes).context("decode image dimensions")?;
        let (w, h) = img.dimensions();
        Ok(SourceSize {
            w: w as f64,
            h: h as f64,
        })
    }
}

/// Encode a single-file multipart/form-data body.
fn encode_multipart(boundary: &str, file: &UploadFile) -> Vec<u8> {
    let mut body = Vec::with_capacity(file.bytes.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            FILE_FIELD, file.name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", file.mime).as_bytes());
    body.extend_from_slice(&file.bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

fn random_boundary() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    let mut out = String::with_capacity(44);
    out.push_str("----boxview-");
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

/// Client for the remote detection service.
pub struct DetectClient {
    endpoint: Url,
    agent: ureq::Agent,
}

impl DetectClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint).context("parse detect endpoint url")?;
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Ok(Self { endpoint, agent })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Submit the file as one multipart POST and parse the JSON response.
    /// Non-2xx statuses and network failures surface as errors; the caller
    /// routes them into the session's failure path.
    pub fn detect(&self, file: &UploadFile) -> Result<DetectionResponse> {
        validate_upload_mime(&file.mime)?;

        let boundary = random_boundary();
        let body = encode_multipart(&boundary, file);
        log::info!(
            "posting {} ({} bytes, {}) to {}",
            file.name,
            body.len(),
            file.mime,
            self.endpoint
        );

        let response = self
            .agent
            .post(self.endpoint.as_str())
            .set(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .send_bytes(&body)
            .map_err(|err| match err {
                ureq::Error::Status(code, _) => {
                    anyhow!("detection service returned status {}", code)
                }
                other => anyhow!("detection request failed: {}", other),
            })?;

        let raw = response
            .into_string()
            .context("read detection response body")?;
        let parsed: DetectionResponse =
            serde_json::from_str(&raw).context("parse detection response json")?;
        Ok(parsed)
    }

    /// Probe the service's health endpoint.
    pub fn health(&self) -> Result<String> {
        let url = self
            .endpoint
            .join("/api-health")
            .context("build health url")?;
        let response = self
            .agent
            .get(url.as_str())
            .call()
            .map_err(|err| anyhow!("health probe failed: {}", err))?;
        Ok(response.into_string().context("read health response")?)
    }
}
