//! Remote speech synthesis and audio retrieval.
//!
//! The Google Cloud Text-to-Speech *long audio* API does not return audio
//! inline: the request names a Cloud Storage destination, the service
//! answers with a long-running operation handle, and the audio object
//! appears in the bucket once the operation completes. This module drives
//! that three-step exchange — submit, poll to completion within a fixed
//! deadline, download — over plain authenticated REST.
//!
//! [`SpeechBackend`] is the seam between the pipeline and the network:
//! tests inject a recording fake through
//! [`crate::config::ConversionConfig::backend`] and never touch HTTP.
//!
//! Remote failures are terminal by design. There is no retry or backoff
//! here: a timeout, auth failure, or missing object surfaces immediately
//! with the service's diagnostic.

use crate::config::ConversionConfig;
use crate::error::Pdf2Mp3Error;
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

const TTS_API_BASE: &str = "https://texttospeech.googleapis.com/v1beta1";
const STORAGE_API_BASE: &str = "https://storage.googleapis.com/storage/v1/";

/// Interval between polls of the long-running operation.
const POLL_INTERVAL: Duration = Duration::from_secs(5);

// ── Wire types ───────────────────────────────────────────────────────────

/// A fully-specified long-audio synthesis request.
///
/// Immutable once constructed; together with the backend it completely
/// determines the remote call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisRequest {
    /// `projects/{project}/locations/{location}` — bound into the request
    /// URL, not the JSON body.
    #[serde(skip)]
    pub parent: String,
    pub input: SynthesisInput,
    pub voice: VoiceSelectionParams,
    pub audio_config: AudioConfig,
    pub output_gcs_uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisInput {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceSelectionParams {
    pub language_code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioConfig {
    pub audio_encoding: String,
    pub speaking_rate: f64,
    pub pitch: f64,
}

impl SynthesisRequest {
    /// Assemble a request from the conversion config, the normalised text,
    /// and the destination storage URI.
    pub fn new(config: &ConversionConfig, text: String, output_gcs_uri: String) -> Self {
        Self {
            parent: format!(
                "projects/{}/locations/{}",
                config.project_id, config.location
            ),
            input: SynthesisInput { text },
            voice: VoiceSelectionParams {
                language_code: config.language_code.clone(),
                name: config.voice_name.clone(),
            },
            audio_config: AudioConfig {
                audio_encoding: config.audio_encoding.api_name().to_string(),
                speaking_rate: config.speaking_rate,
                pitch: config.pitch,
            },
            output_gcs_uri,
        }
    }
}

/// Destination URI for the synthesised object.
pub fn output_gcs_uri(bucket: &str, object: &str) -> String {
    format!("gs://{bucket}/{object}")
}

/// Long-running operation envelope returned by the synthesis API.
#[derive(Debug, Deserialize)]
struct Operation {
    name: String,
    #[serde(default)]
    done: bool,
    error: Option<OperationStatus>,
}

#[derive(Debug, Deserialize)]
struct OperationStatus {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

// ── Backend trait ────────────────────────────────────────────────────────

/// The remote half of the pipeline: synthesise text, then fetch the audio.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Submit the synthesis request and block until the remote operation
    /// completes or the configured deadline elapses.
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<(), Pdf2Mp3Error>;

    /// Download the synthesised object into `dest`. Returns bytes written.
    async fn download(&self, object_name: &str, dest: &Path) -> Result<u64, Pdf2Mp3Error>;
}

// ── Google Cloud implementation ──────────────────────────────────────────

/// [`SpeechBackend`] over the Google Cloud Text-to-Speech and Cloud
/// Storage JSON APIs.
#[derive(Debug)]
pub struct GoogleCloudBackend {
    http: reqwest::Client,
    token: String,
    bucket: String,
    synthesis_timeout: Duration,
}

impl GoogleCloudBackend {
    /// Build a backend from the config's cloud identifiers and token.
    ///
    /// The bearer token is taken from `config.access_token`, falling back
    /// to the `GOOGLE_ACCESS_TOKEN` environment variable.
    pub fn from_config(config: &ConversionConfig) -> Result<Self, Pdf2Mp3Error> {
        if config.project_id.is_empty() {
            return Err(Pdf2Mp3Error::BackendNotConfigured {
                hint: "Set a Google Cloud project with --project or GOOGLE_PROJECT_ID.".into(),
            });
        }
        if config.bucket.is_empty() {
            return Err(Pdf2Mp3Error::BackendNotConfigured {
                hint: "Set a Cloud Storage bucket for the synthesised audio with --bucket."
                    .into(),
            });
        }

        let token = config
            .access_token
            .clone()
            .or_else(|| std::env::var("GOOGLE_ACCESS_TOKEN").ok())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Pdf2Mp3Error::BackendNotConfigured {
                hint: "Provide an OAuth2 bearer token via the config or GOOGLE_ACCESS_TOKEN.\n\
                       For ad-hoc use: export GOOGLE_ACCESS_TOKEN=$(gcloud auth print-access-token)"
                    .into(),
            })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.download_timeout_secs.max(30)))
            .build()
            .map_err(|e| Pdf2Mp3Error::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            token,
            bucket: config.bucket.clone(),
            synthesis_timeout: Duration::from_secs(config.synthesis_timeout_secs),
        })
    }

    /// Fetch the current state of a long-running operation.
    async fn poll_operation(&self, name: &str) -> Result<Operation, Pdf2Mp3Error> {
        let url = format!("{TTS_API_BASE}/{name}");
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| Pdf2Mp3Error::SynthesisFailed {
                detail: format!("operation poll failed: {e}"),
            })?;

        let response = check_api_status(response).await?;
        response
            .json::<Operation>()
            .await
            .map_err(|e| Pdf2Mp3Error::SynthesisFailed {
                detail: format!("malformed operation response: {e}"),
            })
    }

    /// Poll `name` until it completes, fails, or the deadline elapses.
    async fn await_operation(&self, name: &str) -> Result<(), Pdf2Mp3Error> {
        let poll_loop = async {
            loop {
                let op = self.poll_operation(name).await?;
                if let Some(status) = op.error {
                    return Err(Pdf2Mp3Error::OperationFailed {
                        operation: op.name,
                        detail: format!("{} (code {})", status.message, status.code),
                    });
                }
                if op.done {
                    return Ok(());
                }
                debug!("Operation {} still running", op.name);
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        };

        match tokio::time::timeout(self.synthesis_timeout, poll_loop).await {
            Ok(result) => result,
            Err(_) => Err(Pdf2Mp3Error::SynthesisTimeout {
                secs: self.synthesis_timeout.as_secs(),
            }),
        }
    }
}

#[async_trait]
impl SpeechBackend for GoogleCloudBackend {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<(), Pdf2Mp3Error> {
        let url = format!("{TTS_API_BASE}/{}:synthesizeLongAudio", request.parent);
        info!(
            "Submitting synthesis request ({} chars) to {}",
            request.input.text.len(),
            request.parent
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await
            .map_err(|e| Pdf2Mp3Error::SynthesisFailed {
                detail: e.to_string(),
            })?;

        let response = check_api_status(response).await?;
        let operation: Operation =
            response
                .json()
                .await
                .map_err(|e| Pdf2Mp3Error::SynthesisFailed {
                    detail: format!("malformed operation response: {e}"),
                })?;

        info!("Synthesis operation started: {}", operation.name);
        self.await_operation(&operation.name).await
    }

    async fn download(&self, object_name: &str, dest: &Path) -> Result<u64, Pdf2Mp3Error> {
        let mut url = Url::parse(STORAGE_API_BASE)
            .map_err(|e| Pdf2Mp3Error::Internal(format!("storage URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| Pdf2Mp3Error::Internal("storage URL is not a base".into()))?
            .pop_if_empty()
            .extend(["b", self.bucket.as_str(), "o", object_name]);
        url.query_pairs_mut().append_pair("alt", "media");

        info!("Downloading gs://{}/{}", self.bucket, object_name);

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| Pdf2Mp3Error::DownloadFailed {
                detail: e.to_string(),
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Pdf2Mp3Error::AudioObjectMissing {
                bucket: self.bucket.clone(),
                object: object_name.to_string(),
            });
        }
        let response = check_api_status(response).await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Pdf2Mp3Error::DownloadFailed {
                detail: e.to_string(),
            })?;

        write_atomically(dest, &bytes).await?;
        Ok(bytes.len() as u64)
    }
}

/// Map HTTP error statuses onto the library's error taxonomy.
///
/// 401/403 become [`Pdf2Mp3Error::AuthFailed`]; any other non-success
/// status becomes a synthesis failure carrying the response body, which
/// Google APIs fill with a structured error message.
async fn check_api_status(response: reqwest::Response) -> Result<reqwest::Response, Pdf2Mp3Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(Pdf2Mp3Error::AuthFailed {
            detail: format!("HTTP {status}: {body}"),
        });
    }
    Err(Pdf2Mp3Error::SynthesisFailed {
        detail: format!("HTTP {status}: {body}"),
    })
}

/// Write `bytes` to `dest` via a temp file + rename so an interrupted
/// download never leaves a truncated artifact at the final path.
async fn write_atomically(dest: &Path, bytes: &[u8]) -> Result<(), Pdf2Mp3Error> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Pdf2Mp3Error::OutputWriteFailed {
                    path: dest.to_path_buf(),
                    source: e,
                })?;
        }
    }

    let mut tmp_ext = dest
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    tmp_ext.push_str(".tmp");
    let tmp_path = dest.with_extension(tmp_ext);

    tokio::fs::write(&tmp_path, bytes)
        .await
        .map_err(|e| Pdf2Mp3Error::OutputWriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, dest)
        .await
        .map_err(|e| Pdf2Mp3Error::OutputWriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serialises_with_camel_case_wire_names() {
        let config = ConversionConfig::builder()
            .project_id("proj")
            .location("global")
            .bucket("bkt")
            .build()
            .unwrap();
        let request = SynthesisRequest::new(
            &config,
            "hello".into(),
            output_gcs_uri("bkt", "doc.mp3"),
        );

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["input"]["text"], "hello");
        assert_eq!(json["voice"]["languageCode"], "en-GB");
        assert_eq!(json["voice"]["name"], "en-GB-Standard-B");
        assert_eq!(json["audioConfig"]["audioEncoding"], "MP3");
        assert_eq!(json["audioConfig"]["speakingRate"], 1.0);
        assert_eq!(json["outputGcsUri"], "gs://bkt/doc.mp3");
        // The parent is URL-bound, never part of the body.
        assert!(json.get("parent").is_none());
    }

    #[test]
    fn parent_is_built_from_project_and_location() {
        let config = ConversionConfig::builder()
            .project_id("textpdf-425312")
            .location("asia-south1")
            .build()
            .unwrap();
        let request = SynthesisRequest::new(&config, String::new(), String::new());
        assert_eq!(
            request.parent,
            "projects/textpdf-425312/locations/asia-south1"
        );
    }

    #[test]
    fn gcs_uri_format() {
        assert_eq!(output_gcs_uri("bucket", "file.mp3"), "gs://bucket/file.mp3");
    }

    #[test]
    fn backend_requires_project_and_bucket() {
        let config = ConversionConfig::builder()
            .access_token("tok")
            .build()
            .unwrap();
        let err = GoogleCloudBackend::from_config(&config).unwrap_err();
        assert!(matches!(err, Pdf2Mp3Error::BackendNotConfigured { .. }));

        let config = ConversionConfig::builder()
            .project_id("proj")
            .access_token("tok")
            .build()
            .unwrap();
        let err = GoogleCloudBackend::from_config(&config).unwrap_err();
        assert!(matches!(err, Pdf2Mp3Error::BackendNotConfigured { .. }));
    }

    #[test]
    fn backend_accepts_complete_config() {
        let config = ConversionConfig::builder()
            .project_id("proj")
            .bucket("bkt")
            .access_token("tok")
            .build()
            .unwrap();
        assert!(GoogleCloudBackend::from_config(&config).is_ok());
    }

    #[tokio::test]
    async fn atomic_write_creates_final_file_only() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.mp3");
        write_atomically(&dest, b"audio-bytes").await.unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"audio-bytes");
        assert!(!dir.path().join("out.mp3.tmp").exists());
    }
}
