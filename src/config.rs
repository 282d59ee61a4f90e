//! Configuration types for PDF-to-MP3 conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct —
//! voice parameters, cloud identifiers, deadlines, page selection — replaces
//! the scattered literals and implicit defaults a quick script would use, and
//! makes two runs diffable when their outputs differ.

use crate::error::Pdf2Mp3Error;
use crate::synth::SpeechBackend;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Configuration for a PDF-to-MP3 conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2mp3::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .language_code("en-GB")
///     .voice_name("en-GB-Standard-B")
///     .speaking_rate(1.0)
///     .project_id("my-project")
///     .bucket("my-speech-bucket")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// BCP-47 language code for the synthesis voice. Default: "en-GB".
    pub language_code: String,

    /// Voice name within the language. Default: "en-GB-Standard-B".
    ///
    /// The full voice catalogue is service-side; the library passes the name
    /// through verbatim and surfaces the API's error for unknown voices.
    pub voice_name: String,

    /// Speaking rate multiplier. Range: 0.25–4.0. Default: 1.0.
    pub speaking_rate: f64,

    /// Pitch adjustment in semitones. Range: −20.0–20.0. Default: 0.0.
    pub pitch: f64,

    /// Audio encoding of the synthesised object. Default: [`AudioEncoding::Mp3`].
    ///
    /// Also determines the extension of the derived output path, so the
    /// artifact on disk always matches its container format.
    pub audio_encoding: AudioEncoding,

    /// Google Cloud project that owns the Text-to-Speech quota.
    ///
    /// Required by the real backend; tests injecting their own
    /// [`SpeechBackend`] may leave it empty.
    pub project_id: String,

    /// Service location forming the request parent
    /// (`projects/{project}/locations/{location}`). Default: "global".
    pub location: String,

    /// Cloud Storage bucket the service writes the synthesised audio into.
    ///
    /// The object name inside the bucket is the derived output filename.
    pub bucket: String,

    /// OAuth2 bearer token for the speech and storage APIs.
    ///
    /// If `None`, the `GOOGLE_ACCESS_TOKEN` environment variable is read at
    /// backend construction. Token *acquisition* (service accounts, ADC,
    /// refresh) is deliberately outside this crate.
    pub access_token: Option<String>,

    /// Deadline for the long-running synthesis operation in seconds.
    /// Default: 300.
    ///
    /// The deadline is fixed rather than scaled with document length; long
    /// documents should raise it explicitly.
    pub synthesis_timeout_secs: u64,

    /// Timeout for downloading the synthesised object in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Pages to convert, 1-indexed. Empty means the whole document.
    ///
    /// Out-of-range entries are dropped with a logged notice rather than an
    /// error; see [`crate::pipeline::pages::filter_pages`].
    pub pages: Vec<u32>,

    /// Pre-constructed speech backend. Takes precedence over the
    /// Google Cloud backend assembled from the fields above.
    pub backend: Option<Arc<dyn SpeechBackend>>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            language_code: "en-GB".to_string(),
            voice_name: "en-GB-Standard-B".to_string(),
            speaking_rate: 1.0,
            pitch: 0.0,
            audio_encoding: AudioEncoding::default(),
            project_id: String::new(),
            location: "global".to_string(),
            bucket: String::new(),
            access_token: None,
            synthesis_timeout_secs: 300,
            download_timeout_secs: 120,
            pages: Vec::new(),
            backend: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("language_code", &self.language_code)
            .field("voice_name", &self.voice_name)
            .field("speaking_rate", &self.speaking_rate)
            .field("pitch", &self.pitch)
            .field("audio_encoding", &self.audio_encoding)
            .field("project_id", &self.project_id)
            .field("location", &self.location)
            .field("bucket", &self.bucket)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("synthesis_timeout_secs", &self.synthesis_timeout_secs)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("pages", &self.pages)
            .field("backend", &self.backend.as_ref().map(|_| "<dyn SpeechBackend>"))
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn language_code(mut self, code: impl Into<String>) -> Self {
        self.config.language_code = code.into();
        self
    }

    pub fn voice_name(mut self, name: impl Into<String>) -> Self {
        self.config.voice_name = name.into();
        self
    }

    pub fn speaking_rate(mut self, rate: f64) -> Self {
        self.config.speaking_rate = rate.clamp(0.25, 4.0);
        self
    }

    pub fn pitch(mut self, semitones: f64) -> Self {
        self.config.pitch = semitones.clamp(-20.0, 20.0);
        self
    }

    pub fn audio_encoding(mut self, encoding: AudioEncoding) -> Self {
        self.config.audio_encoding = encoding;
        self
    }

    pub fn project_id(mut self, id: impl Into<String>) -> Self {
        self.config.project_id = id.into();
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.config.location = location.into();
        self
    }

    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.config.bucket = bucket.into();
        self
    }

    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.config.access_token = Some(token.into());
        self
    }

    pub fn synthesis_timeout_secs(mut self, secs: u64) -> Self {
        self.config.synthesis_timeout_secs = secs;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    /// Pages to convert, 1-indexed. An empty slice selects the whole document.
    pub fn pages(mut self, pages: impl Into<Vec<u32>>) -> Self {
        self.config.pages = pages.into();
        self
    }

    pub fn backend(mut self, backend: Arc<dyn SpeechBackend>) -> Self {
        self.config.backend = Some(backend);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2Mp3Error> {
        let c = &self.config;
        if c.language_code.is_empty() {
            return Err(Pdf2Mp3Error::InvalidConfig(
                "language_code must not be empty".into(),
            ));
        }
        if c.voice_name.is_empty() {
            return Err(Pdf2Mp3Error::InvalidConfig(
                "voice_name must not be empty".into(),
            ));
        }
        if c.synthesis_timeout_secs == 0 {
            return Err(Pdf2Mp3Error::InvalidConfig(
                "synthesis_timeout_secs must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Encoding of the synthesised audio object.
///
/// MP3 is the default because the tool's whole purpose is an `.mp3`
/// artifact; the other encodings exist for callers that post-process the
/// audio and prefer an uncompressed or Opus container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AudioEncoding {
    /// MPEG-1 Layer III. (default)
    #[default]
    Mp3,
    /// Uncompressed 16-bit little-endian PCM in a WAV container.
    Linear16,
    /// Opus in an Ogg container.
    OggOpus,
}

impl AudioEncoding {
    /// Wire name understood by the synthesis API.
    pub fn api_name(&self) -> &'static str {
        match self {
            AudioEncoding::Mp3 => "MP3",
            AudioEncoding::Linear16 => "LINEAR16",
            AudioEncoding::OggOpus => "OGG_OPUS",
        }
    }

    /// File extension of the local output artifact.
    pub fn extension(&self) -> &'static str {
        match self {
            AudioEncoding::Mp3 => "mp3",
            AudioEncoding::Linear16 => "wav",
            AudioEncoding::OggOpus => "ogg",
        }
    }
}
