//! Asset descriptors attached to lectures.
//!
//! These mirror the JSON shape the course API returns for a lecture's
//! primary asset and its supplementary assets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize `null` (or a missing field, with `#[serde(default)]`) as `T::default()`
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Kind of an asset, from the `asset_type` discriminator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssetKind {
    /// Video lecture
    Video,

    /// Generic downloadable file
    File,

    /// E-book (PDF, EPUB, ...)
    EBook,

    /// Hyperlink with no binary payload
    ExternalLink,

    /// Text article
    Article,

    /// Any other discriminator, kept verbatim
    Other(String),
}

impl AssetKind {
    /// Whether the kind names a downloadable document ("File" or "E-Book")
    pub fn is_document(&self) -> bool {
        matches!(self, AssetKind::File | AssetKind::EBook)
    }
}

impl Default for AssetKind {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for AssetKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Video" => AssetKind::Video,
            "File" => AssetKind::File,
            "E-Book" => AssetKind::EBook,
            "ExternalLink" => AssetKind::ExternalLink,
            "Article" => AssetKind::Article,
            _ => AssetKind::Other(s),
        }
    }
}

impl From<AssetKind> for String {
    fn from(kind: AssetKind) -> Self {
        kind.to_string()
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetKind::Video => write!(f, "Video"),
            AssetKind::File => write!(f, "File"),
            AssetKind::EBook => write!(f, "E-Book"),
            AssetKind::ExternalLink => write!(f, "ExternalLink"),
            AssetKind::Article => write!(f, "Article"),
            AssetKind::Other(s) => write!(f, "{}", s),
        }
    }
}

/// A streamable or downloadable media entry (video or audio)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MediaSource {
    /// MIME type, e.g. "video/mp4"
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub mime_type: String,

    /// Resolution label, e.g. "720" (may be non-numeric, e.g. "Auto")
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,

    /// Remote file URL
    #[serde(rename = "file", default, deserialize_with = "null_as_default")]
    pub url: String,
}

impl MediaSource {
    pub fn new(
        mime_type: impl Into<String>,
        label: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            mime_type: mime_type.into(),
            label: label.into(),
            url: url.into(),
        }
    }

    pub fn is_video(&self) -> bool {
        self.mime_type.starts_with("video/")
    }

    pub fn is_audio(&self) -> bool {
        self.mime_type.starts_with("audio/")
    }
}

/// A generic downloadable file (attachment, e-book)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileSource {
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,

    /// Remote file URL
    #[serde(rename = "file", default, deserialize_with = "null_as_default")]
    pub url: String,
}

impl FileSource {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// Download URL groupings keyed by kind
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DownloadUrls {
    #[serde(rename = "Video", default, deserialize_with = "null_as_default")]
    pub video: Vec<MediaSource>,

    #[serde(rename = "File", default, deserialize_with = "null_as_default")]
    pub file: Vec<FileSource>,

    #[serde(rename = "E-Book", default, deserialize_with = "null_as_default")]
    pub ebook: Vec<FileSource>,
}

impl DownloadUrls {
    /// Files listed under the grouping matching `kind` ("File" or "E-Book")
    pub fn files_for(&self, kind: &AssetKind) -> &[FileSource] {
        match kind {
            AssetKind::File => &self.file,
            AssetKind::EBook => &self.ebook,
            _ => &[],
        }
    }
}

/// Streaming URL grouping
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreamUrls {
    #[serde(rename = "Video", default, deserialize_with = "null_as_default")]
    pub video: Vec<MediaSource>,
}

/// Caption locale wrapper (`{"locale": "en_US"}`)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Locale {
    #[serde(default, deserialize_with = "null_as_default")]
    pub locale: String,
}

/// A caption track for a video
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Caption {
    #[serde(default)]
    pub id: u64,

    #[serde(default)]
    pub locale: Locale,

    /// Source file name; its extension names the caption format
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_name: String,

    /// Remote URL of the caption file
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// "auto" or "manual"
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,

    #[serde(default)]
    pub status: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub video_label: String,

    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

impl Caption {
    pub fn new(locale: impl Into<String>, file_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            locale: Locale {
                locale: locale.into(),
            },
            file_name: file_name.into(),
            url: url.into(),
            ..Default::default()
        }
    }
}

/// An external hyperlink captured from a supplementary asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLink {
    pub title: String,
    pub url: String,
}

/// An asset descriptor (primary or supplementary)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Asset {
    #[serde(default)]
    pub id: u64,

    /// Kind discriminator (`asset_type`)
    #[serde(rename = "asset_type", default, deserialize_with = "null_as_default")]
    pub kind: AssetKind,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// Target URL for ExternalLink assets
    #[serde(default, deserialize_with = "null_as_default")]
    pub external_url: String,

    #[serde(default)]
    pub download_urls: Option<DownloadUrls>,

    #[serde(default)]
    pub stream_urls: Option<StreamUrls>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub captions: Vec<Caption>,
}

impl Asset {
    /// Create an asset of the given kind with a title
    pub fn new(kind: AssetKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            ..Default::default()
        }
    }

    /// Create an external link asset
    pub fn link(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            external_url: url.into(),
            ..Self::new(AssetKind::ExternalLink, title)
        }
    }

    pub fn with_download_urls(mut self, urls: DownloadUrls) -> Self {
        self.download_urls = Some(urls);
        self
    }

    pub fn with_stream_urls(mut self, urls: StreamUrls) -> Self {
        self.stream_urls = Some(urls);
        self
    }

    pub fn with_caption(mut self, caption: Caption) -> Self {
        self.captions.push(caption);
        self
    }

    /// Media candidates: downloadable videos when present, else streaming videos.
    /// The two lists are never combined.
    pub fn media_candidates(&self) -> &[MediaSource] {
        match (&self.download_urls, &self.stream_urls) {
            (Some(d), _) if !d.video.is_empty() => &d.video,
            (_, Some(s)) => &s.video,
            _ => &[],
        }
    }

    /// Downloadable files for a "File" or "E-Book" asset
    pub fn document_files(&self) -> &[FileSource] {
        self.download_urls
            .as_ref()
            .map(|d| d.files_for(&self.kind))
            .unwrap_or(&[])
    }

    /// The link carried by an ExternalLink asset
    pub fn as_link(&self) -> Option<ExternalLink> {
        (self.kind == AssetKind::ExternalLink).then(|| ExternalLink {
            title: self.title.clone(),
            url: self.external_url.clone(),
        })
    }
}
