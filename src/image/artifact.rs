// src/image/artifact.rs
// Image artifacts returned to clients: provider-hosted URLs or inline SVG data URIs

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, VizzyError};

/// Prefix of every inline placeholder image
pub const SVG_DATA_PREFIX: &str = "data:image/svg+xml;charset=utf-8,";

/// A generated image. Serialized as a bare string; `data:` URIs are embedded, anything else remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImageArtifact {
    /// Absolute http(s) URI to provider-hosted content
    Remote(String),
    /// Self-contained data URI, renderable without any further fetch
    Embedded(String),
}

impl ImageArtifact {
    /// Validate a provider-returned URL. Only absolute http(s) URIs are accepted.
    pub fn remote(uri: &str) -> Result<Self> {
        let parsed = Url::parse(uri.trim())
            .map_err(|e| VizzyError::Upstream(format!("invalid image URL '{}': {}", uri, e)))?;
        match parsed.scheme() {
            "http" | "https" => Ok(Self::Remote(parsed.to_string())),
            other => Err(VizzyError::Upstream(format!(
                "image URL has unsupported scheme '{}'",
                other
            ))),
        }
    }

    /// Wrap an SVG document as an inline data URI
    pub fn inline_svg(svg: &str) -> Self {
        Self::Embedded(format!("{}{}", SVG_DATA_PREFIX, urlencoding::encode(svg)))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Remote(uri) | Self::Embedded(uri) => uri,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::Embedded(_))
    }
}

impl From<String> for ImageArtifact {
    fn from(value: String) -> Self {
        if value.starts_with("data:") {
            Self::Embedded(value)
        } else {
            Self::Remote(value)
        }
    }
}

impl From<ImageArtifact> for String {
    fn from(artifact: ImageArtifact) -> Self {
        match artifact {
            ImageArtifact::Remote(uri) | ImageArtifact::Embedded(uri) => uri,
        }
    }
}
