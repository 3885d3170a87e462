use std::{fmt, path::Path};

use serde::Deserialize;
use tokio::fs;

use crate::error::{Result, VidlensError};

/// Containers accepted by the upload step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoFormat {
    Mp4,
    Mov,
    Avi,
}

impl VideoFormat {
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp4" => Ok(VideoFormat::Mp4),
            "mov" => Ok(VideoFormat::Mov),
            "avi" => Ok(VideoFormat::Avi),
            _ => Err(VidlensError::UnsupportedFormat {
                extension: ext.to_string(),
            }),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        Self::from_extension(&ext)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            VideoFormat::Mp4 => "mp4",
            VideoFormat::Mov => "mov",
            VideoFormat::Avi => "avi",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            VideoFormat::Mp4 => "video/mp4",
            VideoFormat::Mov => "video/quicktime",
            VideoFormat::Avi => "video/x-msvideo",
        }
    }
}

/// A video handed over by the user, held in memory until it is staged.
#[derive(Debug, Clone)]
pub struct UploadedVideo {
    pub file_name: String,
    pub format: VideoFormat,
    pub bytes: Vec<u8>,
}

impl UploadedVideo {
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();
        let format = VideoFormat::from_path(Path::new(&file_name))?;
        Ok(Self {
            file_name,
            format,
            bytes,
        })
    }

    /// Read a video from disk. The extension is checked before the file is read.
    pub async fn read(path: &Path) -> Result<Self> {
        let format = VideoFormat::from_path(path)?;
        let bytes = fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| format!("video.{}", format.extension()));

        Ok(Self {
            file_name,
            format,
            bytes,
        })
    }
}

/// Processing state of a remote file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum FileState {
    Processing,
    Active,
    Failed,
    Unspecified,
    Other(String),
}

impl From<String> for FileState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PROCESSING" => FileState::Processing,
            "ACTIVE" => FileState::Active,
            "FAILED" => FileState::Failed,
            "STATE_UNSPECIFIED" => FileState::Unspecified,
            _ => FileState::Other(value),
        }
    }
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileState::Processing => f.write_str("PROCESSING"),
            FileState::Active => f.write_str("ACTIVE"),
            FileState::Failed => f.write_str("FAILED"),
            FileState::Unspecified => f.write_str("STATE_UNSPECIFIED"),
            FileState::Other(state) => f.write_str(state),
        }
    }
}

/// Reference to a file held by the remote media processor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaHandle {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default = "unspecified")]
    pub state: FileState,
}

fn unspecified() -> FileState {
    FileState::Unspecified
}

impl MediaHandle {
    pub fn is_processing(&self) -> bool {
        self.state == FileState::Processing
    }
}
