use std::{
    io::{self, Write},
    path::Path,
};

use tempfile::{Builder, TempPath};

use crate::{
    error::Result,
    media::{UploadedVideo, VideoFormat},
};

/// An uploaded video written to a uniquely named temp file.
///
/// The file is removed when the value is dropped, so every exit path of a
/// request releases it. [`StagedVideo::cleanup`] does the same explicitly and
/// reports real removal errors.
#[derive(Debug)]
pub struct StagedVideo {
    path: TempPath,
    file_name: String,
    format: VideoFormat,
}

impl StagedVideo {
    /// Stage into the system temp directory.
    pub fn stage(video: &UploadedVideo) -> Result<Self> {
        Self::stage_in(&std::env::temp_dir(), video)
    }

    pub fn stage_in(dir: &Path, video: &UploadedVideo) -> Result<Self> {
        let suffix = format!(".{}", video.format.extension());
        let mut file = Builder::new()
            .prefix("vidlens-")
            .suffix(&suffix)
            .tempfile_in(dir)?;

        file.write_all(&video.bytes)?;
        file.flush()?;

        let path = file.into_temp_path();
        tracing::debug!(
            file = %video.file_name,
            path = %path.display(),
            bytes = video.bytes.len(),
            "Staged upload"
        );

        Ok(Self {
            path,
            file_name: video.file_name.clone(),
            format: video.format,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn format(&self) -> VideoFormat {
        self.format
    }

    /// Remove the temp file now. A file that is already gone is not an error.
    pub fn cleanup(self) -> Result<()> {
        match self.path.close() {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
