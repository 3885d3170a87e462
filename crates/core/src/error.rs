use std::time::Duration;

use thiserror::Error;

use crate::media::FileState;

#[derive(Error, Debug)]
pub enum VidlensError {
    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidSetting { key: String, value: String },

    #[error("Unsupported video format {extension:?}. Expected one of: mp4, mov, avi")]
    UnsupportedFormat { extension: String },

    #[error("IO error: {0}")]
    LocalIo(#[from] std::io::Error),

    #[error("Upload failed: {reason}")]
    UploadFailed { reason: String },

    #[error("Video processing failed. Final state: {state}")]
    ProcessingFailed { state: FileState },

    #[error("Video still processing after {attempts} checks ({}s)", .waited.as_secs())]
    ProcessingTimedOut { attempts: u32, waited: Duration },

    #[error("Analysis failed: {reason}")]
    AnalysisFailed { reason: String },
}

/// Coarse classification used by the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Input,
    LocalIo,
    Upload,
    Processing,
    Analysis,
}

impl VidlensError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VidlensError::MissingApiKey { .. } | VidlensError::InvalidSetting { .. } => {
                ErrorKind::Configuration
            }
            VidlensError::UnsupportedFormat { .. } => ErrorKind::Input,
            VidlensError::LocalIo(_) => ErrorKind::LocalIo,
            VidlensError::UploadFailed { .. } => ErrorKind::Upload,
            VidlensError::ProcessingFailed { .. } | VidlensError::ProcessingTimedOut { .. } => {
                ErrorKind::Processing
            }
            VidlensError::AnalysisFailed { .. } => ErrorKind::Analysis,
        }
    }
}

pub type Result<T> = std::result::Result<T, VidlensError>;
