/// Status updates emitted while a request runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    Uploading { file_name: String },
    Uploaded { display_name: String },
    Processing { attempt: u32 },
    Ready,
    Analyzing { model: String },
}

/// Display surface for [`Progress`] updates.
pub trait Reporter: Send + Sync {
    fn report(&self, progress: Progress);
}

/// Discards every update.
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn report(&self, _progress: Progress) {}
}
