use std::path::Path;

use async_trait::async_trait;

use crate::{error::Result, media::MediaHandle};

/// Remote service that ingests a file and processes it asynchronously.
#[async_trait]
pub trait MediaProcessor: Send + Sync {
    /// Upload the file at `path`. The returned handle usually starts out `PROCESSING`.
    async fn upload(
        &self,
        path: &Path,
        display_name: &str,
        mime_type: &str,
    ) -> Result<MediaHandle>;

    /// Re-fetch a handle by its remote name.
    async fn get(&self, name: &str) -> Result<MediaHandle>;
}
