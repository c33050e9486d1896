//! Coordinating module for the fetch-then-publish copy.

use tracing::info;

use crate::api::{ApiError, LibraryService};
use crate::config::LibraryConfig;
use crate::fetch::fetch_library;
use crate::publish::{publish, PublishReport};

/// Copies the source library into the destination: runs the fetch to
/// completion, then publishes the full export once. No streaming or
/// interleaving; a fetch error aborts before any write happens.
pub async fn transfer<S: LibraryService + ?Sized>(
    service: &S,
    config: &LibraryConfig,
) -> Result<PublishReport, ApiError> {
    let export = fetch_library(service, config).await?;
    info!(
        documents = export.documents.len(),
        source_name = %export.name,
        "Fetch finished, starting publish"
    );
    publish(service, config, &export).await
}
