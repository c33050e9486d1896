use tracing::{error, info, warn};

use crate::api::{ApiError, LibraryService};
use crate::config::LibraryConfig;

/// Number of bibcodes requested per pagination call. Fixed: trades request
/// count for response size.
pub const PAGE_SIZE: usize = 25;

/// Everything the fetch captures from the source library: the full ordered
/// bibcode list plus the metadata the publisher needs.
#[derive(Debug, Clone)]
pub struct LibraryExport {
    /// Bibcodes in server-returned order. Duplicates from the source are
    /// passed through as-is.
    pub documents: Vec<String>,
    /// Display name of the source library.
    pub name: String,
    /// Description of the source library, copied to the target.
    pub description: String,
}

/// Retrieves the complete contents of the source library, paginating with a
/// fixed page size until the server-reported total is satisfied.
///
/// Any non-success status or unparseable body aborts the whole fetch; no
/// partial export is returned as a success value.
pub async fn fetch_library<S: LibraryService + ?Sized>(
    service: &S,
    config: &LibraryConfig,
) -> Result<LibraryExport, ApiError> {
    info!(library_id = %config.library_id, "Fetching source library contents");

    let first = service
        .get_library_page(&config.library_id, 0, PAGE_SIZE)
        .await
        .map_err(|e| {
            error!(error = %e, library_id = %config.library_id, "First page fetch failed");
            e
        })?;

    let total = first.metadata.num_documents;
    let name = first.metadata.name;
    let description = first.metadata.description;
    let mut documents = first.documents;

    info!(
        library_name = %name,
        num_documents = total,
        first_page = documents.len(),
        "First page retrieved"
    );

    // Total calls needed is ceil(total / PAGE_SIZE); the first one has
    // already happened.
    let num_pages = total.div_ceil(PAGE_SIZE);
    for page in 1..num_pages {
        let start = page * PAGE_SIZE;
        let next = service
            .get_library_page(&config.library_id, start, PAGE_SIZE)
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    library_id = %config.library_id,
                    start = start,
                    "Pagination call failed, aborting fetch"
                );
                e
            })?;
        documents.extend(next.documents);
    }

    if documents.len() != total {
        // The source library changed underneath us; there is no
        // continuation token or version check to detect this earlier.
        warn!(
            expected = total,
            retrieved = documents.len(),
            "Retrieved document count differs from reported total"
        );
    }

    info!(retrieved = documents.len(), "Fetch complete");

    Ok(LibraryExport {
        documents,
        name,
        description,
    })
}
