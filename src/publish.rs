use tracing::{error, info, warn};

use crate::api::{ApiError, LibraryService, NewLibrary};
use crate::config::LibraryConfig;
use crate::fetch::LibraryExport;

/// Maximum number of bibcodes per write request, a server-imposed payload
/// limit.
pub const BATCH_SIZE: usize = 500;

/// Structured summary of what the publish run did.
///
/// `actions` holds the human-readable log rendered to stdout; the counters
/// distinguish what was submitted from what the server confirmed, so a
/// partial or under-reported write is visible instead of silently folded
/// into one opaque number.
#[derive(Debug, Clone, Default)]
pub struct PublishReport {
    pub actions: Vec<String>,
    pub warnings: Vec<String>,
    /// Id of a library created by this run, if any.
    pub created_library_id: Option<String>,
    pub batches_attempted: usize,
    pub batches_succeeded: usize,
    /// Bibcodes submitted across all accepted requests.
    pub submitted: usize,
    /// Additions the server explicitly confirmed.
    pub confirmed: u64,
}

impl PublishReport {
    /// Newline-joined report for display: actions first, warnings after.
    pub fn render(&self) -> String {
        self.actions
            .iter()
            .chain(self.warnings.iter())
            .cloned()
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Splits the bibcode sequence into order-preserving batches of at most
/// `size` elements.
pub fn batches(documents: &[String], size: usize) -> Vec<&[String]> {
    documents.chunks(size).collect()
}

/// Materializes the export into the destination library: creates it when no
/// library with the target name exists, then extends it batch by batch.
///
/// A failed or missing-count batch is recorded in the report and does not
/// stop later batches; only the existence check and the create call are
/// hard errors.
pub async fn publish<S: LibraryService + ?Sized>(
    service: &S,
    config: &LibraryConfig,
    export: &LibraryExport,
) -> Result<PublishReport, ApiError> {
    let target_name = config.library_name.as_deref().unwrap_or(&export.name);
    let mut report = PublishReport::default();

    // Existence check. A malformed or failed listing is a typed error for
    // the caller, not an implicit "not found".
    let libraries = service.list_libraries().await.map_err(|e| {
        error!(error = %e, "Failed to list libraries for existence check");
        e
    })?;
    let existing_id = libraries
        .iter()
        .find(|lib| lib.name == target_name)
        .map(|lib| lib.id.clone());

    let mut chunks = batches(&export.documents, BATCH_SIZE).into_iter();

    let library_id = match existing_id {
        Some(id) => {
            info!(library_id = %id, target_name = %target_name, "Target library exists, extending it");
            id
        }
        None => {
            // Create the target with the first batch; an empty export still
            // creates the library, with an empty bibcode list.
            let first: &[String] = chunks.next().unwrap_or(&[]);
            let created = service
                .create_library(NewLibrary {
                    name: target_name,
                    description: &export.description,
                    public: false,
                    bibcodes: first,
                })
                .await
                .map_err(|e| {
                    error!(error = %e, target_name = %target_name, "Failed to create target library");
                    e
                })?;
            info!(library_id = %created.id, count = first.len(), "Created target library");
            report.actions.push(format!(
                "Created a new library (name: {}, description: {}, ID: {})",
                target_name, export.description, created.id
            ));
            report.submitted += first.len();
            report.confirmed += first.len() as u64;
            report.created_library_id = Some(created.id.clone());
            created.id
        }
    };

    for (index, chunk) in chunks.enumerate() {
        report.batches_attempted += 1;
        match service.add_documents(&library_id, chunk).await {
            Ok(outcome) => {
                report.batches_succeeded += 1;
                report.submitted += chunk.len();
                match outcome.number_added {
                    Some(n) => {
                        info!(batch = index, added = n, "Batch accepted");
                        report.confirmed += n;
                    }
                    None => {
                        warn!(batch = index, "Add response omitted number_added");
                        report.warnings.push(format!(
                            "Warning: server response for batch {} omitted number_added; \
                             the confirmed total may under-report actual additions",
                            index + 1
                        ));
                    }
                }
            }
            Err(e) => {
                error!(error = %e, batch = index, "Batch add failed, continuing with next batch");
                report.warnings.push(format!(
                    "Warning: batch {} of {} bibcodes failed: {}",
                    index + 1,
                    chunk.len(),
                    e
                ));
            }
        }
    }

    if report.confirmed != report.submitted as u64 {
        report.warnings.push(format!(
            "Warning: submitted {} bibcodes but the server confirmed {}",
            report.submitted, report.confirmed
        ));
    }

    report.actions.push(format!(
        "Number of records added to the library: {}",
        report.confirmed
    ));
    if report.batches_attempted > 0 {
        report.actions.push(format!(
            "Add batches attempted: {}, succeeded: {}",
            report.batches_attempted, report.batches_succeeded
        ));
    }

    Ok(report)
}
