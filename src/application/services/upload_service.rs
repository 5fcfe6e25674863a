//! Upload Service
//!
//! Applies spreadsheet quantity deltas to existing products. Rows are matched
//! by `(article, size)` and streamed one at a time into the repository.

use std::sync::Arc;

use async_trait::async_trait;
use futures::{stream, StreamExt, TryStreamExt};

use crate::domain::ProductRepository;
use crate::infrastructure::metrics;
use crate::infrastructure::spreadsheet::{read_quantity_rows, QuantityRow, SpreadsheetError};
use crate::shared::error::AppError;

/// Upload service trait
#[async_trait]
pub trait UploadService: Send + Sync {
    /// Add the quantities listed in each file to the matching products
    async fn patch_product_quantity(
        &self,
        files: Vec<UploadedFile>,
        user_name: &str,
    ) -> Result<Vec<FileUploadDto>, UploadError>;
}

/// A file received from a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Per-file result of a quantity patch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUploadDto {
    pub file_name: String,
    pub rows_read: u64,
    pub rows_updated: u64,
    pub rows_skipped: u64,
    pub uploaded_by: String,
}

/// Upload service errors
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No file parts named 'file' were uploaded")]
    NoFiles,

    #[error("{file_name}: {source}")]
    InvalidFile {
        file_name: String,
        #[source]
        source: SpreadsheetError,
    },

    #[error(transparent)]
    Repository(#[from] AppError),
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::NoFiles | UploadError::InvalidFile { .. } => {
                AppError::BadRequest(err.to_string())
            }
            UploadError::Repository(e) => e,
        }
    }
}

/// UploadService implementation
pub struct UploadServiceImpl<R>
where
    R: ProductRepository + ?Sized,
{
    product_repo: Arc<R>,
}

impl<R> UploadServiceImpl<R>
where
    R: ProductRepository + ?Sized,
{
    pub fn new(product_repo: Arc<R>) -> Self {
        Self { product_repo }
    }

    /// Stream the rows of one file through point updates, awaiting each
    /// before pulling the next.
    async fn apply_rows(
        &self,
        file_name: String,
        rows: Vec<QuantityRow>,
        user_name: &str,
    ) -> Result<FileUploadDto, AppError> {
        let summary = FileUploadDto {
            file_name,
            rows_read: rows.len() as u64,
            rows_updated: 0,
            rows_skipped: 0,
            uploaded_by: user_name.to_string(),
        };

        let summary = stream::iter(rows)
            .then(|row| async move {
                let updated = self
                    .product_repo
                    .increment_quantity(row.article, row.size, row.quantity, user_name)
                    .await?;
                Ok::<_, AppError>((row, updated))
            })
            .try_fold(summary, |mut summary, (row, updated)| async move {
                match updated {
                    Some(product) => {
                        tracing::debug!(
                            article = row.article,
                            size = %row.size,
                            delta = row.quantity,
                            quantity = product.quantity,
                            "Product quantity patched"
                        );
                        summary.rows_updated += 1;
                    }
                    None => {
                        tracing::debug!(
                            line = row.line,
                            article = row.article,
                            size = %row.size,
                            delta = row.quantity,
                            "Row skipped: no matching product or quantity would become negative"
                        );
                        summary.rows_skipped += 1;
                    }
                }
                Ok::<_, AppError>(summary)
            })
            .await?;

        metrics::record_upload_rows(summary.rows_updated, summary.rows_skipped);

        Ok(summary)
    }
}

#[async_trait]
impl<R> UploadService for UploadServiceImpl<R>
where
    R: ProductRepository + ?Sized + 'static,
{
    async fn patch_product_quantity(
        &self,
        files: Vec<UploadedFile>,
        user_name: &str,
    ) -> Result<Vec<FileUploadDto>, UploadError> {
        if files.is_empty() {
            return Err(UploadError::NoFiles);
        }

        // Decode everything up front so a bad file leaves the catalog untouched.
        let decoded = files
            .into_iter()
            .map(|file| {
                read_quantity_rows(&file.bytes)
                    .map(|rows| (file.file_name.clone(), rows))
                    .map_err(|source| UploadError::InvalidFile {
                        file_name: file.file_name,
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut summaries = Vec::with_capacity(decoded.len());
        for (file_name, rows) in decoded {
            let summary = self.apply_rows(file_name, rows, user_name).await?;
            tracing::info!(
                file = %summary.file_name,
                read = summary.rows_read,
                updated = summary.rows_updated,
                skipped = summary.rows_skipped,
                user = %user_name,
                "Quantity upload processed"
            );
            summaries.push(summary);
        }

        Ok(summaries)
    }
}
