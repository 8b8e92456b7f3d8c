//! Multipart form handling shared by the analyze and interview-start
//! endpoints: both accept a resume and a job description as either an
//! uploaded document or plain text.

use axum::extract::Multipart;
use bytes::Bytes;
use tracing::warn;

use crate::errors::AppError;
use crate::extract::{extract_text, truncate_chars};

/// An uploaded document, kept as raw bytes until its extension routes it to
/// an extractor.
pub struct UploadedDoc {
    pub filename: String,
    pub bytes: Bytes,
}

impl UploadedDoc {
    fn extension(&self) -> &str {
        self.filename.rsplit('.').next().unwrap_or_default()
    }
}

/// All fields the document-accepting endpoints understand. Unknown fields
/// are ignored.
#[derive(Default)]
pub struct DocumentForm {
    pub resume_file: Option<UploadedDoc>,
    pub resume_text: Option<String>,
    pub job_description_file: Option<UploadedDoc>,
    pub job_description_text: Option<String>,
    pub rewrite_all_bullets: bool,
    pub custom_instructions: String,
    pub session_id: Option<String>,
}

impl DocumentForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = DocumentForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid multipart form: {e}")))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match name.as_str() {
                "resume_file" | "job_description_file" => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
                    let doc = UploadedDoc { filename, bytes };
                    if name == "resume_file" {
                        form.resume_file = Some(doc);
                    } else {
                        form.job_description_file = Some(doc);
                    }
                }
                "resume_text" => form.resume_text = Some(read_text(field).await?),
                "job_description_text" => {
                    form.job_description_text = Some(read_text(field).await?)
                }
                "rewrite_all_bullets" => {
                    let raw = read_text(field).await?;
                    form.rewrite_all_bullets = matches!(raw.trim(), "true" | "1" | "on");
                }
                "custom_instructions" => form.custom_instructions = read_text(field).await?,
                "session_id" => form.session_id = Some(read_text(field).await?),
                _ => {}
            }
        }

        Ok(form)
    }

    /// Resolves the resume input to clean text, bounded by `max_chars`.
    pub fn resolve_resume(&self, max_chars: usize) -> Result<String, AppError> {
        resolve_document(
            self.resume_file.as_ref(),
            self.resume_text.as_deref(),
            "resume",
            max_chars,
        )
    }

    /// Resolves the job description input to clean text, bounded by `max_chars`.
    pub fn resolve_job_description(&self, max_chars: usize) -> Result<String, AppError> {
        resolve_document(
            self.job_description_file.as_ref(),
            self.job_description_text.as_deref(),
            "job description",
            max_chars,
        )
    }
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid form field: {e}")))
}

/// File input wins over text input when both are present, matching the
/// upload-first UI flow. Fails when neither is provided or the resolved
/// text is empty.
fn resolve_document(
    file: Option<&UploadedDoc>,
    text: Option<&str>,
    label: &str,
    max_chars: usize,
) -> Result<String, AppError> {
    let resolved = match (file, text) {
        (Some(doc), _) => extract_text(&doc.bytes, doc.extension())?,
        (None, Some(text)) => text.to_string(),
        (None, None) => {
            return Err(AppError::Validation(format!(
                "Please provide either a {label} file or {label} text"
            )));
        }
    };

    let trimmed = resolved.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!(
            "The {label} text is empty after parsing"
        )));
    }

    if trimmed.chars().count() > max_chars {
        warn!(
            "{label} text too large ({} chars), trimming to {max_chars}",
            trimmed.chars().count()
        );
    }
    Ok(truncate_chars(trimmed, max_chars).to_string())
}
