use bytes::Bytes;

use crate::errors::AppError;

/// Pulls plain text out of an uploaded proposal so it can be analysed.
/// PDFs go through `pdf-extract`; anything else must be UTF-8 text.
pub async fn extract_text(
    filename: &str,
    content_type: &str,
    bytes: Bytes,
) -> Result<String, AppError> {
    let filename = filename.to_string();
    let content_type = content_type.to_string();

    // PDF parsing is CPU-bound and runs on the blocking pool.
    tokio::task::spawn_blocking(move || extract_text_sync(&filename, &content_type, &bytes))
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed in text extraction: {e}"))
        })?
}

fn extract_text_sync(filename: &str, content_type: &str, bytes: &Bytes) -> Result<String, AppError> {
    let is_pdf = content_type == "application/pdf"
        || filename.to_ascii_lowercase().ends_with(".pdf")
        || bytes.starts_with(b"%PDF");

    let text = if is_pdf {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| AppError::Validation(format!("Could not read PDF '{filename}': {e}")))?
    } else {
        String::from_utf8(bytes.to_vec()).map_err(|_| {
            AppError::Validation(format!(
                "Unsupported file '{filename}': upload a PDF or UTF-8 text document"
            ))
        })?
    };

    Ok(normalize_whitespace(&text))
}

fn normalize_whitespace(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_plain_text_is_read_as_utf8() {
        let bytes = Bytes::from_static(b"  Safety plan  \nEMR 0.6\n\n");
        let text = extract_text("proposal.txt", "text/plain", bytes).await.unwrap();
        assert_eq!(text, "Safety plan\nEMR 0.6");
    }

    #[tokio::test]
    async fn test_binary_non_pdf_is_rejected() {
        let bytes = Bytes::from_static(&[0xff, 0xfe, 0x00, 0x81]);
        assert!(matches!(
            extract_text("proposal.docx", "application/octet-stream", bytes).await,
            Err(AppError::Validation(_))
        ));
    }
}
