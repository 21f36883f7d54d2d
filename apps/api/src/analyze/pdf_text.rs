use bytes::Bytes;
use tracing::warn;

use crate::errors::AppError;

/// Extracts the text layer of a PDF on a blocking thread.
///
/// Unreadable PDFs and PDFs without any text both surface as 422.
pub async fn extract_text(bytes: Bytes) -> Result<String, AppError> {
    let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await;

    let text = match extracted {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!("PDF text extraction failed: {e}");
            return Err(unreadable());
        }
        Err(e) if e.is_panic() => {
            warn!("PDF text extraction panicked on malformed input");
            return Err(unreadable());
        }
        Err(e) => {
            return Err(AppError::Internal(anyhow::anyhow!(
                "PDF extraction task failed: {e}"
            )))
        }
    };

    if text.trim().is_empty() {
        return Err(unreadable());
    }
    Ok(text)
}

fn unreadable() -> AppError {
    AppError::UnprocessableEntity("Could not extract any text from the PDF.".to_string())
}

/// Builds a minimal one-page PDF whose text layer is `text`, with a valid
/// cross-reference table. `text` must not contain parentheses or backslashes.
#[cfg(test)]
pub(crate) fn sample_pdf(text: &str) -> Vec<u8> {
    let content = format!("BT /F1 12 Tf 72 712 Td ({text}) Tj ET");
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
            .to_string(),
        format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }

    let xref_offset = pdf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        objects.len() + 1
    ));
    pdf.extend_from_slice(xref.as_bytes());
    pdf
}
