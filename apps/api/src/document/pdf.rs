use std::panic::{self, AssertUnwindSafe};

/// Runs pdf-extract's layout pass over an in-memory PDF.
///
/// The parser panics on some malformed inputs; those panics are contained here and
/// reported like any other extraction error.
pub fn extract_text(bytes: &[u8]) -> Result<String, String> {
    if bytes.is_empty() {
        return Err("empty PDF buffer".to_string());
    }

    match panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(format!("PDF parse error: {e}")),
        Err(payload) => Err(format!("PDF parser panicked: {}", panic_message(&*payload))),
    }
}

pub(super) fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
