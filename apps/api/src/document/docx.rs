use std::panic::{self, AssertUnwindSafe};

use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};

use super::pdf::panic_message;

/// Reads a DOCX package and returns the raw text of its body paragraphs.
/// Styling is discarded; each paragraph is followed by a blank line.
pub fn extract_text(bytes: &[u8]) -> Result<String, String> {
    if bytes.is_empty() {
        return Err("empty DOCX buffer".to_string());
    }

    let docx = match panic::catch_unwind(AssertUnwindSafe(|| read_docx(bytes))) {
        Ok(Ok(docx)) => docx,
        Ok(Err(e)) => return Err(format!("not a readable DOCX package: {e}")),
        Err(payload) => {
            return Err(format!(
                "DOCX reader panicked: {}",
                panic_message(&*payload)
            ))
        }
    };

    let mut text = String::new();
    for child in &docx.document.children {
        let DocumentChild::Paragraph(paragraph) = child else {
            continue;
        };
        for paragraph_child in &paragraph.children {
            if let ParagraphChild::Run(run) = paragraph_child {
                push_run_text(&mut text, &run.children);
            }
        }
        text.push_str("\n\n");
    }

    Ok(text)
}

fn push_run_text(out: &mut String, children: &[RunChild]) {
    for child in children {
        match child {
            RunChild::Text(t) => out.push_str(&t.text),
            RunChild::Tab(_) => out.push('\t'),
            RunChild::Break(_) => out.push('\n'),
            _ => {}
        }
    }
}
