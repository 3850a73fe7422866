//! PDF text extraction glue. Parsing internals belong to the library; this
//! only walks the pages and joins their text.

use std::path::Path;

use pdf_oxide::converters::ConversionOptions;

pub fn extract_pdf_text(path: &Path) -> anyhow::Result<String> {
    let path_str = path.to_string_lossy();
    let mut doc = pdf_oxide::PdfDocument::open(path_str.as_ref())
        .map_err(|e| anyhow::anyhow!("failed to open PDF {}: {e}", path.display()))?;
    let page_count = doc
        .page_count()
        .map_err(|e| anyhow::anyhow!("failed to read page count of {}: {e}", path.display()))?;

    let options = ConversionOptions {
        include_images: false,
        ..ConversionOptions::default()
    };

    let mut out = String::new();
    for page_index in 0..page_count {
        let text = doc
            .to_markdown(page_index, &options)
            .map_err(|e| anyhow::anyhow!("failed to extract page {}: {e}", page_index + 1))?;
        if text.trim().is_empty() {
            continue;
        }
        out.push_str(text.trim_end());
        out.push('\n');
    }

    if out.trim().is_empty() {
        anyhow::bail!("no extractable text in {}", path.display());
    }
    Ok(out)
}
