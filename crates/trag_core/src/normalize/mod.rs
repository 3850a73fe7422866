//! Line-level cleanup of raw extracted textbook text.
//!
//! PDF extraction leaves boilerplate interleaved with the prose: bare page
//! numbers, running "Chapter N" headers, and near-empty fragments. All of
//! those are dropped before chunking; everything else passes through in
//! input order.

#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Lines shorter than this (in characters, after trimming) are dropped.
    pub min_line_len: usize,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self { min_line_len: 3 }
    }
}

/// Strip boilerplate lines from raw extracted text.
///
/// Drops lines that are digit-only (page numbers), start with "chapter"
/// (case-insensitive), or are shorter than `min_line_len`. Line endings are
/// unified to `\n` and each kept line is trimmed.
pub fn clean_text(raw: &str, opts: &NormalizeOptions) -> String {
    let unified = normalize_newlines(raw);
    let mut kept: Vec<&str> = Vec::new();

    for line in unified.lines() {
        let line = line.trim();
        if line.chars().count() < opts.min_line_len {
            continue;
        }
        if !line.is_empty() && line.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        if line.to_lowercase().starts_with("chapter") {
            continue;
        }
        kept.push(line);
    }

    kept.join("\n")
}

pub(crate) fn normalize_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn drops_page_numbers_headers_and_short_lines() {
        let raw = "12\nChapter 3\nHi\nA real sentence here.";
        let out = clean_text(raw, &NormalizeOptions { min_line_len: 3 });
        assert_eq!(out, "A real sentence here.");
    }

    #[test]
    fn chapter_prefix_is_case_insensitive() {
        let raw = "CHAPTER 12 Sorting\nchapter overview\nSorting rearranges items.";
        let out = clean_text(raw, &NormalizeOptions::default());
        assert_eq!(out, "Sorting rearranges items.");
    }

    #[test]
    fn preserves_input_order_of_kept_lines() {
        let raw = "First kept line.\n7\nSecond kept line.";
        let out = clean_text(raw, &NormalizeOptions::default());
        assert_eq!(out, "First kept line.\nSecond kept line.");
    }

    #[test]
    fn unifies_crlf_line_endings() {
        let raw = "One kept line.\r\n42\r\nAnother kept line.";
        let out = clean_text(raw, &NormalizeOptions::default());
        assert_eq!(out, "One kept line.\nAnother kept line.");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(clean_text("", &NormalizeOptions::default()), "");
    }
}
