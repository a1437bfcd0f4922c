//! Output file naming.
//!
//! Page `i` of `report.pdf` becomes `report_page_{i}.png`. Only one trailing
//! `.pdf` is stripped, case-sensitively; any other name is used whole, so
//! `a.pdf.backup` yields `a.pdf.backup_page_0.png` and `A.PDF` yields
//! `A.PDF_page_0.png`.

/// The suffix removed from input names.
pub const PDF_SUFFIX: &str = ".pdf";

/// Input name with a single trailing `.pdf` removed.
pub fn base_name(input_file: &str) -> &str {
    input_file.strip_suffix(PDF_SUFFIX).unwrap_or(input_file)
}

/// `{base}_page_{page_index}.png`, `page_index` 0-based.
pub fn page_file_name(base: &str, page_index: usize) -> String {
    format!("{base}_page_{page_index}.png")
}
