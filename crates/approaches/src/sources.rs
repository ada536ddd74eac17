//! Formatting retrieved passages into the prompt's `Sources:` block.

use grounded_search::Document;
use std::path::Path;

/// One `"<citation>: <text>"` line per result, in result order.
///
/// With captions on, a document's joined captions replace its content;
/// documents without captions fall back to their content.
pub fn get_sources_content(results: &[Document], use_semantic_captions: bool) -> Vec<String> {
    results
        .iter()
        .map(|doc| {
            let text = match doc.caption_text() {
                Some(captions) if use_semantic_captions => captions,
                _ => doc.content().to_string(),
            };
            format!("{}: {}", get_citation(doc.source_page()), nonewlines(&text))
        })
        .collect()
}

/// Citation for a source page.
///
/// Page images named `<doc>-<n>.png` cite the page of the original PDF.
pub fn get_citation(sourcepage: &str) -> String {
    let path = Path::new(sourcepage);
    let is_png = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("png"))
        .unwrap_or(false);

    if !is_png {
        return sourcepage.to_string();
    }

    // Strip ".png"; the stem may itself contain dots and dashes.
    let stem = &sourcepage[..sourcepage.len() - 4];
    match stem
        .rsplit_once('-')
        .and_then(|(doc, page)| Some((doc, page.parse::<u32>().ok()?)))
    {
        Some((doc, page)) => format!("{}.pdf#page={}", doc, page),
        None => sourcepage.to_string(),
    }
}

/// Replace line breaks with spaces.
pub fn nonewlines(s: &str) -> String {
    s.replace(['\n', '\r'], " ")
}
