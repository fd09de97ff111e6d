//! Table rendering for human-readable CLI output.

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use crate::domain::models::{DocumentSummary, DuplicateGroup};

/// Render document summaries as a table.
pub fn format_documents_table(documents: &[DocumentSummary]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "Type", "Skill", "Source", "Snippet"]);

    for doc in documents {
        table.add_row(vec![
            doc.id.to_string(),
            doc.doc_type.to_string(),
            doc.skill.clone().unwrap_or_default(),
            doc.source_file.clone().unwrap_or_default(),
            doc.snippet.clone(),
        ]);
    }

    table
}

/// Render duplicate groups as a table.
pub fn format_duplicates_table(groups: &[DuplicateGroup]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Preview", "Type", "Count"]);

    for group in groups {
        table.add_row(vec![
            group.preview.clone(),
            group.doc_type.to_string(),
            group.count.to_string(),
        ]);
    }

    table
}
