use crate::core::summarizer::truncate_at_word_boundary;
use crate::core::transformer::RowTransformer;
use crate::domain::model::{RawPost, TransformedPost};

const PREVIEW_TEXT_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRow {
    pub original: RawPost,
    pub transformed: TransformedPost,
}

/// First `n` rows through the default rule-based transformer.
pub async fn preview(rows: &[RawPost], n: usize) -> Vec<PreviewRow> {
    preview_with(&RowTransformer::rule_based(), rows, n).await
}

/// First `n` rows through `transformer`. Nothing is written.
pub async fn preview_with(transformer: &RowTransformer, rows: &[RawPost], n: usize) -> Vec<PreviewRow> {
    tracing::info!("Previewing transformation on first {} rows", n.min(rows.len()));

    let mut preview = Vec::with_capacity(n.min(rows.len()));
    for raw in rows.iter().take(n) {
        let outcome = transformer.transform(raw).await;
        preview.push(PreviewRow {
            original: raw.clone(),
            transformed: outcome.post,
        });
    }
    preview
}

/// Original texts first, then the transformed rows, numbered from 1.
pub fn format_preview(rows: &[PreviewRow]) -> String {
    let mut out = String::from("=== ORIGINAL DATA ===\n");
    for (index, row) in rows.iter().enumerate() {
        out.push_str(&format!("\nRow {}:\n", index + 1));
        out.push_str(&format!("Text: {}\n", row.original.text));
    }

    out.push_str("\n=== TRANSFORMED DATA ===\n");
    for (index, row) in rows.iter().enumerate() {
        let post = &row.transformed;
        let text = truncate_at_word_boundary(&post.text, PREVIEW_TEXT_CHARS);
        let ellipsis = if text.len() < post.text.len() { "..." } else { "" };

        out.push_str(&format!("\nRow {}:\n", index + 1));
        out.push_str(&format!("Topic: {}\n", post.topic));
        out.push_str(&format!("Summary: {}\n", post.summary));
        out.push_str(&format!("Cleaned Text: {}{}\n", text, ellipsis));
    }
    out
}
