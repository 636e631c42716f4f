//! Text clean-up for values read off the page

use sprout_core::{slugify, PlantMetadata};

/// Trimmed paragraph with non-breaking spaces flattened, `None` when blank.
pub fn normalize_paragraph(raw: &str) -> Option<String> {
    let text = raw.trim().replace('\u{a0}', " ");
    (!text.is_empty()).then_some(text)
}

/// Builds one metadata entry from a feature row.
///
/// `label_text` is the label span (`"Light:"`), `row_text` the whole row,
/// which repeats the label in front of the value.
pub fn metadata_entry(label_text: &str, row_text: &str) -> Option<PlantMetadata> {
    let trimmed = label_text.trim();
    let label = trimmed.strip_suffix(':').unwrap_or(trimmed).trim();
    if label.is_empty() {
        return None;
    }

    let without_label = if !label_text.is_empty() && row_text.contains(label_text) {
        row_text.replacen(label_text, "", 1)
    } else {
        row_text.replacen(trimmed, "", 1)
    };
    let value = without_label.split_whitespace().collect::<Vec<_>>().join(" ");

    Some(PlantMetadata {
        id: slugify(label),
        label: label.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraph_is_trimmed_and_nbsp_flattened() {
        assert_eq!(
            normalize_paragraph("  Easy\u{a0}care, low\u{a0}light.\n"),
            Some("Easy care, low light.".to_string())
        );
    }

    #[test]
    fn blank_paragraph_is_dropped() {
        assert_eq!(normalize_paragraph(" \u{a0}\n "), None);
    }

    #[test]
    fn metadata_value_drops_label_and_extra_whitespace() {
        let entry = metadata_entry("Light:", "\n  Light:\n   Bright   indirect \n light ").unwrap();
        assert_eq!(entry.id, "light");
        assert_eq!(entry.label, "Light");
        assert_eq!(entry.value, "Bright indirect light");
    }

    #[test]
    fn metadata_label_matched_when_inner_text_is_trimmed() {
        let entry = metadata_entry("Pet Friendly: ", "Pet Friendly:No").unwrap();
        assert_eq!(entry.id, "pet-friendly");
        assert_eq!(entry.value, "No");
    }

    #[test]
    fn empty_label_yields_nothing() {
        assert!(metadata_entry("  :", "whatever").is_none());
    }
}
