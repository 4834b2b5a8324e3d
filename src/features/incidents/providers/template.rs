use async_trait::async_trait;

use crate::features::incidents::models::ImageUpload;
use crate::features::incidents::providers::{DescriptionProvider, ProviderError};
use crate::shared::constants::DESCRIPTION_EXCERPT_MAX;

/// Deterministic category-template description. Unknown categories get the
/// generic template, so this provider can never come up empty.
pub fn template_description(category: &str, reporter_note: Option<&str>) -> String {
    let base = match category {
        "Fire" => "Fire incident detected. Visible flames, smoke, or fire-related damage observed.",
        "Flood" => {
            "Flooding situation visible. Water accumulation, submerged areas, or water damage present."
        }
        "Accident" => {
            "Traffic or vehicular accident scene. Vehicles involved, debris, or emergency response visible."
        }
        "Electricity" => {
            "Electrical issue detected. Power lines, electrical equipment, or power-related problem visible."
        }
        _ => "Emergency incident reported. Visual evidence captured.",
    };

    match reporter_note {
        Some(note) if !note.is_empty() => {
            let excerpt: String = note.chars().take(DESCRIPTION_EXCERPT_MAX).collect();
            format!("{base} Additional context: {excerpt}.")
        }
        _ => base.to_string(),
    }
}

/// Terminal describer of every photo-description chain
pub struct TemplateDescriber;

#[async_trait]
impl DescriptionProvider for TemplateDescriber {
    fn name(&self) -> &'static str {
        "category-template"
    }

    async fn describe(
        &self,
        _image: &ImageUpload,
        category: &str,
        reporter_note: Option<&str>,
    ) -> Result<String, ProviderError> {
        Ok(template_description(category, reporter_note))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_category_has_its_own_template() {
        assert!(template_description("Fire", None).contains("Fire incident detected"));
        assert!(template_description("Flood", None).contains("Flooding situation visible"));
        assert!(template_description("Accident", None).contains("accident scene"));
        assert!(template_description("Electricity", None).contains("Electrical issue detected"));
    }

    #[test]
    fn unknown_category_gets_the_generic_template() {
        let text = template_description("Landslide", None);
        assert_eq!(text, "Emergency incident reported. Visual evidence captured.");
    }

    #[test]
    fn reporter_note_is_appended_as_context() {
        let text = template_description("Fire", Some("Flames near the gas station"));
        assert!(text.ends_with("Additional context: Flames near the gas station."));
    }

    #[test]
    fn long_notes_are_truncated_to_one_hundred_chars() {
        let note = "x".repeat(250);
        let text = template_description("Flood", Some(&note));
        assert!(text.contains(&"x".repeat(100)));
        assert!(!text.contains(&"x".repeat(101)));
    }

    #[test]
    fn empty_note_is_ignored() {
        let text = template_description("Accident", Some(""));
        assert!(!text.contains("Additional context"));
    }
}
