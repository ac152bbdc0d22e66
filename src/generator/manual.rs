//! Service manual rendering from embedded templates

use rust_embed::Embed;
use tera::Tera;

use super::archetype::{Archetype, MaintenanceSchedule};
use super::GeneratorError;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const MANUAL_TEMPLATE: &str = "service_manual.md.tera";

const EQUIPMENT_TYPE_MARKER: &str = "**Equipment Type:**";

/// A rendered markdown service manual
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualDocument {
    pub unique_id: u32,
    pub equipment_type: String,
    pub content: String,
}

impl ManualDocument {
    /// Build from an existing manual file, reading the equipment type from its overview
    pub fn from_content(unique_id: u32, content: String) -> Self {
        let equipment_type = extract_equipment_type(&content).unwrap_or_default();
        Self {
            unique_id,
            equipment_type,
            content,
        }
    }

    /// One-line description stored with the manual row
    pub fn service_description(&self) -> String {
        format!(
            "{} - Comprehensive maintenance service including inspection, lubrication, and parts replacement",
            self.equipment_type
        )
    }
}

/// Find the value of the `**Equipment Type:**` line, if present
pub fn extract_equipment_type(content: &str) -> Option<String> {
    content
        .lines()
        .find_map(|line| line.split_once(EQUIPMENT_TYPE_MARKER))
        .map(|(_, rest)| rest.trim().to_string())
}

/// Renders service manuals with tera
pub struct ManualGenerator {
    tera: Tera,
}

impl ManualGenerator {
    /// Create a generator with the embedded templates loaded
    pub fn new() -> Result<Self, GeneratorError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| GeneratorError::Template(e.to_string()))?;
                }
            }
        }

        if !tera.get_template_names().any(|n| n == MANUAL_TEMPLATE) {
            return Err(GeneratorError::Template(format!(
                "template not found: {}",
                MANUAL_TEMPLATE
            )));
        }

        Ok(Self { tera })
    }

    /// Render the manual for an equipment id
    pub fn render(&self, unique_id: u32) -> Result<ManualDocument, GeneratorError> {
        let archetype = Archetype::for_equipment(unique_id);
        let schedule = MaintenanceSchedule::for_equipment(unique_id);

        let mut context = tera::Context::new();
        context.insert("unique_id", &unique_id);
        context.insert("equipment_type", archetype.equipment_type);
        context.insert("model", archetype.model);
        context.insert("manufacturer", archetype.manufacturer);
        context.insert("serial_number", &archetype.serial_number(unique_id));
        context.insert("inspection_hours", &schedule.inspection_hours);
        context.insert("major_service_hours", &schedule.major_service_hours);
        context.insert("critical_check_hours", &schedule.critical_check_hours);

        let content = self
            .tera
            .render(MANUAL_TEMPLATE, &context)
            .map_err(|e| GeneratorError::Template(e.to_string()))?;

        Ok(ManualDocument {
            unique_id,
            equipment_type: archetype.equipment_type.to_string(),
            content,
        })
    }
}
