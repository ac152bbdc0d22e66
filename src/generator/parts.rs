//! Parts lists - the `PART,QTY` companion file of every service manual

use serde::{Deserialize, Serialize};

use super::archetype::Archetype;
use super::GeneratorError;

/// One required part and its quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartLine {
    pub part: String,
    pub quantity: u32,
}

impl PartLine {
    pub fn new(part: impl Into<String>, quantity: u32) -> Self {
        Self {
            part: part.into(),
            quantity,
        }
    }
}

/// Ordered parts list for one piece of equipment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartsList {
    pub lines: Vec<PartLine>,
}

impl PartsList {
    /// Generate the parts list for an equipment id
    ///
    /// Four archetype-specific parts come first, followed by the common
    /// consumables every service uses.
    pub fn generate(unique_id: u32) -> Self {
        let archetype = Archetype::for_equipment(unique_id);
        let mut lines = Vec::with_capacity(8);

        for (i, category) in archetype.part_categories.iter().enumerate() {
            let part = format!("{}-{:03}-{:02}", category, unique_id, i + 1);
            lines.push(PartLine::new(part, category_quantity(category, unique_id)));
        }

        lines.push(PartLine::new(
            format!("GREASE-{:03}-01", unique_id),
            2 + unique_id % 4,
        ));
        lines.push(PartLine::new(
            format!("OIL-{:03}-01", unique_id),
            1 + unique_id % 3,
        ));
        lines.push(PartLine::new(format!("FILTER-{:03}-01", unique_id), 1));
        lines.push(PartLine::new(
            format!("GASKET-{:03}-01", unique_id),
            1 + unique_id % 2,
        ));

        Self { lines }
    }

    /// Parse a parts file (`PART,QTY` per line, blank lines ignored)
    pub fn parse(content: &str) -> Result<Self, GeneratorError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut lines = Vec::new();
        for (idx, record) in rdr.records().enumerate() {
            let record = record.map_err(|e| GeneratorError::InvalidPartsLine {
                line: idx + 1,
                message: e.to_string(),
            })?;

            let line = record.position().map_or(idx + 1, |p| p.line() as usize);

            if record.iter().all(|f| f.is_empty()) {
                continue;
            }
            if record.len() != 2 {
                return Err(GeneratorError::InvalidPartsLine {
                    line,
                    message: format!("expected 'PART,QTY', got {} field(s)", record.len()),
                });
            }

            let quantity = record[1]
                .parse::<u32>()
                .map_err(|e| GeneratorError::InvalidPartsLine {
                    line,
                    message: format!("invalid quantity '{}': {}", &record[1], e),
                })?;
            lines.push(PartLine::new(&record[0], quantity));
        }

        Ok(Self { lines })
    }

    /// Render as file content, one `PART,QTY` pair per line
    pub fn to_text(&self) -> String {
        self.lines
            .iter()
            .map(|l| format!("{},{}", l.part, l.quantity))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Quantity for an archetype part, by the first rule matching the category name
fn category_quantity(category: &str, unique_id: u32) -> u32 {
    if category.contains("BEAR") {
        2 + unique_id % 3
    } else if category.contains("SEAL") {
        1 + unique_id % 2
    } else if category.contains("FILTER") {
        1
    } else if category.contains("GREASE") {
        2 + unique_id % 4
    } else if category.contains("OIL") {
        1 + unique_id % 3
    } else if category.contains("GASKET") {
        1 + unique_id % 2
    } else {
        1 + unique_id % 3
    }
}
