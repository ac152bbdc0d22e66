//! The generated corpus: manual/parts file pairs on disk

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::manual::{ManualDocument, ManualGenerator};
use super::parts::PartsList;
use super::GeneratorError;

/// Equipment ids must fit the three-digit slot in part identifiers
pub const MAX_EQUIPMENT_ID: u32 = 999;

const MANUAL_SUFFIX: &str = "_manual.md";
const PARTS_SUFFIX: &str = "_parts.txt";

/// Manual and parts list for one piece of equipment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedEquipment {
    pub unique_id: u32,
    pub manual: ManualDocument,
    pub parts: PartsList,
}

impl GeneratedEquipment {
    pub fn manual_file_name(&self) -> String {
        format!("{}{}", self.unique_id, MANUAL_SUFFIX)
    }

    pub fn parts_file_name(&self) -> String {
        format!("{}{}", self.unique_id, PARTS_SUFFIX)
    }
}

/// All generated equipment, ordered by id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    pub equipment: Vec<GeneratedEquipment>,
}

impl Corpus {
    /// Generate `count` pieces of equipment starting at `start`
    pub fn generate(start: u32, count: u32) -> Result<Self, GeneratorError> {
        if start == 0 || count == 0 {
            return Err(GeneratorError::InvalidRange { start, count });
        }
        let end = start
            .checked_add(count - 1)
            .filter(|end| *end <= MAX_EQUIPMENT_ID)
            .ok_or(GeneratorError::InvalidRange { start, count })?;

        let generator = ManualGenerator::new()?;
        let mut equipment = Vec::with_capacity(count as usize);
        for unique_id in start..=end {
            equipment.push(GeneratedEquipment {
                unique_id,
                manual: generator.render(unique_id)?,
                parts: PartsList::generate(unique_id),
            });
        }

        Ok(Self { equipment })
    }

    /// Write `{id}_manual.md` and `{id}_parts.txt` for every piece of equipment
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, GeneratorError> {
        fs::create_dir_all(dir).map_err(|e| GeneratorError::io(dir, e))?;

        let mut written = Vec::with_capacity(self.equipment.len() * 2);
        for item in &self.equipment {
            let manual_path = dir.join(item.manual_file_name());
            fs::write(&manual_path, &item.manual.content)
                .map_err(|e| GeneratorError::io(&manual_path, e))?;

            let parts_path = dir.join(item.parts_file_name());
            fs::write(&parts_path, item.parts.to_text())
                .map_err(|e| GeneratorError::io(&parts_path, e))?;

            debug!(unique_id = item.unique_id, "wrote manual and parts list");
            written.push(manual_path);
            written.push(parts_path);
        }

        Ok(written)
    }

    /// Read every complete manual/parts pair from a directory
    ///
    /// Ids with only one of the two files are skipped with a warning.
    pub fn read_from(dir: &Path) -> Result<Self, GeneratorError> {
        if !dir.is_dir() {
            return Err(GeneratorError::MissingDirectory(dir.to_path_buf()));
        }

        let mut manuals: BTreeMap<u32, PathBuf> = BTreeMap::new();
        let mut parts: BTreeMap<u32, PathBuf> = BTreeMap::new();

        for entry in WalkDir::new(dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let name = entry.file_name().to_string_lossy();
            if let Some(id) = parse_file_id(&name, MANUAL_SUFFIX) {
                manuals.insert(id, entry.path().to_path_buf());
            } else if let Some(id) = parse_file_id(&name, PARTS_SUFFIX) {
                parts.insert(id, entry.path().to_path_buf());
            }
        }

        let mut equipment = Vec::with_capacity(manuals.len());
        for (unique_id, manual_path) in &manuals {
            let Some(parts_path) = parts.get(unique_id) else {
                warn!(unique_id, "manual has no parts list, skipping");
                continue;
            };

            let content = fs::read_to_string(manual_path)
                .map_err(|e| GeneratorError::io(manual_path, e))?;
            let parts_content = fs::read_to_string(parts_path)
                .map_err(|e| GeneratorError::io(parts_path, e))?;
            let parts_list = PartsList::parse(&parts_content).map_err(|e| match e {
                GeneratorError::InvalidPartsLine { line, message } => {
                    GeneratorError::InvalidPartsFile {
                        path: parts_path.clone(),
                        line,
                        message,
                    }
                }
                other => other,
            })?;

            equipment.push(GeneratedEquipment {
                unique_id: *unique_id,
                manual: ManualDocument::from_content(*unique_id, content),
                parts: parts_list,
            });
        }

        for unique_id in parts.keys().filter(|id| !manuals.contains_key(id)) {
            warn!(unique_id, "parts list has no manual, skipping");
        }

        Ok(Self { equipment })
    }

    pub fn len(&self) -> usize {
        self.equipment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equipment.is_empty()
    }

    pub fn total_part_lines(&self) -> usize {
        self.equipment.iter().map(|e| e.parts.len()).sum()
    }

    pub fn get(&self, unique_id: u32) -> Option<&GeneratedEquipment> {
        self.equipment.iter().find(|e| e.unique_id == unique_id)
    }
}

/// `"12_manual.md"` with suffix `"_manual.md"` -> `Some(12)`
fn parse_file_id(name: &str, suffix: &str) -> Option<u32> {
    name.strip_suffix(suffix)?.parse().ok()
}
