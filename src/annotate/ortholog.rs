use crate::error::TableError;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

lazy_static! {
    // Prokka locus tag: eight capitals, underscore, number
    static ref LOCUS_TAG: Regex = Regex::new(r"[A-Z]{8}_\d+").unwrap();
}

/// Replaces the locus tags embedded in `locus_tag` with their ortholog names,
/// joined by `" - "`. Tags missing from the map are kept as they are. Text
/// without any locus tag comes back with every `" -"` removed.
pub fn find_ortholog(locus_tag: &str, locus_tag_map: &HashMap<String, String>) -> String {
    let remapped: Vec<&str> = LOCUS_TAG
        .find_iter(locus_tag)
        .map(|m| {
            locus_tag_map
                .get(m.as_str())
                .map(String::as_str)
                .unwrap_or(m.as_str())
        })
        .collect();

    let new_tag = remapped.join(" - ");
    if new_tag.is_empty() {
        locus_tag.replace(" -", "")
    } else {
        new_tag
    }
}

/// Locus tag to ortholog name lookup, read from a two-column file with a
/// header row (comma separated for `.csv`, tab separated otherwise).
#[derive(Debug, Clone, Default)]
pub struct OrthologMap {
    map: HashMap<String, String>,
}

impl OrthologMap {
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let delimiter = match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => b',',
            _ => b'\t',
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_path(path)?;

        let mut map = HashMap::new();
        for record in reader.records() {
            let record = record?;
            if let (Some(tag), Some(ortholog)) = (record.get(0), record.get(1)) {
                let (tag, ortholog) = (tag.trim(), ortholog.trim());
                if !tag.is_empty() && !ortholog.is_empty() {
                    map.insert(tag.to_string(), ortholog.to_string());
                }
            }
        }

        Ok(Self { map })
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn remap(&self, text: &str) -> String {
        find_ortholog(text, &self.map)
    }
}

impl From<HashMap<String, String>> for OrthologMap {
    fn from(map: HashMap<String, String>) -> Self {
        Self { map }
    }
}
