use crate::error::BbsError;
use crate::model::{AssembledTable, CanonicalHeader, ColumnKey, OutputTable};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Where a canonical column takes its values from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceColumn {
    /// A column labelled by a header row.
    #[serde(rename = "label")]
    ByLabel(String),
    /// A positional column of a fragment that had no header.
    #[serde(rename = "position")]
    ByPosition(usize),
    /// Fill the canonical column with empty values.
    #[default]
    Ignore,
}

impl SourceColumn {
    fn key(&self) -> Option<ColumnKey> {
        match self {
            SourceColumn::ByLabel(l) => Some(ColumnKey::Label(l.clone())),
            SourceColumn::ByPosition(i) => Some(ColumnKey::Position(*i)),
            SourceColumn::Ignore => None,
        }
    }
}

impl From<&ColumnKey> for SourceColumn {
    fn from(key: &ColumnKey) -> Self {
        match key {
            ColumnKey::Label(l) => SourceColumn::ByLabel(l.clone()),
            ColumnKey::Position(i) => SourceColumn::ByPosition(*i),
        }
    }
}

/// An assignment of every canonical header to a source column or `Ignore`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    sources: [SourceColumn; 14],
}

impl ColumnMapping {
    /// Every header ignored.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map each canonical header to the source column with the identical label.
    pub fn matching_labels(columns: &[ColumnKey]) -> Self {
        let mut mapping = Self::new();
        for header in CanonicalHeader::ALL {
            if columns.iter().any(|c| c.is_label(header.label())) {
                mapping.set(header, SourceColumn::ByLabel(header.label().to_string()));
            }
        }
        mapping
    }

    pub fn set(&mut self, header: CanonicalHeader, source: SourceColumn) -> &mut Self {
        self.sources[header.index()] = source;
        self
    }

    pub fn get(&self, header: CanonicalHeader) -> &SourceColumn {
        &self.sources[header.index()]
    }

    pub fn entries(&self) -> impl Iterator<Item = (CanonicalHeader, &SourceColumn)> {
        CanonicalHeader::ALL.into_iter().zip(self.sources.iter())
    }

    /// Project `table` onto the canonical headers.
    ///
    /// Assigned columns are copied verbatim; ignored ones are filled with
    /// empty strings. The same source column may feed several headers.
    pub fn apply(&self, table: &AssembledTable) -> Result<OutputTable, BbsError> {
        let mut columns: Vec<Option<usize>> = Vec::with_capacity(CanonicalHeader::ALL.len());
        for (_, source) in self.entries() {
            let index = match source.key() {
                Some(key) => Some(
                    table
                        .column_index(&key)
                        .ok_or_else(|| BbsError::UnknownColumn(key.to_string()))?,
                ),
                None => None,
            };
            columns.push(index);
        }

        let rows = table
            .rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|col| col.and_then(|i| row.get(i).cloned()).unwrap_or_default())
                    .collect()
            })
            .collect();

        Ok(OutputTable {
            headers: CanonicalHeader::ALL.to_vec(),
            rows,
        })
    }

    /// JSON object keyed by canonical header label, in output order.
    pub fn to_json(&self) -> Result<String, BbsError> {
        let mut map = serde_json::Map::new();
        for (header, source) in self.entries() {
            map.insert(header.label().to_string(), serde_json::to_value(source)?);
        }
        Ok(serde_json::to_string_pretty(&serde_json::Value::Object(map))?)
    }
}

/// Load a column mapping from a JSON file.
pub fn load_mapping(path: &Path) -> Result<ColumnMapping, BbsError> {
    let content = std::fs::read_to_string(path)?;
    parse_mapping(&content)
}

/// Parse a column mapping from a JSON object keyed by canonical header.
///
/// Values are `"ignore"`, `{"label": "..."}` or `{"position": n}`. Headers
/// that are absent stay ignored; unknown or repeated headers are rejected.
pub fn parse_mapping(json: &str) -> Result<ColumnMapping, BbsError> {
    let raw: MappingEntries =
        serde_json::from_str(json).map_err(|e| BbsError::MappingInvalid(e.to_string()))?;

    let mut mapping = ColumnMapping::new();
    let mut seen = HashSet::new();
    for (key, source) in raw.0 {
        let header = CanonicalHeader::from_label(&key).ok_or_else(|| {
            BbsError::MappingInvalid(format!(
                "unknown canonical header '{}'. Expected one of: {}",
                key,
                CanonicalHeader::ALL
                    .iter()
                    .map(|h| h.label())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;
        if !seen.insert(header) {
            return Err(BbsError::MappingInvalid(format!(
                "canonical header '{}' is mapped more than once",
                key
            )));
        }
        mapping.set(header, source);
    }
    Ok(mapping)
}

/// Object entries in document order, keeping repeated keys.
struct MappingEntries(Vec<(String, SourceColumn)>);

impl<'de> Deserialize<'de> for MappingEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = MappingEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object keyed by canonical header")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::new();
                while let Some(entry) = map.next_entry::<String, SourceColumn>()? {
                    entries.push(entry);
                }
                Ok(MappingEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn label(s: &str) -> ColumnKey {
        ColumnKey::Label(s.to_string())
    }

    fn sample_table() -> AssembledTable {
        AssembledTable {
            columns: vec![
                label("Bar Mark"),
                label("Type"),
                label("Size"),
                ColumnKey::Position(4),
            ],
            rows: vec![
                vec!["B1".into(), "T".into(), "12".into(), "x".into()],
                vec!["B2".into(), "H".into(), "16".into(), "".into()],
            ],
        }
    }

    #[test]
    fn test_default_mapping_yields_empty_canonical_table() {
        let out = ColumnMapping::new().apply(&sample_table()).unwrap();
        assert_eq!(out.headers, CanonicalHeader::ALL.to_vec());
        assert_eq!(out.rows.len(), 2);
        for row in &out.rows {
            assert_eq!(row.len(), 14);
            assert!(row.iter().all(String::is_empty));
        }
    }

    #[test]
    fn test_label_and_position_sources() {
        let mut mapping = ColumnMapping::new();
        mapping
            .set(CanonicalHeader::BarMark, SourceColumn::ByLabel("Bar Mark".into()))
            .set(CanonicalHeader::A, SourceColumn::ByPosition(4));
        let out = mapping.apply(&sample_table()).unwrap();
        assert_eq!(out.column(CanonicalHeader::BarMark), vec!["B1", "B2"]);
        assert_eq!(out.column(CanonicalHeader::A), vec!["x", ""]);
        assert_eq!(out.column(CanonicalHeader::Type), vec!["", ""]);
    }

    #[test]
    fn test_source_column_may_be_reused() {
        let mut mapping = ColumnMapping::new();
        mapping
            .set(CanonicalHeader::Size, SourceColumn::ByLabel("Size".into()))
            .set(CanonicalHeader::B, SourceColumn::ByLabel("Size".into()));
        let out = mapping.apply(&sample_table()).unwrap();
        assert_eq!(out.column(CanonicalHeader::Size), out.column(CanonicalHeader::B));
    }

    #[test]
    fn test_unknown_source_column_is_an_error() {
        let mut mapping = ColumnMapping::new();
        mapping.set(CanonicalHeader::Size, SourceColumn::ByPosition(9));
        assert!(matches!(
            mapping.apply(&sample_table()),
            Err(BbsError::UnknownColumn(c)) if c == "#9"
        ));
    }

    #[test]
    fn test_matching_labels() {
        let mapping = ColumnMapping::matching_labels(&sample_table().columns);
        assert_eq!(
            mapping.get(CanonicalHeader::Type),
            &SourceColumn::ByLabel("Type".into())
        );
        assert_eq!(mapping.get(CanonicalHeader::TotalNo), &SourceColumn::Ignore);
    }

    #[test]
    fn test_parse_mapping() {
        let json = r#"{
            "Bar Mark": { "label": "Bar Mark" },
            "Type": "ignore",
            "a": { "position": 4 }
        }"#;
        let mapping = parse_mapping(json).unwrap();
        assert_eq!(
            mapping.get(CanonicalHeader::BarMark),
            &SourceColumn::ByLabel("Bar Mark".into())
        );
        assert_eq!(mapping.get(CanonicalHeader::A), &SourceColumn::ByPosition(4));
        assert_eq!(mapping.get(CanonicalHeader::Size), &SourceColumn::Ignore);
    }

    #[test]
    fn test_unknown_header_rejected() {
        let json = r#"{ "Diameter": { "label": "Size" } }"#;
        assert!(matches!(
            parse_mapping(json),
            Err(BbsError::MappingInvalid(_))
        ));
    }

    #[test]
    fn test_repeated_header_rejected() {
        let json = r#"{
            "Size": { "label": "Size" },
            "Size": { "position": 2 }
        }"#;
        let err = parse_mapping(json).unwrap_err();
        assert!(matches!(&err, BbsError::MappingInvalid(msg) if msg.contains("Size")));
    }

    #[test]
    fn test_to_json_parses_back() {
        let mapping = ColumnMapping::matching_labels(&sample_table().columns);
        let json = mapping.to_json().unwrap();
        assert!(json.contains("\"Total No.\": \"ignore\""));
        assert_eq!(parse_mapping(&json).unwrap(), mapping);
    }
}
