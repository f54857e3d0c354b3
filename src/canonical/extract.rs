//! Extraction schema: the raw per-page records produced by the vision model
//!
//! One `PageExtraction` per page. Records here are untrusted; only the
//! canonicalizer turns them into facts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::{BoundingBox, FactValue, Point};

/// Extracted unit with coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitExtract {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    /// Absent or null values are rejected at canonicalization
    #[serde(default)]
    pub value: Option<FactValue>,
    #[serde(default)]
    pub unit_of_measure: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    pub origin: Point,
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
}

/// Extracted 1:1 mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BijectionExtract {
    pub id: String,
    #[serde(default)]
    pub left_set: Vec<String>,
    #[serde(default)]
    pub right_set: Vec<String>,
    pub mapping: BTreeMap<String, String>,
    pub origin: Point,
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
}

/// Extracted grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCellExtract {
    pub row: u32,
    pub col: u32,
    #[serde(default)]
    pub value: Option<FactValue>,
    #[serde(default)]
    pub origin: Option<Point>,
}

/// Extracted table/grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridExtract {
    pub id: String,
    pub rows: u32,
    pub cols: u32,
    #[serde(default)]
    pub cells: Vec<GridCellExtract>,
    pub origin: Point,
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
}

/// Full extraction for one page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageExtraction {
    #[serde(default)]
    pub units: Vec<UnitExtract>,
    #[serde(default)]
    pub bijections: Vec<BijectionExtract>,
    #[serde(default)]
    pub grids: Vec<GridExtract>,
}

/// Extraction for a whole document; page index is the position in `pages`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentExtraction {
    /// Generated at ingest when absent
    #[serde(default)]
    pub doc_id: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub pages: Vec<PageExtraction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_extraction_defaults() {
        let page: PageExtraction = serde_json::from_str("{}").unwrap();
        assert!(page.units.is_empty());
        assert!(page.bijections.is_empty());
        assert!(page.grids.is_empty());
    }

    #[test]
    fn test_unit_extract_null_value() {
        let json = r#"{"id": "u1", "value": null, "origin": {"x": 0.1, "y": 0.2}}"#;
        let unit: UnitExtract = serde_json::from_str(json).unwrap();
        assert!(unit.value.is_none());
    }

    #[test]
    fn test_document_extraction_parses_pages() {
        let json = r#"{
            "filename": "board.pdf",
            "pages": [
                {"units": [{"id": "v1", "value": 5, "unit_of_measure": "V", "origin": {"x": 0.1, "y": 0.1}}]},
                {"bijections": [{"id": "p", "mapping": {"5": "VCC"}, "origin": {"x": 0.5, "y": 0.3}}]}
            ]
        }"#;
        let doc: DocumentExtraction = serde_json::from_str(json).unwrap();
        assert_eq!(doc.pages.len(), 2);
        assert!(doc.doc_id.is_none());
        assert_eq!(doc.pages[0].units[0].value, Some(FactValue::Number(5.0)));
    }
}
