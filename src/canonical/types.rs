//! Canonical fact types
//!
//! Every fact carries provenance: (doc_id, page, origin, optional bbox).
//! Facts are created once by the canonicalizer and never mutated.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized document-relative coordinate (0-1 expected, top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True if both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Normalized bounding box: (x1, y1) one corner, (x2, y2) the opposite corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn is_finite(&self) -> bool {
        self.x1.is_finite() && self.y1.is_finite() && self.x2.is_finite() && self.y2.is_finite()
    }
}

/// Scalar fact value: numeric or string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Number(f64),
    Text(String),
}

impl FactValue {
    /// Numeric view of the value.
    ///
    /// Text values that parse as a plain finite number (e.g. "3.3") count as numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FactValue::Number(n) => Some(*n),
            FactValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FactValue::Text(s) => Some(s),
            FactValue::Number(_) => None,
        }
    }

    /// A value is usable if it is a finite number or non-blank text
    pub fn is_usable(&self) -> bool {
        match self {
            FactValue::Number(n) => n.is_finite(),
            FactValue::Text(s) => !s.trim().is_empty(),
        }
    }
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactValue::Number(n) => write!(f, "{}", n),
            FactValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for FactValue {
    fn from(n: f64) -> Self {
        FactValue::Number(n)
    }
}

impl From<&str> for FactValue {
    fn from(s: &str) -> Self {
        FactValue::Text(s.to_string())
    }
}

impl From<String> for FactValue {
    fn from(s: String) -> Self {
        FactValue::Text(s)
    }
}

/// Which canonical type a fact (or proof point) comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Unit,
    Bijection,
    Grid,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Unit => "unit",
            SourceType::Bijection => "bijection",
            SourceType::Grid => "grid",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Single measurable or named entity (pin label, voltage value, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique within a page
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    pub value: FactValue,
    #[serde(default)]
    pub unit_of_measure: Option<String>,
    /// What the value refers to (e.g. "charge voltage")
    #[serde(default)]
    pub context: Option<String>,
    pub origin: Point,
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
    pub doc_id: String,
    pub page: u32,
}

impl Unit {
    /// Creates a unit with no label, unit of measure, context or bbox
    pub fn new(
        id: impl Into<String>,
        value: impl Into<FactValue>,
        origin: Point,
        doc_id: impl Into<String>,
        page: u32,
    ) -> Self {
        Self {
            id: id.into(),
            label: None,
            value: value.into(),
            unit_of_measure: None,
            context: None,
            origin,
            bbox: None,
            doc_id: doc_id.into(),
            page,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_unit_of_measure(mut self, uom: impl Into<String>) -> Self {
        self.unit_of_measure = Some(uom.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Value followed by its unit of measure, e.g. "5 V"
    pub fn display_value(&self) -> String {
        match self.unit_of_measure.as_deref().map(str::trim) {
            Some(uom) if !uom.is_empty() => format!("{} {}", self.value, uom),
            _ => self.value.to_string(),
        }
    }
}

/// Strict 1:1 mapping between two label sets (e.g. pin number <-> pin name)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bijection {
    pub id: String,
    #[serde(default)]
    pub left_set: Vec<String>,
    #[serde(default)]
    pub right_set: Vec<String>,
    /// left -> right
    pub mapping: BTreeMap<String, String>,
    pub origin: Point,
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
    pub doc_id: String,
    pub page: u32,
}

impl Bijection {
    /// Builds a bijection whose left/right sets are taken from the mapping
    pub fn from_pairs<K, V>(
        id: impl Into<String>,
        pairs: impl IntoIterator<Item = (K, V)>,
        origin: Point,
        doc_id: impl Into<String>,
        page: u32,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mapping: BTreeMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            id: id.into(),
            left_set: mapping.keys().cloned().collect(),
            right_set: mapping.values().cloned().collect(),
            mapping,
            origin,
            bbox: None,
            doc_id: doc_id.into(),
            page,
        }
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Right side for a left key
    pub fn get_right(&self, left: &str) -> Option<&str> {
        self.mapping.get(left).map(String::as_str)
    }

    /// Left side for a right value
    pub fn get_left(&self, right: &str) -> Option<&str> {
        self.mapping
            .iter()
            .find(|(_, v)| v.as_str() == right)
            .map(|(k, _)| k.as_str())
    }
}

/// Single cell of a grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub row: u32,
    pub col: u32,
    pub value: FactValue,
    #[serde(default)]
    pub origin: Option<Point>,
}

impl GridCell {
    pub fn new(row: u32, col: u32, value: impl Into<FactValue>) -> Self {
        Self {
            row,
            col,
            value: value.into(),
            origin: None,
        }
    }

    pub fn at(mut self, origin: Point) -> Self {
        self.origin = Some(origin);
        self
    }
}

/// Tabular region: rows x cols with cell-level values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub id: String,
    pub rows: u32,
    pub cols: u32,
    pub cells: Vec<GridCell>,
    pub origin: Point,
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
    pub doc_id: String,
    pub page: u32,
}

impl Grid {
    pub fn new(
        id: impl Into<String>,
        rows: u32,
        cols: u32,
        cells: Vec<GridCell>,
        origin: Point,
        doc_id: impl Into<String>,
        page: u32,
    ) -> Self {
        Self {
            id: id.into(),
            rows,
            cols,
            cells,
            origin,
            bbox: None,
            doc_id: doc_id.into(),
            page,
        }
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// True if (row, col) lies within [0, rows) x [0, cols)
    pub fn in_range(&self, row: u32, col: u32) -> bool {
        row < self.rows && col < self.cols
    }

    /// Cell at (row, col). Out of range is simply not found.
    pub fn cell(&self, row: u32, col: u32) -> Option<&GridCell> {
        if !self.in_range(row, col) {
            return None;
        }
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }

    /// In-range cells in row-major order
    pub fn cells_row_major(&self) -> Vec<&GridCell> {
        let mut cells: Vec<&GridCell> = self
            .cells
            .iter()
            .filter(|c| self.in_range(c.row, c.col))
            .collect();
        cells.sort_by_key(|c| (c.row, c.col));
        cells
    }
}

/// A canonical fact: exactly one of the three typed records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Fact {
    Unit(Unit),
    Bijection(Bijection),
    Grid(Grid),
}

impl Fact {
    pub fn id(&self) -> &str {
        match self {
            Fact::Unit(u) => &u.id,
            Fact::Bijection(b) => &b.id,
            Fact::Grid(g) => &g.id,
        }
    }

    pub fn doc_id(&self) -> &str {
        match self {
            Fact::Unit(u) => &u.doc_id,
            Fact::Bijection(b) => &b.doc_id,
            Fact::Grid(g) => &g.doc_id,
        }
    }

    pub fn page(&self) -> u32 {
        match self {
            Fact::Unit(u) => u.page,
            Fact::Bijection(b) => b.page,
            Fact::Grid(g) => g.page,
        }
    }

    pub fn source_type(&self) -> SourceType {
        match self {
            Fact::Unit(_) => SourceType::Unit,
            Fact::Bijection(_) => SourceType::Bijection,
            Fact::Grid(_) => SourceType::Grid,
        }
    }
}

/// All canonical facts of one document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactSet {
    #[serde(default)]
    pub units: Vec<Unit>,
    #[serde(default)]
    pub bijections: Vec<Bijection>,
    #[serde(default)]
    pub grids: Vec<Grid>,
}

impl FactSet {
    pub fn new(units: Vec<Unit>, bijections: Vec<Bijection>, grids: Vec<Grid>) -> Self {
        Self {
            units,
            bijections,
            grids,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty() && self.bijections.is_empty() && self.grids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.units.len() + self.bijections.len() + self.grids.len()
    }

    /// True if any fact in the set has this id
    pub fn contains_id(&self, id: &str) -> bool {
        self.units.iter().any(|u| u.id == id)
            || self.bijections.iter().any(|b| b.id == id)
            || self.grids.iter().any(|g| g.id == id)
    }

    /// Adds a fact to the matching sequence
    pub fn push(&mut self, fact: Fact) {
        match fact {
            Fact::Unit(u) => self.units.push(u),
            Fact::Bijection(b) => self.bijections.push(b),
            Fact::Grid(g) => self.grids.push(g),
        }
    }

    /// Appends all facts of another set, preserving order
    pub fn extend(&mut self, other: FactSet) {
        self.units.extend(other.units);
        self.bijections.extend(other.bijections);
        self.grids.extend(other.grids);
    }

    /// Orders each sequence by page; stable, so extraction order is kept within a page
    pub fn sort_by_page(&mut self) {
        self.units.sort_by_key(|u| u.page);
        self.bijections.sort_by_key(|b| b.page);
        self.grids.sort_by_key(|g| g.page);
    }

    /// Flat view: units, then bijections, then grids
    pub fn facts(&self) -> Vec<Fact> {
        self.units
            .iter()
            .cloned()
            .map(Fact::Unit)
            .chain(self.bijections.iter().cloned().map(Fact::Bijection))
            .chain(self.grids.iter().cloned().map(Fact::Grid))
            .collect()
    }
}
