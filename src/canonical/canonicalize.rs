//! Canonicalizer: extraction records -> canonical facts
//!
//! Every record is validated on its own. A record that fails is rejected and
//! reported; the rest of the page is kept. Nothing is coerced or repaired.
//!
//! Rejected:
//! - blank ids
//! - missing/blank values, non-finite numbers
//! - non-finite coordinates (origin, bbox, cell origin)
//! - bijections that are not 1:1, or whose mapping leaves the declared sets
//! - grids with out-of-range or duplicate cells

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use super::errors::{CanonicalError, CanonicalResult};
use super::extract::{
    BijectionExtract, DocumentExtraction, GridExtract, PageExtraction, UnitExtract,
};
use super::types::{Bijection, BoundingBox, FactSet, FactValue, Grid, GridCell, Point, SourceType, Unit};

/// One record kept out of the store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection {
    pub page: u32,
    pub source_type: SourceType,
    /// Extracted id, possibly blank
    pub id: String,
    pub code: &'static str,
    pub reason: String,
}

impl Rejection {
    fn new(page: u32, source_type: SourceType, id: &str, err: CanonicalError) -> Self {
        Self {
            page,
            source_type,
            id: id.to_string(),
            code: err.code(),
            reason: err.to_string(),
        }
    }
}

/// Output of canonicalizing one page or document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Canonicalized {
    pub facts: FactSet,
    pub rejected: Vec<Rejection>,
}

fn check_id(id: &str) -> CanonicalResult<()> {
    if id.trim().is_empty() {
        return Err(CanonicalError::MissingId);
    }
    Ok(())
}

fn check_point(point: &Point, what: &'static str) -> CanonicalResult<()> {
    if !point.is_finite() {
        return Err(CanonicalError::InvalidCoordinate(what));
    }
    Ok(())
}

fn check_bbox(bbox: &Option<BoundingBox>) -> CanonicalResult<()> {
    match bbox {
        Some(b) if !b.is_finite() => Err(CanonicalError::InvalidCoordinate("bbox")),
        _ => Ok(()),
    }
}

fn usable_value(value: &Option<FactValue>) -> Option<FactValue> {
    value.as_ref().filter(|v| v.is_usable()).cloned()
}

fn blank_to_none(s: &Option<String>) -> Option<String> {
    s.as_ref()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validates one extracted unit
pub fn canonicalize_unit(e: &UnitExtract, doc_id: &str, page: u32) -> CanonicalResult<Unit> {
    check_id(&e.id)?;
    let value = usable_value(&e.value).ok_or(CanonicalError::MissingValue)?;
    check_point(&e.origin, "origin")?;
    check_bbox(&e.bbox)?;

    Ok(Unit {
        id: e.id.clone(),
        label: blank_to_none(&e.label),
        value,
        unit_of_measure: blank_to_none(&e.unit_of_measure),
        context: blank_to_none(&e.context),
        origin: e.origin,
        bbox: e.bbox,
        doc_id: doc_id.to_string(),
        page,
    })
}

/// Validates one extracted bijection.
///
/// Declared sets are optional; when present, every mapping entry must be a member.
pub fn canonicalize_bijection(
    e: &BijectionExtract,
    doc_id: &str,
    page: u32,
) -> CanonicalResult<Bijection> {
    check_id(&e.id)?;
    check_point(&e.origin, "origin")?;
    check_bbox(&e.bbox)?;

    let mut seen = HashSet::new();
    for value in e.mapping.values() {
        if !seen.insert(value.as_str()) {
            return Err(CanonicalError::NotBijective(value.clone()));
        }
    }

    if !e.left_set.is_empty() {
        let left: BTreeSet<&str> = e.left_set.iter().map(String::as_str).collect();
        if let Some(k) = e.mapping.keys().find(|k| !left.contains(k.as_str())) {
            return Err(CanonicalError::UndeclaredMember(k.clone(), "left_set"));
        }
    }
    if !e.right_set.is_empty() {
        let right: BTreeSet<&str> = e.right_set.iter().map(String::as_str).collect();
        if let Some(v) = e.mapping.values().find(|v| !right.contains(v.as_str())) {
            return Err(CanonicalError::UndeclaredMember(v.clone(), "right_set"));
        }
    }

    let left_set = if e.left_set.is_empty() {
        e.mapping.keys().cloned().collect()
    } else {
        e.left_set.clone()
    };
    let right_set = if e.right_set.is_empty() {
        e.mapping.values().cloned().collect()
    } else {
        e.right_set.clone()
    };

    Ok(Bijection {
        id: e.id.clone(),
        left_set,
        right_set,
        mapping: e.mapping.clone(),
        origin: e.origin,
        bbox: e.bbox,
        doc_id: doc_id.to_string(),
        page,
    })
}

/// Validates one extracted grid. A single bad cell rejects the whole grid.
pub fn canonicalize_grid(e: &GridExtract, doc_id: &str, page: u32) -> CanonicalResult<Grid> {
    check_id(&e.id)?;
    check_point(&e.origin, "origin")?;
    check_bbox(&e.bbox)?;

    let mut seen = HashSet::new();
    let mut cells = Vec::with_capacity(e.cells.len());
    for c in &e.cells {
        if c.row >= e.rows || c.col >= e.cols {
            return Err(CanonicalError::CellOutOfRange {
                row: c.row,
                col: c.col,
                rows: e.rows,
                cols: e.cols,
            });
        }
        if !seen.insert((c.row, c.col)) {
            return Err(CanonicalError::DuplicateCell { row: c.row, col: c.col });
        }
        let value = usable_value(&c.value)
            .ok_or(CanonicalError::InvalidCell { row: c.row, col: c.col })?;
        if let Some(origin) = &c.origin {
            check_point(origin, "cell origin")?;
        }
        cells.push(GridCell {
            row: c.row,
            col: c.col,
            value,
            origin: c.origin,
        });
    }

    Ok(Grid {
        id: e.id.clone(),
        rows: e.rows,
        cols: e.cols,
        cells,
        origin: e.origin,
        bbox: e.bbox,
        doc_id: doc_id.to_string(),
        page,
    })
}

/// Converts one page's extraction into canonical facts
pub fn canonicalize_page(extraction: &PageExtraction, doc_id: &str, page: u32) -> Canonicalized {
    let mut out = Canonicalized::default();

    for e in &extraction.units {
        match canonicalize_unit(e, doc_id, page) {
            Ok(u) => out.facts.units.push(u),
            Err(err) => out
                .rejected
                .push(Rejection::new(page, SourceType::Unit, &e.id, err)),
        }
    }
    for e in &extraction.bijections {
        match canonicalize_bijection(e, doc_id, page) {
            Ok(b) => out.facts.bijections.push(b),
            Err(err) => out
                .rejected
                .push(Rejection::new(page, SourceType::Bijection, &e.id, err)),
        }
    }
    for e in &extraction.grids {
        match canonicalize_grid(e, doc_id, page) {
            Ok(g) => out.facts.grids.push(g),
            Err(err) => out
                .rejected
                .push(Rejection::new(page, SourceType::Grid, &e.id, err)),
        }
    }

    out
}

/// Page number for a 0-based page position
fn page_number(index: usize) -> CanonicalResult<u32> {
    u32::try_from(index).map_err(|_| CanonicalError::TooManyPages(index))
}

/// Converts every page of a document; pages are numbered by position (0-based).
///
/// Fails as a whole only when a page position has no `u32` page number.
pub fn canonicalize_document(extraction: &DocumentExtraction, doc_id: &str) -> CanonicalResult<Canonicalized> {
    let mut out = Canonicalized::default();
    for (index, page) in extraction.pages.iter().enumerate() {
        let page_out = canonicalize_page(page, doc_id, page_number(index)?);
        out.facts.extend(page_out.facts);
        out.rejected.extend(page_out.rejected);
    }
    Ok(out)
}
