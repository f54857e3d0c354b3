//! Canonical fact model for akili
//!
//! Only validated, coordinate-grounded facts enter the truth store.
//!
//! # Fact Types
//!
//! - `Unit`: one discrete value (pin label, voltage, capacity, ...)
//! - `Bijection`: strict 1:1 label mapping (pin number <-> pin name)
//! - `Grid`: row/column-indexed table of cells
//!
//! Every fact carries (doc_id, page, origin) and optionally a bounding box.
//! The canonicalizer is the only producer; a Unit without a usable value
//! cannot be constructed through it.

mod canonicalize;
mod errors;
mod extract;
mod types;

pub use canonicalize::{
    canonicalize_bijection, canonicalize_document, canonicalize_grid, canonicalize_page,
    canonicalize_unit, Canonicalized, Rejection,
};
pub use errors::{CanonicalError, CanonicalResult};
pub use extract::{
    BijectionExtract, DocumentExtraction, GridCellExtract, GridExtract, PageExtraction,
    UnitExtract,
};
pub use types::{
    Bijection, BoundingBox, Fact, FactSet, FactValue, Grid, GridCell, Point, SourceType, Unit,
};
