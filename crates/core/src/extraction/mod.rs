//! Extraction module - fixed-coordinate reads from scheme workbooks.

mod cell_ref;
mod extractor;
mod layout;

pub use cell_ref::CellRef;
pub use extractor::{CalamineExtractor, WorkbookExtractorTrait};
pub use layout::{LayoutEntry, SchemeLayout, REGULAR_LAYOUT_V1};
