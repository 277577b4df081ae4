//! Positional reader over the first worksheet of a scheme workbook.

use std::io::Cursor;
use std::str::FromStr;

use calamine::{Data, Range, Reader, Xlsx};
use log::debug;
use num_traits::FromPrimitive;
use rust_decimal::Decimal;

use crate::commissions::{CommissionError, FieldKey, RawFieldSet};

use super::cell_ref::CellRef;
use super::layout::SchemeLayout;

/// Reads the cells named by a layout into a [`RawFieldSet`].
///
/// Implementations perform no business logic: every value is returned as read.
pub trait WorkbookExtractorTrait: Send + Sync {
    fn extract(
        &self,
        content: &[u8],
        layout: &SchemeLayout,
    ) -> Result<RawFieldSet, CommissionError>;
}

/// Extractor for `.xlsx` workbooks backed by calamine.
#[derive(Debug, Default, Clone, Copy)]
pub struct CalamineExtractor;

impl CalamineExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl WorkbookExtractorTrait for CalamineExtractor {
    fn extract(
        &self,
        content: &[u8],
        layout: &SchemeLayout,
    ) -> Result<RawFieldSet, CommissionError> {
        let cells = layout.resolve()?;
        let range = first_worksheet(content)?;

        let mut fields = RawFieldSet::new();
        for (key, cell) in cells {
            let value = read_numeric(&range, &key, cell)?;
            fields.insert(key, value);
        }

        debug!(
            "Extracted {} fields using layout {}",
            fields.len(),
            layout.version
        );
        Ok(fields)
    }
}

fn first_worksheet(content: &[u8]) -> Result<Range<Data>, CommissionError> {
    if content.is_empty() {
        return Err(CommissionError::MalformedWorkbook(
            "uploaded file is empty".to_string(),
        ));
    }

    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(content))
        .map_err(|e| CommissionError::MalformedWorkbook(e.to_string()))?;

    match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => Ok(range),
        Some(Err(e)) => Err(CommissionError::MalformedWorkbook(e.to_string())),
        None => Err(CommissionError::MissingWorksheet),
    }
}

fn read_numeric(
    range: &Range<Data>,
    key: &FieldKey,
    cell: CellRef,
) -> Result<Decimal, CommissionError> {
    let non_numeric = |found: String| CommissionError::NonNumericCell {
        field: key.to_string(),
        cell: cell.to_string(),
        found,
    };

    match range.get_value(cell.position()) {
        None | Some(Data::Empty) => Err(non_numeric("empty cell".to_string())),
        Some(Data::Float(f)) => {
            decimal_from_f64(*f).ok_or_else(|| non_numeric(format!("number {}", f)))
        }
        Some(Data::Int(i)) => Ok(Decimal::from(*i)),
        Some(Data::String(s)) if s.trim().is_empty() => {
            Err(non_numeric("empty cell".to_string()))
        }
        Some(Data::String(s)) => {
            parse_numeric_text(s).ok_or_else(|| non_numeric(format!("text '{}'", s)))
        }
        Some(Data::Bool(b)) => Err(non_numeric(format!("boolean {}", b))),
        Some(Data::Error(e)) => Err(non_numeric(format!("cell error {:?}", e))),
        Some(other) => Err(non_numeric(format!("date/time value {:?}", other))),
    }
}

/// Converts through the shortest decimal representation of the float so that
/// `0.015` stays `0.015` rather than its binary expansion.
fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value))
}

fn parse_numeric_text(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commissions::{Channel, Persona, Tier};
    use crate::extraction::layout::REGULAR_LAYOUT_V1;
    use crate::test_support::{regular_workbook, regular_workbook_with, REGULAR_SAMPLE};
    use rust_decimal_macros::dec;

    fn key(persona: Persona, channel: Channel, tier: Tier) -> FieldKey {
        FieldKey::new(persona, channel, tier)
    }

    #[test]
    fn test_extracts_all_twenty_fields_verbatim() {
        let bytes = regular_workbook();
        let fields = CalamineExtractor::new()
            .extract(&bytes, &REGULAR_LAYOUT_V1)
            .unwrap();

        assert_eq!(fields.len(), 20);
        assert_eq!(
            fields.get(&key(Persona::Uddokta, Channel::App, Tier::FeeRate)),
            Some(dec!(0.015))
        );
        assert_eq!(
            fields.get(&key(Persona::Uddokta, Channel::App, Tier::TwltSp)),
            Some(dec!(0.00003))
        );
        assert_eq!(
            fields.get(&key(Persona::Customer, Channel::Ussd, Tier::MasterDistributor)),
            Some(dec!(0.45))
        );
        assert_eq!(
            fields.get(&key(Persona::Customer, Channel::App, Tier::SenderAgent)),
            None
        );
    }

    #[test]
    fn test_numeric_text_is_accepted() {
        let bytes = regular_workbook_with(&[("E4", "0.0150")], &[]);
        let fields = CalamineExtractor::new()
            .extract(&bytes, &REGULAR_LAYOUT_V1)
            .unwrap();
        assert_eq!(
            fields.get(&key(Persona::Uddokta, Channel::App, Tier::FeeRate)),
            Some(dec!(0.0150))
        );
    }

    #[test]
    fn test_missing_cell_is_an_error_not_zero() {
        let bytes = regular_workbook_with(&[], &["BC10"]);
        let err = CalamineExtractor::new()
            .extract(&bytes, &REGULAR_LAYOUT_V1)
            .unwrap_err();
        match err {
            CommissionError::NonNumericCell { field, cell, found } => {
                assert_eq!(field, "Customer.USSD.bpoPp");
                assert_eq!(cell, "BC10");
                assert_eq!(found, "empty cell");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_text_cell_is_rejected() {
        let bytes = regular_workbook_with(&[("AU8", "TBD")], &[]);
        let err = CalamineExtractor::new()
            .extract(&bytes, &REGULAR_LAYOUT_V1)
            .unwrap_err();
        assert!(
            matches!(err, CommissionError::NonNumericCell { ref cell, .. } if cell == "AU8"),
            "{err:?}"
        );
    }

    #[test]
    fn test_garbage_bytes_are_malformed() {
        let err = CalamineExtractor::new()
            .extract(b"definitely not a zip archive", &REGULAR_LAYOUT_V1)
            .unwrap_err();
        assert!(matches!(err, CommissionError::MalformedWorkbook(_)));

        let err = CalamineExtractor::new()
            .extract(&[], &REGULAR_LAYOUT_V1)
            .unwrap_err();
        assert!(matches!(err, CommissionError::MalformedWorkbook(_)));
    }

    #[test]
    fn test_sample_matches_fixture_table() {
        let bytes = regular_workbook();
        let fields = CalamineExtractor::new()
            .extract(&bytes, &REGULAR_LAYOUT_V1)
            .unwrap();
        for (cell, value) in REGULAR_SAMPLE {
            let entry = REGULAR_LAYOUT_V1
                .entries
                .iter()
                .find(|e| e.cell == *cell)
                .unwrap();
            assert_eq!(
                fields.get(&entry.key),
                Some(decimal_from_f64(*value).unwrap()),
                "{cell}"
            );
        }
    }

    #[test]
    fn test_decimal_from_f64_keeps_short_representation() {
        assert_eq!(decimal_from_f64(0.015), Some(dec!(0.015)));
        assert_eq!(decimal_from_f64(0.00003), Some(dec!(0.00003)));
        assert_eq!(decimal_from_f64(f64::NAN), None);
    }
}
