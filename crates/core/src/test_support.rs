//! Workbook fixtures shared by unit tests.

use std::io::Cursor;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::commissions::RawFieldSet;
use crate::extraction::REGULAR_LAYOUT_V1;

/// A "Regular" scheme whose figures reconcile on every channel.
pub(crate) const REGULAR_SAMPLE: &[(&str, f64)] = &[
    ("E4", 0.015),
    ("E6", 0.0175),
    ("E8", 0.01),
    ("E10", 0.012),
    ("W4", 0.3),
    ("W6", 0.35),
    ("AE4", 0.3),
    ("AE6", 0.25),
    ("AU4", 0.3),
    ("AU6", 0.2),
    ("AU8", 0.4),
    ("AU10", 0.45),
    ("BA4", 0.00003),
    ("BA6", 0.00005),
    ("BA8", 0.00005),
    ("BA10", 0.00006),
    ("BC4", 0.00002),
    ("BC6", 0.00004),
    ("BC8", 0.00001),
    ("BC10", 0.00003),
];

pub(crate) fn regular_workbook() -> Vec<u8> {
    build_workbook(&[], &[], &[])
}

pub(crate) fn regular_workbook_with(text: &[(&str, &str)], omit: &[&str]) -> Vec<u8> {
    build_workbook(&[], text, omit)
}

/// Writes the sample scheme to xlsx bytes. `numbers` and `text` replace sample
/// cells, `omit` leaves cells blank.
pub(crate) fn build_workbook(
    numbers: &[(&str, f64)],
    text: &[(&str, &str)],
    omit: &[&str],
) -> Vec<u8> {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book
        .get_sheet_by_name_mut("Sheet1")
        .expect("default sheet");

    sheet.get_cell_mut("A4").set_value_string("Uddokta / APP");
    sheet.get_cell_mut("A6").set_value_string("Uddokta / USSD");
    sheet.get_cell_mut("A8").set_value_string("Customer / APP");
    sheet.get_cell_mut("A10").set_value_string("Customer / USSD");

    for (cell, value) in REGULAR_SAMPLE {
        let overridden = numbers.iter().any(|(c, _)| c == cell)
            || text.iter().any(|(c, _)| c == cell)
            || omit.contains(cell);
        if !overridden {
            sheet.get_cell_mut(*cell).set_value_number(*value);
        }
    }
    for (cell, value) in numbers {
        sheet.get_cell_mut(*cell).set_value_number(*value);
    }
    for (cell, value) in text {
        sheet.get_cell_mut(*cell).set_value_string(*value);
    }

    let mut cursor = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut cursor).expect("write workbook");
    cursor.into_inner()
}

/// The sample scheme as it comes out of the extractor, without touching xlsx.
pub(crate) fn sample_fields() -> RawFieldSet {
    fields_with(&[])
}

pub(crate) fn fields_with(overrides: &[(&str, &str)]) -> RawFieldSet {
    let mut fields = RawFieldSet::new();
    for entry in REGULAR_LAYOUT_V1.entries {
        let value = overrides
            .iter()
            .find(|(cell, _)| *cell == entry.cell)
            .map(|(_, v)| v.to_string())
            .or_else(|| {
                REGULAR_SAMPLE
                    .iter()
                    .find(|(cell, _)| *cell == entry.cell)
                    .map(|(_, v)| v.to_string())
            })
            .expect("sample covers every layout cell");
        fields.insert(entry.key, Decimal::from_str(&value).expect("decimal literal"));
    }
    fields
}
