//! Versioned coordinate tables for scheme workbooks.
//!
//! A layout change in the upstream template is a data edit here: add a new
//! table with a new version string and point [`SchemeLayout::for_scheme`] at it.

use crate::commissions::{Channel, CommissionError, FieldKey, Persona, SchemeType, Tier};

use super::cell_ref::CellRef;

/// One semantic field and the cell it is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEntry {
    pub key: FieldKey,
    pub cell: &'static str,
}

const fn entry(persona: Persona, channel: Channel, tier: Tier, cell: &'static str) -> LayoutEntry {
    LayoutEntry {
        key: FieldKey::new(persona, channel, tier),
        cell,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemeLayout {
    pub version: &'static str,
    pub entries: &'static [LayoutEntry],
}

use Channel::{App, Ussd};
use Persona::{Customer, Uddokta};
use Tier::{BpoPp, FeeRate, MasterDistributor, ParentDistributor, SenderAgent, TwltSp};

/// Layout of the "Regular" fee-commission template.
pub const REGULAR_LAYOUT_V1: SchemeLayout = SchemeLayout {
    version: "regular-v1",
    entries: &[
        entry(Uddokta, App, FeeRate, "E4"),
        entry(Uddokta, Ussd, FeeRate, "E6"),
        entry(Customer, App, FeeRate, "E8"),
        entry(Customer, Ussd, FeeRate, "E10"),
        entry(Uddokta, App, SenderAgent, "W4"),
        entry(Uddokta, Ussd, SenderAgent, "W6"),
        entry(Uddokta, App, ParentDistributor, "AE4"),
        entry(Uddokta, Ussd, ParentDistributor, "AE6"),
        entry(Uddokta, App, MasterDistributor, "AU4"),
        entry(Uddokta, Ussd, MasterDistributor, "AU6"),
        entry(Customer, App, MasterDistributor, "AU8"),
        entry(Customer, Ussd, MasterDistributor, "AU10"),
        entry(Uddokta, App, TwltSp, "BA4"),
        entry(Uddokta, Ussd, TwltSp, "BA6"),
        entry(Customer, App, TwltSp, "BA8"),
        entry(Customer, Ussd, TwltSp, "BA10"),
        entry(Uddokta, App, BpoPp, "BC4"),
        entry(Uddokta, Ussd, BpoPp, "BC6"),
        entry(Customer, App, BpoPp, "BC8"),
        entry(Customer, Ussd, BpoPp, "BC10"),
    ],
};

impl SchemeLayout {
    /// Layout used to read a scheme type, or `None` when the type has no template yet.
    pub fn for_scheme(scheme_type: SchemeType) -> Option<&'static SchemeLayout> {
        match scheme_type {
            SchemeType::Regular => Some(&REGULAR_LAYOUT_V1),
            SchemeType::DropPoint | SchemeType::EmiBiller => None,
        }
    }

    /// Parses every coordinate of the table.
    pub fn resolve(&self) -> Result<Vec<(FieldKey, CellRef)>, CommissionError> {
        self.entries
            .iter()
            .map(|e| CellRef::parse(e.cell).map(|cell| (e.key, cell)))
            .collect()
    }

    pub fn cell_for(&self, key: &FieldKey) -> Option<&'static str> {
        self.entries.iter().find(|e| &e.key == key).map(|e| e.cell)
    }
}
