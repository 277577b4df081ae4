//! CSV re-export of a stored calculation.

use csv::WriterBuilder;
use serde::Serialize;

use super::commissions_model::CalculationRecord;
use super::formatting::{FormattedChannel, FormattedPersona};
use crate::errors::Error;
use crate::Result;

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    persona: &'a str,
    channel: &'a str,
    component: &'a str,
    value: &'a str,
}

/// Renders the formatted breakdown as `persona,channel,component,value` rows.
pub fn export_csv(record: &CalculationRecord) -> Result<String> {
    let formatted = record.formatted();
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(Vec::new());

    let personas: [(&str, &FormattedPersona); 2] = [
        ("Uddokta", &formatted.breakdown.uddokta),
        ("Customer", &formatted.breakdown.customer),
    ];
    for (persona, breakdown) in personas {
        for (channel, variant) in [("APP", &breakdown.app), ("USSD", &breakdown.ussd)] {
            for (component, value) in components(variant) {
                writer.serialize(ExportRow {
                    persona,
                    channel,
                    component,
                    value,
                })?;
            }
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Serialization(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::Serialization(e.to_string()))
}

fn components(variant: &FormattedChannel) -> Vec<(&'static str, &str)> {
    let shares = &variant.commissions;
    let mut rows = vec![("feeRate", variant.fee_rate.as_str())];
    if let Some(v) = shares.sender_agent.as_deref() {
        rows.push(("senderAgent", v));
    }
    if let Some(v) = shares.parent_distributor.as_deref() {
        rows.push(("parentDistributor", v));
    }
    rows.push(("masterDistributor", shares.master_distributor.as_str()));
    rows.push(("twltSp", shares.twlt_sp.as_str()));
    rows.push(("bpoPp", shares.bpo_pp.as_str()));
    rows.push(("adjustment", shares.adjustment.as_str()));
    rows
}
