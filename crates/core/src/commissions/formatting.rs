//! Presentation view of a calculation with fixed per-tier precision.

use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::commissions_model::{
    CalculationRecord, ChannelBreakdown, CommissionBreakdown, CommissionShares, PersonaBreakdown,
    SchemeType,
};
use crate::constants::{
    COMMISSION_SHARE_DECIMAL_PLACES, FEE_RATE_DECIMAL_PLACES, PLATFORM_SHARE_DECIMAL_PLACES,
};

/// Rounds half away from zero and renders exactly `dp` decimal places.
pub fn format_fixed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, rounded)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedCommissions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_distributor: Option<String>,
    pub master_distributor: String,
    pub twlt_sp: String,
    pub bpo_pp: String,
    pub adjustment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedChannel {
    pub fee_rate: String,
    pub commissions: FormattedCommissions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedPersona {
    #[serde(rename = "APP")]
    pub app: FormattedChannel,
    #[serde(rename = "USSD")]
    pub ussd: FormattedChannel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedBreakdown {
    #[serde(rename = "Uddokta")]
    pub uddokta: FormattedPersona,
    #[serde(rename = "Customer")]
    pub customer: FormattedPersona,
}

/// What callers display after a submission or a history lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedCalculation {
    pub id: String,
    pub biller_name: String,
    pub file_name: String,
    pub scheme_type: SchemeType,
    pub layout_version: String,
    pub submitted_by: String,
    pub created_at: NaiveDateTime,
    pub breakdown: FormattedBreakdown,
}

impl From<&CommissionShares> for FormattedCommissions {
    fn from(shares: &CommissionShares) -> Self {
        let commission = |v: Decimal| format_fixed(v, COMMISSION_SHARE_DECIMAL_PLACES);
        let platform = |v: Decimal| format_fixed(v, PLATFORM_SHARE_DECIMAL_PLACES);
        Self {
            sender_agent: shares.sender_agent.map(commission),
            parent_distributor: shares.parent_distributor.map(commission),
            master_distributor: commission(shares.master_distributor),
            twlt_sp: platform(shares.twlt_sp),
            bpo_pp: platform(shares.bpo_pp),
            adjustment: commission(shares.adjustment),
        }
    }
}

impl From<&ChannelBreakdown> for FormattedChannel {
    fn from(channel: &ChannelBreakdown) -> Self {
        Self {
            fee_rate: format_fixed(channel.fee_rate, FEE_RATE_DECIMAL_PLACES),
            commissions: FormattedCommissions::from(&channel.commissions),
        }
    }
}

impl From<&PersonaBreakdown> for FormattedPersona {
    fn from(persona: &PersonaBreakdown) -> Self {
        Self {
            app: FormattedChannel::from(&persona.app),
            ussd: FormattedChannel::from(&persona.ussd),
        }
    }
}

impl From<&CommissionBreakdown> for FormattedBreakdown {
    fn from(breakdown: &CommissionBreakdown) -> Self {
        Self {
            uddokta: FormattedPersona::from(&breakdown.uddokta),
            customer: FormattedPersona::from(&breakdown.customer),
        }
    }
}

impl CalculationRecord {
    /// Same presentation shape whether the record was just computed or loaded.
    pub fn formatted(&self) -> FormattedCalculation {
        FormattedCalculation {
            id: self.id.clone(),
            biller_name: self.biller_name.clone(),
            file_name: self.file_name.clone(),
            scheme_type: self.scheme_type,
            layout_version: self.layout_version.clone(),
            submitted_by: self.submitted_by.clone(),
            created_at: self.created_at,
            breakdown: FormattedBreakdown::from(&self.breakdown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commissions::formula::compute_breakdown;
    use crate::test_support::{fields_with, sample_fields};
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_fixed_rounds_half_away_from_zero() {
        assert_eq!(format_fixed(dec!(1.5), 2), "1.50");
        assert_eq!(format_fixed(dec!(1.005), 2), "1.01");
        assert_eq!(format_fixed(dec!(0.000025), 5), "0.00003");
        assert_eq!(format_fixed(dec!(30), 9), "30.000000000");
        assert_eq!(format_fixed(dec!(0), 5), "0.00000");
        assert_eq!(format_fixed(dec!(-0.0000000005), 9), "-0.000000001");
    }

    #[test]
    fn test_uddokta_app_presentation() {
        let breakdown = compute_breakdown(&sample_fields()).unwrap();
        let formatted = FormattedBreakdown::from(&breakdown);
        let app = &formatted.uddokta.app;

        assert_eq!(app.fee_rate, "1.50");
        assert_eq!(app.commissions.sender_agent.as_deref(), Some("30.000000000"));
        assert_eq!(app.commissions.parent_distributor.as_deref(), Some("30.000000000"));
        assert_eq!(app.commissions.master_distributor, "30.000000000");
        assert_eq!(app.commissions.twlt_sp, "0.00300");
        assert_eq!(app.commissions.bpo_pp, "0.00200");
        assert_eq!(app.commissions.adjustment, "9.995000000");
    }

    #[test]
    fn test_rounding_happens_only_for_display() {
        let fields = fields_with(&[("E6", "0.017549"), ("W6", "0.3333333333333")]);
        let breakdown = compute_breakdown(&fields).unwrap();
        let ussd = &breakdown.uddokta.ussd;
        assert_eq!(ussd.fee_rate, dec!(1.7549));

        let formatted = FormattedChannel::from(ussd);
        assert_eq!(formatted.fee_rate, "1.75");
        assert_eq!(
            formatted.commissions.sender_agent.as_deref(),
            Some("33.333333333")
        );
    }

    #[test]
    fn test_customer_json_omits_agent_tiers() {
        let breakdown = compute_breakdown(&sample_fields()).unwrap();
        let json = serde_json::to_value(FormattedBreakdown::from(&breakdown)).unwrap();

        let customer_app = &json["Customer"]["APP"]["commissions"];
        assert!(customer_app.get("senderAgent").is_none());
        assert!(customer_app.get("parentDistributor").is_none());
        assert_eq!(customer_app["masterDistributor"], "40.000000000");
        assert_eq!(json["Uddokta"]["USSD"]["feeRate"], "1.75");
    }
}
