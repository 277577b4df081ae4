//! Property-based integration tests for the commission formula engine.
//!
//! Random schemes are generated on the fixed-point grid used by real
//! workbooks and pushed through the public engine API.

use proptest::prelude::*;
use rust_decimal::Decimal;

use feecalc_core::commissions::{
    compute_breakdown, format_fixed, CommissionError, FormattedBreakdown, RawFieldSet, Tier,
};
use feecalc_core::constants::RECONCILIATION_TOLERANCE;
use feecalc_core::extraction::REGULAR_LAYOUT_V1;

// =============================================================================
// Generators
// =============================================================================

/// Four fee rates in (0, 5%] and sixteen shares of at most 20% each, so every
/// variant's shares stay within the fee.
fn arb_scheme() -> impl Strategy<Value = RawFieldSet> {
    (
        prop::array::uniform4(1i64..=50_000),
        prop::array::uniform16(0i64..=200_000_000),
    )
        .prop_map(|(fees, shares)| build_fields(&fees, &shares, 6, 9))
}

fn build_fields(fees: &[i64], shares: &[i64], fee_scale: u32, share_scale: u32) -> RawFieldSet {
    let mut fees = fees.iter();
    let mut shares = shares.iter();
    let mut fields = RawFieldSet::new();
    for entry in REGULAR_LAYOUT_V1.entries {
        let value = if entry.key.tier == Tier::FeeRate {
            Decimal::new(*fees.next().unwrap_or(&0), fee_scale)
        } else {
            Decimal::new(*shares.next().unwrap_or(&0), share_scale)
        };
        fields.insert(entry.key, value);
    }
    fields
}

fn decimals(rendered: &str) -> usize {
    rendered.split_once('.').map_or(0, |(_, frac)| frac.len())
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every variant's shares, adjustment included, add up to 100% of the fee.
    #[test]
    fn prop_every_variant_reconciles(fields in arb_scheme()) {
        let breakdown = compute_breakdown(&fields).unwrap();
        for (persona, channel, variant) in breakdown.variants() {
            let drift = (variant.commissions.total() - Decimal::ONE_HUNDRED).abs();
            prop_assert!(
                drift <= RECONCILIATION_TOLERANCE,
                "{} {} drifted by {}",
                persona,
                channel,
                drift
            );
        }
    }

    /// The adjustment is the residual of the extracted shares and never negative
    /// for a scheme that fits within its fee.
    #[test]
    fn prop_adjustment_is_the_residual(fields in arb_scheme()) {
        let breakdown = compute_breakdown(&fields).unwrap();
        for (_, _, variant) in breakdown.variants() {
            let shares = &variant.commissions;
            prop_assert_eq!(shares.adjustment, Decimal::ONE_HUNDRED - shares.itemized_total());
            prop_assert!(shares.adjustment >= Decimal::ZERO);
        }
    }

    /// Presentation precision does not depend on input precision.
    #[test]
    fn prop_formatting_precision_is_fixed(fields in arb_scheme()) {
        let breakdown = compute_breakdown(&fields).unwrap();
        let formatted = FormattedBreakdown::from(&breakdown);
        for persona in [&formatted.uddokta, &formatted.customer] {
            for variant in [&persona.app, &persona.ussd] {
                let c = &variant.commissions;
                prop_assert_eq!(decimals(&variant.fee_rate), 2);
                prop_assert_eq!(decimals(&c.twlt_sp), 5);
                prop_assert_eq!(decimals(&c.bpo_pp), 5);
                prop_assert_eq!(decimals(&c.master_distributor), 9);
                prop_assert_eq!(decimals(&c.adjustment), 9);
                for agent in [&c.sender_agent, &c.parent_distributor].into_iter().flatten() {
                    prop_assert_eq!(decimals(agent), 9);
                }
            }
        }
    }

    /// A zero fee with any non-zero share cannot reconcile.
    #[test]
    fn prop_zero_fee_with_shares_is_rejected(
        shares in prop::array::uniform16(0i64..=200_000_000),
        pick in 0usize..16,
    ) {
        let mut shares = shares;
        shares[pick] = shares[pick].max(1_000_000);
        let fields = build_fields(&[0, 0, 0, 0], &shares, 6, 9);
        let is_inconsistent = matches!(
            compute_breakdown(&fields),
            Err(CommissionError::InconsistentTotals { .. })
        );
        prop_assert!(is_inconsistent);
    }

    /// Any negative extracted value fails loudly instead of skewing the adjustment.
    #[test]
    fn prop_negative_values_are_rejected(
        fees in prop::array::uniform4(1i64..=50_000),
        shares in prop::array::uniform16(0i64..=200_000_000),
        pick in 0usize..16,
    ) {
        let mut shares = shares;
        shares[pick] = -shares[pick].max(1);
        let fields = build_fields(&fees, &shares, 6, 9);
        let is_negative = matches!(
            compute_breakdown(&fields),
            Err(CommissionError::NegativeValue { .. })
        );
        prop_assert!(is_negative);
    }

    /// `format_fixed` always renders exactly the requested number of places.
    #[test]
    fn prop_format_fixed_renders_requested_places(
        mantissa in -10_000_000_000i64..10_000_000_000,
        scale in 0u32..=12,
        dp in 1u32..=9,
    ) {
        let rendered = format_fixed(Decimal::new(mantissa, scale), dp);
        prop_assert_eq!(decimals(&rendered), dp as usize);
    }
}
