//! Commission formula engine.
//!
//! Every persona/channel variant goes through the same four steps:
//!
//! 1. the fractional fee rate and shares are moved onto the percentage basis (x100);
//! 2. the extracted shares are copied forward as-is;
//! 3. `adjustment = distributable - sum(extracted shares)`;
//! 4. the variant must reconcile to its distributable total within
//!    [`RECONCILIATION_TOLERANCE`].
//!
//! Shares are fractions of the fee, so a variant with a non-zero fee rate
//! distributes 100% of it and a zero fee rate distributes nothing. Values keep
//! full precision here; rounding is applied only by the formatting layer.

use log::warn;
use rust_decimal::Decimal;

use super::commissions_errors::CommissionError;
use super::commissions_model::{
    Channel, ChannelBreakdown, CommissionBreakdown, CommissionShares, FieldKey, Persona,
    PersonaBreakdown, RawFieldSet, Tier,
};
use crate::constants::{PERCENT_MULTIPLIER, RECONCILIATION_TOLERANCE};

/// Computes the full breakdown for all four persona/channel variants.
pub fn compute_breakdown(fields: &RawFieldSet) -> Result<CommissionBreakdown, CommissionError> {
    Ok(CommissionBreakdown {
        uddokta: compute_persona(fields, Persona::Uddokta)?,
        customer: compute_persona(fields, Persona::Customer)?,
    })
}

fn compute_persona(
    fields: &RawFieldSet,
    persona: Persona,
) -> Result<PersonaBreakdown, CommissionError> {
    Ok(PersonaBreakdown {
        app: compute_channel(fields, persona, Channel::App)?,
        ussd: compute_channel(fields, persona, Channel::Ussd)?,
    })
}

/// Computes the fee rate and commission shares of one persona/channel.
pub fn compute_channel(
    fields: &RawFieldSet,
    persona: Persona,
    channel: Channel,
) -> Result<ChannelBreakdown, CommissionError> {
    let percent = |tier: Tier| to_percent(fields, FieldKey::new(persona, channel, tier));

    let fee_rate = percent(Tier::FeeRate)?;

    let (sender_agent, parent_distributor) = match persona {
        Persona::Uddokta => (
            Some(percent(Tier::SenderAgent)?),
            Some(percent(Tier::ParentDistributor)?),
        ),
        Persona::Customer => (None, None),
    };

    let mut commissions = CommissionShares {
        sender_agent,
        parent_distributor,
        master_distributor: percent(Tier::MasterDistributor)?,
        twlt_sp: percent(Tier::TwltSp)?,
        bpo_pp: percent(Tier::BpoPp)?,
        adjustment: Decimal::ZERO,
    };

    let itemized = checked_itemized_total(&commissions).ok_or_else(|| {
        CommissionError::ValueOutOfRange {
            field: format!("{}.{} shares total", persona, channel),
        }
    })?;

    let distributable = distributable_percent(fee_rate);
    commissions.adjustment = distributable - itemized;

    verify_reconciliation(persona, channel, distributable, &commissions)?;

    Ok(ChannelBreakdown {
        fee_rate,
        commissions,
    })
}

/// Percentage of the fee that the shares of a variant must add up to.
pub fn distributable_percent(fee_rate_percent: Decimal) -> Decimal {
    if fee_rate_percent.is_zero() {
        Decimal::ZERO
    } else {
        PERCENT_MULTIPLIER
    }
}

fn to_percent(fields: &RawFieldSet, key: FieldKey) -> Result<Decimal, CommissionError> {
    let raw = fields.require(&key)?;
    if raw < Decimal::ZERO {
        return Err(CommissionError::NegativeValue {
            field: key.to_string(),
            value: raw,
        });
    }
    raw.checked_mul(PERCENT_MULTIPLIER)
        .ok_or_else(|| CommissionError::ValueOutOfRange {
            field: key.to_string(),
        })
}

fn checked_itemized_total(shares: &CommissionShares) -> Option<Decimal> {
    [
        shares.sender_agent.unwrap_or_default(),
        shares.parent_distributor.unwrap_or_default(),
        shares.master_distributor,
        shares.twlt_sp,
        shares.bpo_pp,
    ]
    .into_iter()
    .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
}

fn verify_reconciliation(
    persona: Persona,
    channel: Channel,
    distributable: Decimal,
    shares: &CommissionShares,
) -> Result<(), CommissionError> {
    // Extracted shares exceeding the fee would need a negative adjustment
    if shares.adjustment < -RECONCILIATION_TOLERANCE {
        warn!(
            "{} {} shares exceed the distributable {}% by {}",
            persona,
            channel,
            distributable,
            -shares.adjustment
        );
        return Err(CommissionError::InconsistentTotals {
            persona,
            channel,
            expected: distributable,
            actual: shares.itemized_total(),
        });
    }

    let total = shares.total();
    if (total - distributable).abs() > RECONCILIATION_TOLERANCE {
        return Err(CommissionError::InconsistentTotals {
            persona,
            channel,
            expected: distributable,
            actual: total,
        });
    }

    Ok(())
}
