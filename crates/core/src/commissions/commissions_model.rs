//! Fee-commission domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::commissions_errors::CommissionError;
use crate::constants::{DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};
use crate::errors::{Error, ValidationError};
use crate::Result;

/// Classification of an uploaded fee-commission scheme.
///
/// Only `Regular` can be computed today. The other variants are accepted as
/// input so that the rejection is explicit rather than a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemeType {
    Regular,
    DropPoint,
    EmiBiller,
}

impl SchemeType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SchemeType::Regular => "REGULAR",
            SchemeType::DropPoint => "DROP_POINT",
            SchemeType::EmiBiller => "EMI_BILLER",
        }
    }

    pub const fn is_supported(&self) -> bool {
        matches!(self, SchemeType::Regular)
    }
}

impl fmt::Display for SchemeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemeType {
    type Err = Error;

    /// Accepts the canonical names as well as the labels used on upload forms
    /// ("Regular", "Drop Point", "emi-biller", ...).
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "regular" => Ok(SchemeType::Regular),
            "droppoint" => Ok(SchemeType::DropPoint),
            "emibiller" => Ok(SchemeType::EmiBiller),
            _ => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown scheme type '{}'",
                s
            )))),
        }
    }
}

/// Who initiates the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Persona {
    Uddokta,
    Customer,
}

impl Persona {
    pub const ALL: [Persona; 2] = [Persona::Uddokta, Persona::Customer];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Persona::Uddokta => "Uddokta",
            Persona::Customer => "Customer",
        }
    }

    /// Commission tiers that are read directly from the workbook for this persona.
    pub const fn share_tiers(&self) -> &'static [Tier] {
        match self {
            Persona::Uddokta => &[
                Tier::SenderAgent,
                Tier::ParentDistributor,
                Tier::MasterDistributor,
                Tier::TwltSp,
                Tier::BpoPp,
            ],
            Persona::Customer => &[Tier::MasterDistributor, Tier::TwltSp, Tier::BpoPp],
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access medium for the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Channel {
    #[serde(rename = "APP")]
    App,
    #[serde(rename = "USSD")]
    Ussd,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::App, Channel::Ussd];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Channel::App => "APP",
            Channel::Ussd => "USSD",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value that is extracted from the workbook for each persona/channel.
///
/// The adjustment is deliberately absent: it is derived, never read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    FeeRate,
    SenderAgent,
    ParentDistributor,
    MasterDistributor,
    TwltSp,
    BpoPp,
}

impl Tier {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Tier::FeeRate => "feeRate",
            Tier::SenderAgent => "senderAgent",
            Tier::ParentDistributor => "parentDistributor",
            Tier::MasterDistributor => "masterDistributor",
            Tier::TwltSp => "twltSp",
            Tier::BpoPp => "bpoPp",
        }
    }

    fn parse(s: &str) -> Option<Tier> {
        [
            Tier::FeeRate,
            Tier::SenderAgent,
            Tier::ParentDistributor,
            Tier::MasterDistributor,
            Tier::TwltSp,
            Tier::BpoPp,
        ]
        .into_iter()
        .find(|t| t.as_str() == s)
    }
}

/// One named entry of a [`RawFieldSet`], e.g. `Uddokta.APP.feeRate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
    pub persona: Persona,
    pub channel: Channel,
    pub tier: Tier,
}

impl FieldKey {
    pub const fn new(persona: Persona, channel: Channel, tier: Tier) -> Self {
        Self {
            persona,
            channel,
            tier,
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.persona, self.channel, self.tier.as_str())
    }
}

impl FromStr for FieldKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid =
            || Error::Validation(ValidationError::InvalidInput(format!("Unknown field '{}'", s)));
        let mut parts = s.splitn(3, '.');
        let persona = match parts.next() {
            Some("Uddokta") => Persona::Uddokta,
            Some("Customer") => Persona::Customer,
            _ => return Err(invalid()),
        };
        let channel = match parts.next() {
            Some("APP") => Channel::App,
            Some("USSD") => Channel::Ussd,
            _ => return Err(invalid()),
        };
        let tier = parts.next().and_then(Tier::parse).ok_or_else(invalid)?;
        Ok(FieldKey::new(persona, channel, tier))
    }
}

/// Flat set of values pulled from the workbook's fixed cell coordinates.
///
/// Values are kept exactly as read (fractions, not percentages).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFieldSet {
    values: BTreeMap<FieldKey, Decimal>,
}

impl RawFieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: FieldKey, value: Decimal) {
        self.values.insert(key, value);
    }

    pub fn get(&self, key: &FieldKey) -> Option<Decimal> {
        self.values.get(key).copied()
    }

    /// Returns the value for `key`, failing when the field was never extracted.
    pub fn require(&self, key: &FieldKey) -> std::result::Result<Decimal, CommissionError> {
        self.get(key)
            .ok_or_else(|| CommissionError::MissingField(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &Decimal)> {
        self.values.iter()
    }
}

impl Serialize for RawFieldSet {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (key, value) in &self.values {
            map.serialize_entry(&key.to_string(), &value.to_string())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RawFieldSet {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        let mut fields = RawFieldSet::new();
        for (key, value) in raw {
            let key = FieldKey::from_str(&key).map_err(serde::de::Error::custom)?;
            let value = Decimal::from_str(&value)
                .or_else(|_| Decimal::from_scientific(&value))
                .map_err(serde::de::Error::custom)?;
            fields.insert(key, value);
        }
        Ok(fields)
    }
}

/// Itemized commission shares of one persona/channel, on the percentage basis.
///
/// `sender_agent` and `parent_distributor` are only present for Uddokta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionShares {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(with = "optional_decimal_format")]
    pub sender_agent: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(with = "optional_decimal_format")]
    pub parent_distributor: Option<Decimal>,
    #[serde(with = "decimal_format")]
    pub master_distributor: Decimal,
    #[serde(with = "decimal_format")]
    pub twlt_sp: Decimal,
    #[serde(with = "decimal_format")]
    pub bpo_pp: Decimal,
    #[serde(with = "decimal_format")]
    pub adjustment: Decimal,
}

impl CommissionShares {
    /// Sum of the shares read from the workbook (everything except the adjustment).
    pub fn itemized_total(&self) -> Decimal {
        self.sender_agent.unwrap_or_default()
            + self.parent_distributor.unwrap_or_default()
            + self.master_distributor
            + self.twlt_sp
            + self.bpo_pp
    }

    /// Sum of every share including the adjustment.
    pub fn total(&self) -> Decimal {
        self.itemized_total() + self.adjustment
    }
}

/// Fee rate and commission breakdown for one persona/channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelBreakdown {
    /// Fee rate as a percentage of the transaction amount.
    #[serde(with = "decimal_format")]
    pub fee_rate: Decimal,
    pub commissions: CommissionShares,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaBreakdown {
    #[serde(rename = "APP")]
    pub app: ChannelBreakdown,
    #[serde(rename = "USSD")]
    pub ussd: ChannelBreakdown,
}

impl PersonaBreakdown {
    pub fn channel(&self, channel: Channel) -> &ChannelBreakdown {
        match channel {
            Channel::App => &self.app,
            Channel::Ussd => &self.ussd,
        }
    }
}

/// The computed result of a scheme: Uddokta and Customer, each with APP and USSD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionBreakdown {
    #[serde(rename = "Uddokta")]
    pub uddokta: PersonaBreakdown,
    #[serde(rename = "Customer")]
    pub customer: PersonaBreakdown,
}

impl CommissionBreakdown {
    pub fn persona(&self, persona: Persona) -> &PersonaBreakdown {
        match persona {
            Persona::Uddokta => &self.uddokta,
            Persona::Customer => &self.customer,
        }
    }

    pub fn get(&self, persona: Persona, channel: Channel) -> &ChannelBreakdown {
        self.persona(persona).channel(channel)
    }

    /// All four persona/channel variants in a stable order.
    pub fn variants(&self) -> impl Iterator<Item = (Persona, Channel, &ChannelBreakdown)> {
        Persona::ALL.into_iter().flat_map(move |persona| {
            Channel::ALL
                .into_iter()
                .map(move |channel| (persona, channel, self.get(persona, channel)))
        })
    }
}

/// The uploaded artifact. Lives only for the duration of one submission.
#[derive(Clone)]
pub struct SchemeWorkbook {
    pub file_name: String,
    pub content: Vec<u8>,
    pub scheme_type: SchemeType,
}

impl SchemeWorkbook {
    pub fn new(file_name: impl Into<String>, content: Vec<u8>, scheme_type: SchemeType) -> Self {
        Self {
            file_name: file_name.into(),
            content,
            scheme_type,
        }
    }
}

impl fmt::Debug for SchemeWorkbook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemeWorkbook")
            .field("file_name", &self.file_name)
            .field("content_len", &self.content.len())
            .field("scheme_type", &self.scheme_type)
            .finish()
    }
}

/// Input model for persisting a completed calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCalculationRecord {
    pub biller_name: String,
    pub file_name: String,
    pub scheme_type: SchemeType,
    pub layout_version: String,
    pub raw_fields: RawFieldSet,
    pub breakdown: CommissionBreakdown,
    pub submitted_by: String,
}

/// Persisted, immutable unit of calculation history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRecord {
    pub id: String,
    pub biller_name: String,
    pub file_name: String,
    pub scheme_type: SchemeType,
    pub layout_version: String,
    pub raw_fields: RawFieldSet,
    pub breakdown: CommissionBreakdown,
    pub submitted_by: String,
    pub created_at: NaiveDateTime,
}

impl CalculationRecord {
    pub fn summary(&self) -> CalculationSummary {
        CalculationSummary {
            id: self.id.clone(),
            biller_name: self.biller_name.clone(),
            file_name: self.file_name.clone(),
            scheme_type: self.scheme_type,
            submitted_by: self.submitted_by.clone(),
            created_at: self.created_at,
        }
    }
}

/// Lightweight view of a record returned by history search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalculationSummary {
    pub id: String,
    pub biller_name: String,
    pub file_name: String,
    pub scheme_type: SchemeType,
    pub submitted_by: String,
    pub created_at: NaiveDateTime,
}

/// History search parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationSearchRequest {
    pub biller_name: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl CalculationSearchRequest {
    /// Trimmed biller substring; blank input means "no filter".
    pub fn search_term(&self) -> Option<&str> {
        self.biller_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT)
    }

    pub fn effective_offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationSearchResponse {
    pub items: Vec<CalculationSummary>,
    pub has_more: bool,
}

mod decimal_format {
    use rust_decimal::Decimal;
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Strings keep every digit through a JSON round-trip
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum DecimalOrString {
            Decimal(Decimal),
            String(String),
        }

        match DecimalOrString::deserialize(deserializer)? {
            DecimalOrString::Decimal(d) => Ok(d),
            DecimalOrString::String(s) => Decimal::from_str(&s)
                .or_else(|_| Decimal::from_scientific(&s))
                .map_err(serde::de::Error::custom),
        }
    }
}

mod optional_decimal_format {
    use rust_decimal::Decimal;
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.serialize_str(&d.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum DecimalOrString {
            Decimal(Decimal),
            String(String),
        }

        match Option::<DecimalOrString>::deserialize(deserializer)? {
            Some(DecimalOrString::Decimal(d)) => Ok(Some(d)),
            Some(DecimalOrString::String(s)) if s.is_empty() => Ok(None),
            Some(DecimalOrString::String(s)) => Decimal::from_str(&s)
                .or_else(|_| Decimal::from_scientific(&s))
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_scheme_type_parses_form_labels() {
        assert_eq!("Regular".parse::<SchemeType>().unwrap(), SchemeType::Regular);
        assert_eq!("Drop Point".parse::<SchemeType>().unwrap(), SchemeType::DropPoint);
        assert_eq!("emi-biller".parse::<SchemeType>().unwrap(), SchemeType::EmiBiller);
        assert_eq!("EMI_BILLER".parse::<SchemeType>().unwrap(), SchemeType::EmiBiller);
        assert!("weekly".parse::<SchemeType>().is_err());
    }

    #[test]
    fn test_field_key_display_roundtrip() {
        let key = FieldKey::new(Persona::Customer, Channel::Ussd, Tier::TwltSp);
        assert_eq!(key.to_string(), "Customer.USSD.twltSp");
        assert_eq!("Customer.USSD.twltSp".parse::<FieldKey>().unwrap(), key);
        assert!("Customer.WEB.twltSp".parse::<FieldKey>().is_err());
        assert!("Customer.APP.adjustment".parse::<FieldKey>().is_err());
    }

    #[test]
    fn test_raw_field_set_serializes_decimals_as_strings() {
        let mut fields = RawFieldSet::new();
        fields.insert(
            FieldKey::new(Persona::Uddokta, Channel::App, Tier::BpoPp),
            dec!(0.00002),
        );
        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json["Uddokta.APP.bpoPp"], "0.00002");

        let back: RawFieldSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, fields);
    }

    #[test]
    fn test_customer_shares_omit_agent_tiers() {
        let shares = CommissionShares {
            sender_agent: None,
            parent_distributor: None,
            master_distributor: dec!(40),
            twlt_sp: dec!(0.005),
            bpo_pp: dec!(0.001),
            adjustment: dec!(59.994),
        };
        let json = serde_json::to_value(&shares).unwrap();
        assert!(json.get("senderAgent").is_none());
        assert!(json.get("parentDistributor").is_none());
        assert_eq!(json["masterDistributor"], "40");
        assert_eq!(shares.total(), dec!(100));
    }

    #[test]
    fn test_search_request_limits() {
        let request = CalculationSearchRequest {
            biller_name: Some("   ".to_string()),
            limit: Some(5_000),
            offset: Some(-3),
        };
        assert_eq!(request.search_term(), None);
        assert_eq!(request.effective_limit(), MAX_SEARCH_LIMIT);
        assert_eq!(request.effective_offset(), 0);
        assert_eq!(
            CalculationSearchRequest::default().effective_limit(),
            DEFAULT_SEARCH_LIMIT
        );
    }
}
