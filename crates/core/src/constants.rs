use rust_decimal::Decimal;

/// Maximum absolute difference allowed between a channel's summed shares and
/// its distributable total (1e-6).
pub const RECONCILIATION_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 6);

/// Multiplier that moves a fractional spreadsheet rate onto the percentage basis
pub const PERCENT_MULTIPLIER: Decimal = Decimal::ONE_HUNDRED;

/// Decimal places used when rendering a fee rate
pub const FEE_RATE_DECIMAL_PLACES: u32 = 2;

/// Decimal places used when rendering TWTL/SP and BPO/PP shares
pub const PLATFORM_SHARE_DECIMAL_PLACES: u32 = 5;

/// Decimal places used when rendering every other commission share
pub const COMMISSION_SHARE_DECIMAL_PLACES: u32 = 9;

/// Default number of summaries returned by a history search
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

/// Upper bound on the number of summaries returned by a history search
pub const MAX_SEARCH_LIMIT: i64 = 100;

/// File-name marker whose biller name runs up to the first underscore
pub const BILLER_MARKER_FOR: &str = "Fee-Commission Scheme for ";

/// File-name marker whose biller name runs up to the first " - "
pub const BILLER_MARKER_DASH: &str = "Fee-Commission Scheme - ";
