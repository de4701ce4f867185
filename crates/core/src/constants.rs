/// Percentage of the effective cap at which a budget is surfaced as "warning".
pub const WARNING_THRESHOLD_PERCENT: u32 = 80;

/// Percentage of the effective cap at which a budget alert escalates to critical.
pub const CRITICAL_THRESHOLD_PERCENT: u32 = 125;

/// Decimal places kept when reporting percentage-of-cap values.
pub const PERCENTAGE_DECIMAL_PRECISION: u32 = 1;

/// Currency assigned to budgets created without an explicit one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Priority assigned to budgets created without an explicit one.
/// Lower values take precedence when budgets overlap a category.
pub const DEFAULT_BUDGET_PRIORITY: i32 = 100;
