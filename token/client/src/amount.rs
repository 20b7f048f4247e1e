//! Conversion between whole-token ("ui") amounts and base units.

/// Convert a whole-token amount into base units, `ui_amount * 10^decimals`.
///
/// Returns `None` when the result does not fit in a `u64`.
pub fn ui_amount_to_base_units(ui_amount: u64, decimals: u8) -> Option<u64> {
    if ui_amount == 0 {
        return Some(0);
    }
    10u64
        .checked_pow(u32::from(decimals))
        .and_then(|scale| ui_amount.checked_mul(scale))
}

/// Render a base-unit amount with its decimal point, trailing zeros trimmed.
pub fn base_units_to_ui_string(amount: u64, decimals: u8) -> String {
    spl_token::amount_to_ui_amount_string_trimmed(amount, decimals)
}
