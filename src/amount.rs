//! Limits and overflow-checked arithmetic for amounts of money.
//!
//! Amounts are whole currency units. Every stored amount lies between zero and
//! [MAX_AMOUNT], and totals are summed with checked arithmetic so that a large
//! month fails with an error instead of wrapping around or panicking.

use crate::Error;

/// The largest amount a transaction or category budget may hold, in whole currency units.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// Check that `amount` is between zero and [MAX_AMOUNT], inclusive.
///
/// # Errors
/// Returns [Error::NegativeAmount] if `amount` is below zero and
/// [Error::AmountTooLarge] if it is above [MAX_AMOUNT].
pub fn validate_amount(amount: i64) -> Result<i64, Error> {
    if amount < 0 {
        return Err(Error::NegativeAmount(amount));
    }

    if amount > MAX_AMOUNT {
        return Err(Error::AmountTooLarge(amount));
    }

    Ok(amount)
}

/// Add `amount` to `total`.
///
/// # Errors
/// Returns [Error::AmountOverflow] if the result does not fit in an `i64`.
pub fn checked_add(total: i64, amount: i64) -> Result<i64, Error> {
    total.checked_add(amount).ok_or(Error::AmountOverflow)
}

/// Sum `amounts`, starting from zero.
///
/// # Errors
/// Returns [Error::AmountOverflow] if the sum does not fit in an `i64`.
pub fn checked_sum(amounts: impl IntoIterator<Item = i64>) -> Result<i64, Error> {
    amounts.into_iter().try_fold(0, checked_add)
}
