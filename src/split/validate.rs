use std::cmp::Ordering;

use thiserror::Error;

use crate::model::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Mismatch {
    #[error("Total amount paid more than the bill amount")]
    PaidTooMuch,
    #[error("Total amount paid less than the bill amount")]
    PaidTooLittle,
    #[error("Total share is more than the bill amount")]
    SharedTooMuch,
    #[error("Total share is less than the bill amount")]
    SharedTooLittle,
}

/// Paid and shared totals must both match the bill to the cent. Paid is checked first.
pub fn validate(shares: &[Share], bill_amount: &BigDecimal) -> Result<(), Mismatch> {
    let total_paid = round_two(&shares.iter().map(|s| s.paid.clone()).sum::<BigDecimal>());
    let total_share = round_two(&shares.iter().map(|s| s.share.clone()).sum::<BigDecimal>());
    let bill_amount = round_two(bill_amount);

    match total_paid.cmp(&bill_amount) {
        Ordering::Greater => return Err(Mismatch::PaidTooMuch),
        Ordering::Less => return Err(Mismatch::PaidTooLittle),
        Ordering::Equal => {}
    }

    match total_share.cmp(&bill_amount) {
        Ordering::Greater => Err(Mismatch::SharedTooMuch),
        Ordering::Less => Err(Mismatch::SharedTooLittle),
        Ordering::Equal => Ok(()),
    }
}
