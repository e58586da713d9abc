use serde::Serialize;
use tracing::debug;

use crate::model::*;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    pub shares: Vec<Share>,
    pub mean_share: BigDecimal,
    pub is_equally_split: bool,
}

/// Gives every automatic member an equal part of whatever the manual members left over.
///
/// Manual members (`auto == false`) keep their share and are taken out of the divisor. When
/// the current member is automatic and hasn't paid anything they are assumed to have paid
/// the remaining bill. Nobody else gets that default, even with nothing paid.
pub fn split_up(
    current_member_email: &str,
    mut shares: Vec<Share>,
    bill_amount: &BigDecimal,
) -> Allocation {
    let mut remaining = bill_amount.clone();
    let mut member_count = shares.len() as i64;
    let mut mean_share = if member_count > 0 {
        bill_amount.clone() / BigDecimal::from(member_count)
    } else {
        BigDecimal::zero()
    };

    for share in shares.iter().filter(|s| !s.auto) {
        remaining -= &share.share;
        member_count -= 1;
    }

    if member_count > 0 {
        mean_share = remaining.clone() / BigDecimal::from(member_count);
    }

    let rounded_mean = round_two(&mean_share);
    let mut is_equally_split = true;

    for share in shares.iter_mut() {
        if share.auto {
            share.share = mean_share.clone();

            if share.member_email == current_member_email && share.paid.is_zero() {
                share.paid = remaining.clone();
            }
        }

        if round_two(&share.share) != rounded_mean {
            is_equally_split = false;
        }
    }

    debug!(
        automatic = member_count,
        mean_share = %format_money(&mean_share),
        is_equally_split,
        "split up"
    );

    Allocation {
        shares,
        mean_share,
        is_equally_split,
    }
}
