use tracing::{debug, trace};

use super::merge::is_current_plan;
use crate::model::*;

/// Who paid the bill, and for whom, straight from the raw records. Call before merging so
/// every staged payment shows up.
pub fn benefactor_suggestions(plan_id: i64, members: &[Member], shares: &[Share]) -> Vec<Suggestion> {
    shares
        .iter()
        .filter(|share| is_current_plan(share.plan_id, plan_id))
        .filter(|share| share.paid.is_positive())
        .map(|share| {
            let payer = find_member(members, &share.member_email);
            let payer = Share {
                member_name: payer.map(|m| m.name.clone()).unwrap_or_default(),
                member_avatar: payer.map(|m| m.avatar.clone()).unwrap_or_default(),
                ..share.clone()
            };
            Suggestion::paid(&payer, find_member(members, payer.benefactor()))
        })
        .collect()
}

/// Working copies with `diff` filled in, split into creditors (`diff >= 0`) and debtors.
pub fn partition(plan_id: i64, shares: &[Share]) -> (Vec<Share>, Vec<Share>) {
    shares
        .iter()
        .filter(|share| is_current_plan(share.plan_id, plan_id))
        .map(|share| Share {
            diff: &share.paid - &share.share,
            ..share.clone()
        })
        .partition(|share| !share.diff.is_negative())
}

/// Matches the largest creditor against the largest debtor until one side is tallied.
///
/// Every round zeroes at least one member, so there are never more suggestions than
/// members minus one, and no balance is pushed past zero.
pub fn settle(mut creditors: Vec<Share>, mut debtors: Vec<Share>) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    loop {
        creditors.sort_by(|a, b| b.diff.cmp(&a.diff));
        debtors.sort_by(|a, b| a.diff.cmp(&b.diff));

        let Some(creditor) = creditors.iter_mut().find(|c| !is_tallied(&c.diff)) else {
            break;
        };
        let Some(debtor) = debtors.iter_mut().find(|d| !is_tallied(&d.diff)) else {
            break;
        };

        let outstanding = -debtor.diff.clone();
        if creditor.diff >= outstanding {
            suggestions.push(Suggestion::transfer(outstanding, creditor, debtor));
            creditor.diff += &debtor.diff;
            debtor.diff = BigDecimal::zero();
        } else {
            suggestions.push(Suggestion::transfer(creditor.diff.clone(), creditor, debtor));
            debtor.diff += &creditor.diff;
            creditor.diff = BigDecimal::zero();
        }

        trace!(
            from = %debtor.member_email,
            to = %creditor.member_email,
            "matched"
        );
    }

    let unsettled = creditors
        .iter()
        .chain(debtors.iter())
        .filter(|s| !is_tallied(&s.diff))
        .count();
    debug!(suggestions = suggestions.len(), unsettled, "settled");

    suggestions
}
