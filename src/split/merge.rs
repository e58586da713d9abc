use indexmap::IndexMap;
use tracing::debug;

use crate::model::*;

/// Zero selects every plan of the trip.
pub(crate) fn is_current_plan(plan_id: i64, current_plan_id: i64) -> bool {
    plan_id == current_plan_id || current_plan_id == 0
}

/// A payment made on behalf of someone else is tallied against them with a negative paid.
fn shares_out_of_benefactors(shares: &[Share]) -> Vec<Share> {
    shares
        .iter()
        .filter(|share| share.pays_for_other())
        .map(|share| Share {
            trip_id: share.trip_id,
            plan_id: share.plan_id,
            member_email: share.benefactor().to_owned(),
            benefactor_email: share.benefactor().to_owned(),
            paid: -share.paid.clone(),
            created: share.created,
            ..Default::default()
        })
        .collect()
}

/// Members may have paid in stages, so collapse their records into one share each.
///
/// Output keeps first-sight order, and every merged share is its own benefactor since payments
/// made for others have already been offset. The flag is set when any merged share has been
/// persisted before, meaning the plan has already been edited.
pub fn merge_duplicate_shares(plan_id: i64, shares: &[Share]) -> (Vec<Share>, bool) {
    let synthesized = shares_out_of_benefactors(shares);

    let mut merged: IndexMap<String, Share> = IndexMap::new();
    for share in shares
        .iter()
        .chain(synthesized.iter())
        .filter(|share| is_current_plan(share.plan_id, plan_id))
    {
        match merged.get_mut(&share.member_email) {
            Some(saved) => {
                if saved.id == 0 {
                    saved.id = share.id;
                    saved.member_name = share.member_name.clone();
                    saved.member_avatar = share.member_avatar.clone();
                }
                saved.paid += &share.paid;
                saved.share += &share.share;
            }
            None => {
                let mut share = share.clone();
                share.benefactor_email = share.member_email.clone();
                merged.insert(share.member_email.clone(), share);
            }
        }
    }

    let shares_present_already = merged.values().any(|share| share.id != 0);

    debug!(
        plan_id,
        raw = shares.len(),
        benefactors = synthesized.len(),
        merged = merged.len(),
        shares_present_already,
        "merged shares"
    );

    (merged.into_values().collect(), shares_present_already)
}

/// Adds a share for every roster member missing from the plan and refreshes display fields
/// of the rest. Members joining a plan that was already edited are not auto included.
pub fn backfill_members(
    trip_id: i64,
    plan_id: i64,
    members: &[Member],
    mut shares: Vec<Share>,
    shares_present_already: bool,
) -> Vec<Share> {
    for member in members {
        match shares.iter().position(|s| s.member_email == member.email) {
            Some(index) => {
                let share = &mut shares[index];
                share.member_name = member.name.clone();
                share.member_avatar = member.avatar.clone();
            }
            None => shares.push(Share::fresh(
                trip_id,
                plan_id,
                member,
                !shares_present_already,
            )),
        }
    }

    shares
}
