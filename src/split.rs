use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::*;

use crate::model::*;

pub use self::allocate::Allocation;

mod allocate;
mod brief;
mod merge;
mod settle;
mod validate;

#[cfg(test)]
mod tests;

#[derive(Debug, Error)]
pub enum SplitError {
    #[error("Invalid {what}: {source}")]
    InvalidInput {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

fn parse<T: DeserializeOwned>(what: &'static str, json: &str) -> Result<Vec<T>, SplitError> {
    serde_json::from_str(json).map_err(|source| {
        warn!("error decoding {}: {}", what, source);
        SplitError::InvalidInput { what, source }
    })
}

/// Merges the plan's records, adds roster members that are missing and splits the bill.
pub fn compute_shares(
    trip_id: i64,
    plan_id: i64,
    bill_amount: &BigDecimal,
    current_member_email: &str,
    members: &[Member],
    shares: &[Share],
) -> Allocation {
    let (merged, shares_present_already) = merge::merge_duplicate_shares(plan_id, shares);
    let merged =
        merge::backfill_members(trip_id, plan_id, members, merged, shares_present_already);
    allocate::split_up(current_member_email, merged, bill_amount)
}

pub fn compute_shares_json(
    trip_id: i64,
    plan_id: i64,
    bill_amount: &BigDecimal,
    current_member_email: &str,
    members_json: &str,
    shares_json: &str,
) -> Result<Allocation, SplitError> {
    let members: Vec<Member> = parse("members", members_json)?;
    let shares: Vec<Share> = parse("shares", shares_json)?;
    Ok(compute_shares(
        trip_id,
        plan_id,
        bill_amount,
        current_member_email,
        &members,
        &shares,
    ))
}

/// `(true, "")` when paid and shared totals both reconcile with the bill.
pub fn validate_shares(shares: &[Share], bill_amount: &BigDecimal) -> (bool, String) {
    match validate::validate(shares, bill_amount) {
        Ok(()) => (true, String::new()),
        Err(mismatch) => (false, mismatch.to_string()),
    }
}

pub fn validate_shares_json(
    shares_json: &str,
    bill_amount: &BigDecimal,
) -> Result<(bool, String), SplitError> {
    let shares: Vec<Share> = parse("shares", shares_json)?;
    Ok(validate_shares(&shares, bill_amount))
}

/// Transfers that settle the whole trip, every plan folded together.
pub fn compute_total_suggestion(
    trip_id: i64,
    total_amount: &BigDecimal,
    members: &[Member],
    current_member_email: &str,
    shares: &[Share],
) -> PlanSuggestion {
    let mut plan = PlanSuggestion {
        trip_id,
        plan_id: 0,
        notes: "Total".to_owned(),
        brief: String::new(),
        date: "--".to_owned(),
        amount: total_amount.clone(),
        operation: Operation::NotInvolved,
        suggestions: Vec::new(),
    };

    let (merged, shares_present_already) = merge::merge_duplicate_shares(0, shares);
    let merged = merge::backfill_members(trip_id, 0, members, merged, shares_present_already);
    let (creditors, debtors) = settle::partition(0, &merged);
    plan.suggestions = settle::settle(creditors, debtors);
    brief::add_current_user_brief(&mut plan, current_member_email);

    info!(trip_id, suggestions = plan.suggestions.len(), "total suggestion");

    plan
}

pub fn compute_total_suggestion_json(
    trip_id: i64,
    total_amount: &BigDecimal,
    members_json: &str,
    current_member_email: &str,
    shares_json: &str,
) -> Result<PlanSuggestion, SplitError> {
    let members: Vec<Member> = parse("members", members_json)?;
    let shares: Vec<Share> = parse("shares", shares_json)?;
    Ok(compute_total_suggestion(
        trip_id,
        total_amount,
        &members,
        current_member_email,
        &shares,
    ))
}

/// Who paid what and who owes whom for a single plan. A plan without a positive amount
/// gets an empty envelope.
#[allow(clippy::too_many_arguments)]
pub fn compute_individual_suggestion(
    trip_id: i64,
    plan_id: i64,
    amount: &BigDecimal,
    notes: &str,
    created: &DateTime<Utc>,
    members: &[Member],
    current_member_email: &str,
    shares: &[Share],
) -> PlanSuggestion {
    let mut plan = PlanSuggestion {
        trip_id,
        plan_id,
        notes: notes.to_owned(),
        brief: String::new(),
        date: format_time_month(created),
        amount: amount.clone(),
        operation: Operation::NotInvolved,
        suggestions: Vec::new(),
    };

    if !amount.is_positive() {
        debug!(trip_id, plan_id, "nothing to suggest");
        return plan;
    }

    plan.suggestions = settle::benefactor_suggestions(plan_id, members, shares);

    let (merged, shares_present_already) = merge::merge_duplicate_shares(plan_id, shares);
    let merged =
        merge::backfill_members(trip_id, plan_id, members, merged, shares_present_already);
    let (creditors, debtors) = settle::partition(plan_id, &merged);
    plan.suggestions.extend(settle::settle(creditors, debtors));
    brief::add_current_user_brief(&mut plan, current_member_email);

    info!(
        trip_id,
        plan_id,
        suggestions = plan.suggestions.len(),
        "individual suggestion"
    );

    plan
}

#[allow(clippy::too_many_arguments)]
pub fn compute_individual_suggestion_json(
    trip_id: i64,
    plan_id: i64,
    amount: &BigDecimal,
    notes: &str,
    created: &DateTime<Utc>,
    members_json: &str,
    current_member_email: &str,
    shares_json: &str,
) -> Result<PlanSuggestion, SplitError> {
    let members: Vec<Member> = parse("members", members_json)?;
    let shares: Vec<Share> = parse("shares", shares_json)?;
    Ok(compute_individual_suggestion(
        trip_id,
        plan_id,
        amount,
        notes,
        created,
        &members,
        current_member_email,
        &shares,
    ))
}
