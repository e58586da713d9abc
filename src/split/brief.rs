use crate::model::*;

/// "Ann, Bob and Cat."
fn join_names(names: &[&str]) -> String {
    match names.split_last() {
        Some((last, [])) => format!("{}.", last),
        Some((last, rest)) => format!("{} and {}.", rest.join(", "), last),
        None => String::new(),
    }
}

fn total(suggestions: &[&Suggestion]) -> BigDecimal {
    suggestions.iter().map(|s| s.amount.clone()).sum()
}

/// Summarizes the plan from one member's side. Payment rows are informational and ignored.
pub fn add_current_user_brief(plan: &mut PlanSuggestion, member_email: &str) {
    let mut gets_back: Vec<&Suggestion> = Vec::new();
    let mut gives: Vec<&Suggestion> = Vec::new();
    for suggestion in plan
        .suggestions
        .iter()
        .filter(|s| s.operation != Operation::Paid)
    {
        if suggestion.a_member_email == member_email {
            gets_back.push(suggestion);
        } else if suggestion.b_member_email == member_email {
            gives.push(suggestion);
        }
    }

    if gets_back.is_empty() && gives.is_empty() {
        plan.brief = "Settled".to_owned();
        plan.operation = Operation::Settled;
        return;
    }

    let mut clauses = Vec::new();
    let mut operation = plan.operation;

    let gets_back_amount = total(&gets_back);
    if gets_back_amount.is_positive() {
        let names = gets_back
            .iter()
            .map(|s| s.b_member_name.as_str())
            .collect_vec();
        clauses.push(format!(
            "You gets back {} from {}",
            format_money(&gets_back_amount),
            join_names(&names)
        ));
        operation = Operation::GetsBack;
    }

    let gives_amount = total(&gives);
    if gives_amount.is_positive() {
        let names = gives.iter().map(|s| s.a_member_name.as_str()).collect_vec();
        clauses.push(format!(
            "You have to give {} to {}",
            format_money(&gives_amount),
            join_names(&names)
        ));
        operation = if operation == Operation::GetsBack {
            Operation::Both
        } else {
            Operation::Paid
        };
    }

    if !clauses.is_empty() {
        plan.brief = clauses.join(" and ");
        plan.operation = operation;
    }
}
