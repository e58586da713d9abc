use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use std::time::Instant;
use tracing::*;

use crate::{
    config::Configuration,
    model::*,
    split,
    store::{Trip, TripStore},
};

#[derive(Debug, Args)]
pub struct Command {
    /// Print the suggestions as JSON
    #[arg(long)]
    pub json: bool,
    /// Whose point of view the briefs take, defaults to the configured member
    #[arg(short, long)]
    pub member: Option<String>,
}

#[derive(Debug, PartialEq)]
pub struct Plan {
    pub plan_id: i64,
    pub name: String,
    pub amount: BigDecimal,
    pub created: DateTime<Utc>,
}

/// Stored days flattened into the records the splitter works on. Every transaction is a
/// plan, numbered from one in day order.
#[derive(Debug, Default)]
pub struct History {
    pub members: Vec<Member>,
    pub shares: Vec<Share>,
    pub plans: Vec<Plan>,
}

impl History {
    pub fn from_days(trip_id: i64, days: &[(String, Trip)]) -> Self {
        let mut history = History::default();

        for (key, trip) in days {
            let created = DateTime::parse_from_rfc3339(key)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|e| {
                    warn!("unexpected day key {:?}: {}", key, e);
                    DateTime::<Utc>::default()
                });

            for transaction in trip.transactions.iter() {
                let plan_id = history.plans.len() as i64 + 1;

                for stored in transaction.shares.iter() {
                    history.add_member(trip_id, &stored.member);
                    history.shares.push(Share {
                        id: history.shares.len() as i64 + 1,
                        trip_id,
                        plan_id,
                        member_email: stored.member.clone(),
                        benefactor_email: stored.member.clone(),
                        share: stored.amount.clone(),
                        auto: false,
                        created,
                        ..Default::default()
                    });
                }

                if let Some(payer) = &transaction.paid_by {
                    history.add_member(trip_id, payer);
                    history.shares.push(Share {
                        id: history.shares.len() as i64 + 1,
                        trip_id,
                        plan_id,
                        member_email: payer.clone(),
                        benefactor_email: payer.clone(),
                        paid: transaction.amount.clone(),
                        auto: false,
                        created,
                        ..Default::default()
                    });
                }

                history.plans.push(Plan {
                    plan_id,
                    name: transaction.name.clone(),
                    amount: transaction.amount.clone(),
                    created,
                });
            }
        }

        history
    }

    fn add_member(&mut self, trip_id: i64, name: &str) {
        if find_member(&self.members, name).is_none() {
            self.members.push(Member::new(trip_id, name, name));
        }
    }

    pub fn total_amount(&self) -> BigDecimal {
        self.plans.iter().map(|p| p.amount.clone()).sum()
    }

    pub fn suggestions(&self, trip_id: i64, member: &str) -> Vec<PlanSuggestion> {
        let mut suggestions = self
            .plans
            .iter()
            .map(|plan| {
                split::compute_individual_suggestion(
                    trip_id,
                    plan.plan_id,
                    &plan.amount,
                    &plan.name,
                    &plan.created,
                    &self.members,
                    member,
                    &self.shares,
                )
            })
            .collect_vec();

        suggestions.push(split::compute_total_suggestion(
            trip_id,
            &self.total_amount(),
            &self.members,
            member,
            &self.shares,
        ));

        suggestions
    }
}

fn describe(suggestion: &Suggestion) -> String {
    match suggestion.operation {
        Operation::Paid => format!(
            "{} paid {} to {}",
            suggestion.a_member_name,
            format_money(&suggestion.amount),
            suggestion.b_member_name
        ),
        _ => format!(
            "{} owes {} {}",
            suggestion.b_member_name,
            suggestion.a_member_name,
            format_money(&suggestion.amount)
        ),
    }
}

pub fn execute_command(config: &Configuration, cmd: &Command) -> anyhow::Result<()> {
    let member = cmd.member.as_deref().unwrap_or(&config.member);

    let history = {
        let _span = span!(Level::INFO, "loading").entered();
        let started = Instant::now();
        let store = TripStore::open(&config.database)?;
        let days = store.trips(&config.bucket)?;
        let history = History::from_days(config.trip_id, &days);
        info!(
            days = days.len(),
            plans = history.plans.len(),
            "loaded trip in {:?}",
            started.elapsed()
        );
        history
    };

    let suggestions = history.suggestions(config.trip_id, member);

    if cmd.json {
        serde_json::to_writer_pretty(std::io::stdout(), &suggestions)?;
        println!();
        return Ok(());
    }

    for plan in suggestions.iter() {
        println!(
            "{:<30} {:>12} {}",
            plan.notes.bold(),
            format_money(&plan.amount),
            plan.date
        );
        for suggestion in plan.suggestions.iter() {
            let line = describe(suggestion);
            match suggestion.operation {
                Operation::Paid => println!("    {}", line.dimmed()),
                _ => println!("    {}", line),
            }
        }
        if !member.is_empty() {
            let brief = match plan.operation {
                Operation::GetsBack => plan.brief.green(),
                Operation::Paid | Operation::Both => plan.brief.yellow(),
                _ => plan.brief.normal(),
            };
            println!("    {}", brief);
        }
    }

    Ok(())
}
