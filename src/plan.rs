use chrono::Utc;
use clap::Args;
use std::{fs, path::PathBuf};

use crate::{config::Configuration, model::*, split};

#[derive(Debug, Args)]
pub struct Command {
    /// JSON file with the trip's members
    #[arg(short, long, value_name = "FILE")]
    pub members: PathBuf,
    /// JSON file with the shares
    #[arg(short, long, value_name = "FILE")]
    pub shares: PathBuf,
    /// Bill amount, or the trip's total with --total
    #[arg(short, long)]
    pub amount: BigDecimal,
    #[arg(short, long, default_value_t = 1)]
    pub plan: i64,
    #[arg(short, long, default_value = "")]
    pub notes: String,
    /// Settle every plan in the shares together
    #[arg(long)]
    pub total: bool,
    /// Whose point of view the brief takes, defaults to the configured member
    #[arg(long)]
    pub me: Option<String>,
}

pub fn execute_command(config: &Configuration, cmd: &Command) -> anyhow::Result<()> {
    let members = fs::read_to_string(&cmd.members)?;
    let shares = fs::read_to_string(&cmd.shares)?;
    let me = cmd.me.as_deref().unwrap_or(&config.member);

    let suggestion = if cmd.total {
        split::compute_total_suggestion_json(config.trip_id, &cmd.amount, &members, me, &shares)?
    } else {
        split::compute_individual_suggestion_json(
            config.trip_id,
            cmd.plan,
            &cmd.amount,
            &cmd.notes,
            &Utc::now(),
            &members,
            me,
            &shares,
        )?
    };

    serde_json::to_writer_pretty(std::io::stdout(), &suggestion)?;
    println!();

    Ok(())
}
