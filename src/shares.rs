use clap::Args;
use std::{fs, path::PathBuf};

use crate::{config::Configuration, model::*, split};

#[derive(Debug, Args)]
pub struct Command {
    /// JSON file with the trip's members
    #[arg(short, long, value_name = "FILE")]
    pub members: PathBuf,
    /// JSON file with the plan's shares recorded so far
    #[arg(short, long, value_name = "FILE")]
    pub shares: Option<PathBuf>,
    /// Bill amount
    #[arg(short, long)]
    pub amount: BigDecimal,
    #[arg(short, long)]
    pub trip: Option<i64>,
    #[arg(short, long, default_value_t = 1)]
    pub plan: i64,
    /// Member adding the bill, defaults to the configured member
    #[arg(long)]
    pub me: Option<String>,
}

pub fn execute_command(config: &Configuration, cmd: &Command) -> anyhow::Result<()> {
    let members = fs::read_to_string(&cmd.members)?;
    let shares = match &cmd.shares {
        Some(path) => fs::read_to_string(path)?,
        None => "[]".to_owned(),
    };

    let allocation = split::compute_shares_json(
        cmd.trip.unwrap_or(config.trip_id),
        cmd.plan,
        &cmd.amount,
        cmd.me.as_deref().unwrap_or(&config.member),
        &members,
        &shares,
    )?;

    serde_json::to_writer_pretty(std::io::stdout(), &allocation)?;
    println!();

    Ok(())
}
