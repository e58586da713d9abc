use anyhow::anyhow;
use clap::Args;
use colored::Colorize;
use std::{fs, path::PathBuf};

use crate::{model::*, split};

#[derive(Debug, Args)]
pub struct Command {
    /// JSON file with the plan's shares
    #[arg(short, long, value_name = "FILE")]
    pub shares: PathBuf,
    /// Bill amount
    #[arg(short, long)]
    pub amount: BigDecimal,
}

pub fn execute_command(cmd: &Command) -> anyhow::Result<()> {
    let shares = fs::read_to_string(&cmd.shares)?;

    match split::validate_shares_json(&shares, &cmd.amount)? {
        (true, _) => {
            println!("{}", "OK".green());
            Ok(())
        }
        (false, message) => Err(anyhow!(message)),
    }
}
