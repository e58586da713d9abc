use chrono::Utc;
use clap::Args;
use colored::Colorize;
use std::str::FromStr;
use thiserror::Error;
use tracing::*;

use crate::{
    config::Configuration,
    model::*,
    prompt,
    store::{StoreError, StoredShare, Transaction, TripStore},
};

#[derive(Debug, Args)]
pub struct Command {
    /// Name of the transaction (required)
    #[arg(short, long, default_value = "")]
    pub name: String,
    /// Comma separated names, eg. gus,walt,jesse (required)
    #[arg(short, long, default_value = "")]
    pub members: String,
    /// Comma separated shares in the same order as the members, or blank to share equally
    #[arg(short, long, default_value = "")]
    pub share: String,
    /// Total expense, split equally when no shares are given
    #[arg(short, long, default_value = "")]
    pub expense: String,
    /// Who paid, defaults to the configured member
    #[arg(short, long)]
    pub paid_by: Option<String>,
    /// Delete everything
    #[arg(short, long)]
    pub delete: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlagError {
    #[error("Please give the transaction name")]
    MissingName,
    #[error("Please give at least one member name")]
    MissingMembers,
    #[error("Please provide either share or total expense.")]
    MissingAmount,
    #[error("Please enter valid expense")]
    InvalidExpense,
    #[error("Given members and their shares are not matching")]
    ShareCountMismatch,
    #[error("Please enter share amount")]
    InvalidShare,
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| item.to_owned())
        .collect()
}

/// Equal parts in cents, the last member takes whatever rounding left over.
fn split_expense(expense: &BigDecimal, count: usize) -> Vec<BigDecimal> {
    let each = round_two(&(expense.clone() / BigDecimal::from(count as i64)));
    let last = expense.clone() - each.clone() * BigDecimal::from(count as i64 - 1);
    let mut amounts = vec![each; count - 1];
    amounts.push(last);
    amounts
}

impl Command {
    pub fn to_transaction(&self, default_payer: &str) -> Result<Transaction, FlagError> {
        if self.name.trim().is_empty() {
            return Err(FlagError::MissingName);
        }

        let members = split_list(&self.members);
        if members.is_empty() {
            return Err(FlagError::MissingMembers);
        }

        let shares = split_list(&self.share);
        let amounts: Vec<BigDecimal> = if shares.is_empty() {
            if self.expense.trim().is_empty() {
                return Err(FlagError::MissingAmount);
            }
            let expense = BigDecimal::from_str(self.expense.trim())
                .map_err(|_| FlagError::InvalidExpense)?;
            split_expense(&expense, members.len())
        } else {
            if shares.len() != members.len() {
                return Err(FlagError::ShareCountMismatch);
            }
            shares
                .iter()
                .map(|s| BigDecimal::from_str(s).map_err(|_| FlagError::InvalidShare))
                .collect::<Result<_, _>>()?
        };

        let paid_by = self
            .paid_by
            .clone()
            .or_else(|| Some(default_payer.to_owned()))
            .filter(|payer| !payer.is_empty());

        let shares = members
            .into_iter()
            .zip(amounts)
            .map(|(member, amount)| StoredShare { member, amount })
            .collect_vec();

        Ok(Transaction {
            name: self.name.trim().to_owned(),
            amount: shares.iter().map(|s| s.amount.clone()).sum(),
            paid_by,
            shares,
        })
    }
}

pub fn execute_command(config: &Configuration, cmd: &Command) -> anyhow::Result<()> {
    if cmd.delete {
        if prompt::confirm("Do you really want to delete everything? (yes/no)")? {
            let store = TripStore::open(&config.database)?;
            if !store.delete_bucket(&config.bucket)? {
                warn!("nothing stored under {}", config.bucket);
            }
        }
        return Ok(());
    }

    let transaction = match cmd.to_transaction(&config.member) {
        Ok(transaction) => transaction,
        Err(e) => {
            println!("{}", e.to_string().red());
            return Ok(());
        }
    };

    let store = TripStore::open(&config.database)?;
    match store.add_transaction(&config.bucket, transaction, Utc::now().date_naive()) {
        Ok(_) => {
            println!("{}", "success".green());
            Ok(())
        }
        Err(e @ StoreError::DuplicateTransaction(_)) => {
            println!("{}", e.to_string().red());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
