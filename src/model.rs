use bigdecimal::RoundingMode;
use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;

pub use anyhow::Result;
pub use bigdecimal::{BigDecimal, Signed, Zero};
pub use itertools::Itertools;

/// What a suggestion (or a whole plan, from one member's point of view) means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Operation {
    #[default]
    NotInvolved,
    Settled,
    GetsBack,
    /// Reserved, never produced.
    Owe,
    Paid,
    Both,
}

#[derive(Debug, Error)]
#[error("Unknown operation code: {0}")]
pub struct UnknownOperation(pub i8);

impl Operation {
    pub fn code(self) -> i8 {
        match self {
            Operation::NotInvolved => -1,
            Operation::Settled => 0,
            Operation::GetsBack => 1,
            Operation::Owe => 2,
            Operation::Paid => 3,
            Operation::Both => 4,
        }
    }
}

impl From<Operation> for i8 {
    fn from(value: Operation) -> Self {
        value.code()
    }
}

impl TryFrom<i8> for Operation {
    type Error = UnknownOperation;

    fn try_from(value: i8) -> std::result::Result<Self, Self::Error> {
        match value {
            -1 => Ok(Operation::NotInvolved),
            0 => Ok(Operation::Settled),
            1 => Ok(Operation::GetsBack),
            2 => Ok(Operation::Owe),
            3 => Ok(Operation::Paid),
            4 => Ok(Operation::Both),
            other => Err(UnknownOperation(other)),
        }
    }
}

/// Only `email` is required when decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(default)]
    pub trip_id: i64,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub updated: i64,
}

impl Member {
    pub fn new(trip_id: i64, name: &str, email: &str) -> Self {
        Self {
            trip_id,
            name: name.to_owned(),
            email: email.to_owned(),
            ..Default::default()
        }
    }
}

pub fn find_member<'a>(members: &'a [Member], email: &str) -> Option<&'a Member> {
    members.iter().find(|m| m.email == email)
}

/// One member's position within a plan, or across a trip when `plan_id` is zero.
///
/// Only `member_email` is required when decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Share {
    /// Zero until the share has been persisted.
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub trip_id: i64,
    #[serde(default)]
    pub plan_id: i64,
    pub member_email: String,
    #[serde(default)]
    pub member_name: String,
    #[serde(default)]
    pub member_avatar: String,
    /// Who the payment was made for. Empty means the member paid for themselves.
    #[serde(default)]
    pub benefactor_email: String,
    #[serde(default)]
    pub note: String,
    #[serde(default, deserialize_with = "decimal_from_json")]
    pub paid: BigDecimal,
    #[serde(default, deserialize_with = "decimal_from_json")]
    pub share: BigDecimal,
    #[serde(skip)]
    pub diff: BigDecimal,
    #[serde(default)]
    pub auto: bool,
    #[serde(default)]
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub updated: i64,
}

impl Share {
    /// A zeroed share for a roster member that has no record in the plan yet.
    pub fn fresh(trip_id: i64, plan_id: i64, member: &Member, auto: bool) -> Self {
        Self {
            trip_id,
            plan_id,
            member_email: member.email.clone(),
            member_name: member.name.clone(),
            member_avatar: member.avatar.clone(),
            benefactor_email: member.email.clone(),
            auto,
            ..Default::default()
        }
    }

    pub fn benefactor(&self) -> &str {
        if self.benefactor_email.is_empty() {
            &self.member_email
        } else {
            &self.benefactor_email
        }
    }

    pub fn pays_for_other(&self) -> bool {
        self.benefactor() != self.member_email
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Suggestion {
    pub a_member_email: String,
    pub a_member_name: String,
    pub a_member_avatar: String,
    pub b_member_email: String,
    pub b_member_name: String,
    pub b_member_avatar: String,
    #[serde(deserialize_with = "decimal_from_json")]
    pub amount: BigDecimal,
    pub operation: Operation,
    pub date: Option<String>,
}

pub const THE_BILL: &str = "the bill";

impl Suggestion {
    /// `creditor` gets `amount` back from `debtor`.
    pub fn transfer(amount: BigDecimal, creditor: &Share, debtor: &Share) -> Self {
        let operation = if is_tallied(&amount) {
            Operation::Settled
        } else {
            Operation::GetsBack
        };

        Self {
            a_member_email: creditor.member_email.clone(),
            a_member_name: creditor.member_name.clone(),
            a_member_avatar: creditor.member_avatar.clone(),
            b_member_email: debtor.member_email.clone(),
            b_member_name: debtor.member_name.clone(),
            b_member_avatar: debtor.member_avatar.clone(),
            amount,
            operation,
            date: None,
        }
    }

    /// `payer` paid towards the bill, either for themselves or for `benefactor`.
    pub fn paid(payer: &Share, benefactor: Option<&Member>) -> Self {
        let (b_member_email, b_member_name, b_member_avatar) = if payer.pays_for_other() {
            (
                payer.benefactor().to_owned(),
                benefactor.map(|m| m.name.clone()).unwrap_or_default(),
                benefactor.map(|m| m.avatar.clone()).unwrap_or_default(),
            )
        } else {
            (String::new(), THE_BILL.to_owned(), String::new())
        };

        Self {
            a_member_email: payer.member_email.clone(),
            a_member_name: payer.member_name.clone(),
            a_member_avatar: payer.member_avatar.clone(),
            b_member_email,
            b_member_name,
            b_member_avatar,
            amount: payer.paid.clone(),
            operation: Operation::Paid,
            date: Some(format_time_small(&payer.created)),
        }
    }
}

/// Suggestions for one plan, or for the whole trip when `plan_id` is zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanSuggestion {
    pub trip_id: i64,
    pub plan_id: i64,
    pub notes: String,
    pub brief: String,
    pub date: String,
    #[serde(deserialize_with = "decimal_from_json")]
    pub amount: BigDecimal,
    pub operation: Operation,
    pub suggestions: Vec<Suggestion>,
}

/// Amounts arrive as JSON numbers or strings. Numbers are read back from their printed
/// form so `0.1` stays `0.1` instead of the nearest binary double.
fn decimal_from_json<'de, D>(deserializer: D) -> std::result::Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Value::deserialize(deserializer)? {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text,
        other => {
            return Err(de::Error::custom(format!(
                "expected a decimal amount, found {}",
                other
            )))
        }
    };
    BigDecimal::from_str(text.trim()).map_err(de::Error::custom)
}

/// Rounds to two decimals, ties away from zero.
pub fn round_two(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(2, RoundingMode::HalfUp)
}

pub fn is_tallied(value: &BigDecimal) -> bool {
    round_two(value).is_zero()
}

pub fn format_money(value: &BigDecimal) -> String {
    format!("{}", round_two(value).with_scale(2))
}

pub fn format_time_small(time: &DateTime<Utc>) -> String {
    time.format("%b %-d %-I:%M%p").to_string()
}

pub fn format_time_month(time: &DateTime<Utc>) -> String {
    time.format("%b %-d %Y").to_string()
}

#[cfg(test)]
pub(crate) fn dec(value: &str) -> BigDecimal {
    BigDecimal::from_str(value).expect("Malformed decimal")
}
