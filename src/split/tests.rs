use super::*;
use chrono::TimeZone;
use proptest::prelude::*;
use std::collections::HashMap;

fn roster(emails: &[&str]) -> Vec<Member> {
    emails
        .iter()
        .map(|email| Member::new(1, &email.to_uppercase(), email))
        .collect()
}

fn record(id: i64, plan_id: i64, email: &str, paid: i64, share: i64, auto: bool) -> Share {
    Share {
        id,
        trip_id: 1,
        plan_id,
        member_email: email.into(),
        benefactor_email: email.into(),
        paid: BigDecimal::from(paid),
        share: BigDecimal::from(share),
        auto,
        ..Default::default()
    }
}

fn created() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 18, 45, 0).unwrap()
}

#[test]
fn test_compute_shares_equal_split() {
    let members = roster(&["a", "b", "c"]);

    let allocation = compute_shares(1, 5, &BigDecimal::from(300), "nobody", &members, &[]);

    assert_eq!(allocation.shares.len(), 3);
    assert!(allocation
        .shares
        .iter()
        .all(|s| round_two(&s.share) == dec("100.00") && s.auto && s.plan_id == 5));
    assert_eq!(allocation.mean_share, BigDecimal::from(100));
    assert!(allocation.is_equally_split);
}

#[test]
fn test_compute_shares_manual_override() {
    let members = roster(&["a", "b", "c"]);
    let shares = vec![
        record(1, 5, "a", 0, 150, false),
        record(2, 5, "b", 0, 0, true),
        record(3, 5, "c", 0, 0, true),
    ];

    let allocation = compute_shares(1, 5, &BigDecimal::from(300), "nobody", &members, &shares);

    assert_eq!(round_two(&allocation.mean_share), dec("75.00"));
    assert_eq!(allocation.shares[1].share, BigDecimal::from(75));
    assert_eq!(allocation.shares[2].share, BigDecimal::from(75));
    assert!(!allocation.is_equally_split);
}

#[test]
fn test_compute_shares_late_member_not_pulled_into_edited_plan() {
    let members = roster(&["a", "b", "late"]);
    let shares = vec![record(1, 5, "a", 100, 0, true), record(2, 5, "b", 0, 0, true)];

    let allocation = compute_shares(1, 5, &BigDecimal::from(100), "a", &members, &shares);

    let late = &allocation.shares[2];
    assert_eq!(late.member_email, "late");
    assert!(!late.auto);
    assert!(late.share.is_zero());
    assert_eq!(allocation.shares[0].share, BigDecimal::from(50));
    assert_eq!(allocation.shares[0].member_name, "A");
}

#[test]
fn test_compute_shares_only_caller_defaults_to_payer() {
    let members = roster(&["me", "b", "c"]);

    let allocation = compute_shares(1, 5, &BigDecimal::from(90), "me", &members, &[]);

    assert_eq!(allocation.shares[0].paid, BigDecimal::from(90));
    assert!(allocation.shares[1].paid.is_zero());
    assert!(allocation.shares[2].paid.is_zero());
    assert_eq!(
        validate_shares(&allocation.shares, &BigDecimal::from(90)),
        (true, String::new())
    );
}

#[test]
fn test_validate_shares_message() {
    let shares = vec![record(1, 5, "a", 290, 150, false), record(2, 5, "b", 0, 150, false)];

    assert_eq!(
        validate_shares(&shares, &BigDecimal::from(300)),
        (
            false,
            "Total amount paid less than the bill amount".to_owned()
        )
    );
}

#[test]
fn test_individual_suggestion_settlement_example() {
    let members = roster(&["a", "b", "c"]);
    let shares = vec![
        record(1, 5, "a", 300, 0, false),
        record(2, 5, "b", 0, 200, false),
        record(3, 5, "c", 0, 100, false),
    ];

    let plan = compute_individual_suggestion(
        1,
        5,
        &BigDecimal::from(300),
        "Dinner",
        &created(),
        &members,
        "a",
        &shares,
    );

    assert_eq!(plan.notes, "Dinner");
    assert_eq!(plan.date, "Jun 1 2024");
    assert_eq!(plan.suggestions.len(), 3);
    assert_eq!(plan.suggestions[0].operation, Operation::Paid);
    assert_eq!(plan.suggestions[0].b_member_name, THE_BILL);
    let transfers = plan.suggestions[1..]
        .iter()
        .map(|s| (s.a_member_email.as_str(), s.b_member_email.as_str(), s.amount.clone()))
        .collect_vec();
    assert_eq!(
        transfers,
        vec![
            ("a", "b", BigDecimal::from(200)),
            ("a", "c", BigDecimal::from(100)),
        ]
    );
    assert_eq!(plan.brief, "You gets back 300.00 from B and C.");
    assert_eq!(plan.operation, Operation::GetsBack);
}

#[test]
fn test_individual_suggestion_benefactor_example() {
    let members = roster(&["x", "y"]);
    let mut for_y = record(1, 5, "x", 50, 0, false);
    for_y.benefactor_email = "y".into();

    let plan = compute_individual_suggestion(
        1,
        5,
        &BigDecimal::from(50),
        "Tickets",
        &created(),
        &members,
        "y",
        &[for_y],
    );

    assert_eq!(plan.suggestions.len(), 2);
    let paid = &plan.suggestions[0];
    assert_eq!(paid.operation, Operation::Paid);
    assert_eq!(paid.a_member_email, "x");
    assert_eq!(paid.b_member_email, "y");
    assert_eq!(paid.b_member_name, "Y");
    assert_eq!(paid.amount, BigDecimal::from(50));

    let transfer = &plan.suggestions[1];
    assert_eq!(transfer.operation, Operation::GetsBack);
    assert_eq!(transfer.a_member_email, "x");
    assert_eq!(transfer.b_member_email, "y");
    assert_eq!(transfer.amount, BigDecimal::from(50));

    assert_eq!(plan.brief, "You have to give 50.00 to X.");
    assert_eq!(plan.operation, Operation::Paid);
}

#[test]
fn test_individual_suggestion_without_amount_is_empty() {
    let members = roster(&["a", "b"]);
    let shares = vec![record(1, 5, "a", 10, 0, false)];

    let plan = compute_individual_suggestion(
        1,
        5,
        &BigDecimal::zero(),
        "Nothing",
        &created(),
        &members,
        "a",
        &shares,
    );

    assert!(plan.suggestions.is_empty());
    assert_eq!(plan.operation, Operation::NotInvolved);
    assert_eq!(plan.brief, "");
    assert_eq!(plan.date, "Jun 1 2024");
}

#[test]
fn test_total_suggestion_folds_plans() {
    let members = roster(&["a", "b", "c"]);
    let shares = vec![
        record(1, 1, "a", 90, 30, false),
        record(2, 1, "b", 0, 30, false),
        record(3, 1, "c", 0, 30, false),
        record(4, 2, "b", 60, 30, false),
        record(5, 2, "a", 0, 30, false),
    ];

    let plan = compute_total_suggestion(1, &BigDecimal::from(150), &members, "c", &shares);

    assert_eq!(plan.plan_id, 0);
    assert_eq!(plan.notes, "Total");
    assert_eq!(plan.date, "--");
    assert_eq!(plan.suggestions.len(), 1);
    assert_eq!(plan.suggestions[0].a_member_email, "a");
    assert_eq!(plan.suggestions[0].b_member_email, "c");
    assert_eq!(plan.suggestions[0].amount, BigDecimal::from(30));
    assert_eq!(plan.brief, "You have to give 30.00 to A.");
}

#[test]
fn test_total_suggestion_settled_member() {
    let members = roster(&["a", "b", "c"]);
    let shares = vec![
        record(1, 1, "a", 20, 10, false),
        record(2, 1, "b", 0, 10, false),
    ];

    let plan = compute_total_suggestion(1, &BigDecimal::from(20), &members, "c", &shares);

    assert_eq!(plan.suggestions.len(), 1);
    assert_eq!(plan.brief, "Settled");
    assert_eq!(plan.operation, Operation::Settled);
}

#[test]
fn test_json_entry_points() -> anyhow::Result<()> {
    let members = r#"[{"name": "Ann", "email": "a"}, {"name": "Bob", "email": "b"}]"#;
    let shares = r#"[{"id": 1, "plan_id": 5, "member_email": "a", "paid": 40, "share": 20},
                     {"id": 2, "plan_id": 5, "member_email": "b", "share": 20}]"#;

    let allocation = compute_shares_json(1, 5, &BigDecimal::from(40), "a", members, "[]")?;
    assert_eq!(allocation.shares.len(), 2);
    assert!(allocation.is_equally_split);

    assert_eq!(
        validate_shares_json(shares, &BigDecimal::from(40))?,
        (true, String::new())
    );

    let plan = compute_individual_suggestion_json(
        1,
        5,
        &BigDecimal::from(40),
        "Lunch",
        &created(),
        members,
        "b",
        shares,
    )?;
    assert_eq!(plan.brief, "You have to give 20.00 to Ann.");

    let total = compute_total_suggestion_json(1, &BigDecimal::from(40), members, "a", shares)?;
    assert_eq!(total.operation, Operation::GetsBack);

    Ok(())
}

#[test]
fn test_json_decode_failure_is_distinct_from_no_suggestions() {
    let result = compute_total_suggestion_json(1, &BigDecimal::from(10), "{not json", "a", "[]");
    assert!(matches!(
        result,
        Err(SplitError::InvalidInput { what: "members", .. })
    ));

    let result = validate_shares_json(
        r#"[{"member_email": "a", "paid": "abc"}]"#,
        &BigDecimal::from(10),
    );
    assert!(matches!(
        result,
        Err(SplitError::InvalidInput { what: "shares", .. })
    ));
}

#[test]
fn test_json_with_wrong_keys_is_rejected() {
    let members = r#"[{"name": "Ann", "email": "a"}]"#;
    let shares = r#"[{"Memberemail": "a", "Paid": 40, "Share": 40}]"#;

    let result = compute_total_suggestion_json(1, &BigDecimal::from(40), members, "a", shares);
    assert!(matches!(
        result,
        Err(SplitError::InvalidInput { what: "shares", .. })
    ));

    let result = validate_shares_json(r#"[{"bogus": 1}]"#, &BigDecimal::zero());
    assert!(matches!(
        result,
        Err(SplitError::InvalidInput { what: "shares", .. })
    ));

    let result = compute_shares_json(1, 5, &BigDecimal::from(40), "a", r#"[{"mail": "a"}]"#, "[]");
    assert!(matches!(
        result,
        Err(SplitError::InvalidInput { what: "members", .. })
    ));
}

#[test]
fn test_json_amounts_keep_their_decimal_text() -> anyhow::Result<()> {
    let members = r#"[{"name": "Ann", "email": "a"}]"#;
    let shares = r#"[{"id": 1, "plan_id": 5, "member_email": "a", "paid": 0.1}]"#;

    let allocation = compute_shares_json(1, 5, &dec("0.1"), "a", members, shares)?;
    assert_eq!(allocation.shares[0].paid.to_string(), "0.1");

    let json = serde_json::to_value(&allocation)?;
    assert_eq!(json["shares"][0]["paid"], "0.1");

    Ok(())
}

fn cents(value: i64) -> BigDecimal {
    BigDecimal::new(value.into(), 2)
}

proptest! {
    #[test]
    fn reconciled_balances_settle_to_zero(
        member_count in 1usize..=7,
        paid in prop::collection::vec(0i64..=100_000, 7),
        share in prop::collection::vec(0i64..=100_000, 7),
    ) {
        let paid = &paid[..member_count];
        let mut share = share[..member_count].to_vec();
        let total_paid: i64 = paid.iter().sum();
        let total_share: i64 = share.iter().sum();
        share[member_count - 1] += total_paid - total_share;

        let emails = (0..member_count).map(|i| format!("m{}@trip", i)).collect_vec();
        let members = emails
            .iter()
            .map(|email| Member::new(1, email, email))
            .collect_vec();
        let shares = emails
            .iter()
            .enumerate()
            .map(|(i, email)| Share {
                id: i as i64 + 1,
                plan_id: 1,
                member_email: email.clone(),
                paid: cents(paid[i]),
                share: cents(share[i]),
                ..Default::default()
            })
            .collect_vec();

        let bill = cents(total_paid);
        prop_assert!(validate_shares(&shares, &bill).0);

        let plan = compute_total_suggestion(1, &bill, &members, "m0@trip", &shares);
        prop_assert!(plan.suggestions.len() < member_count.max(1));

        let mut balances: HashMap<&str, BigDecimal> = shares
            .iter()
            .map(|s| (s.member_email.as_str(), &s.paid - &s.share))
            .collect();
        for suggestion in plan.suggestions.iter() {
            prop_assert!(suggestion.amount.is_positive());
            let creditor = balances.get_mut(suggestion.a_member_email.as_str()).unwrap();
            *creditor -= &suggestion.amount;
            prop_assert!(!creditor.is_negative() || is_tallied(creditor));
            let debtor = balances.get_mut(suggestion.b_member_email.as_str()).unwrap();
            *debtor += &suggestion.amount;
            prop_assert!(!debtor.is_positive() || is_tallied(debtor));
        }
        for balance in balances.values() {
            prop_assert!(is_tallied(balance));
        }
    }
}
