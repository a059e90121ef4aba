use rstest::{fixture, rstest};
use rust_decimal::Decimal;
use settleup_application::{
    AmountConversionError, AmountInput, CurrencyContext, ExpenseRepository, GroupId,
    PersonBalance, RawExpense, RepositoryError, SettlementService, SettlementServiceError,
};
use settleup_domain::{LedgerError, Money, ParticipantId, ViolationKind};
use settleup_infrastructure::InMemoryExpenseRepository;

struct Harness {
    repository: InMemoryExpenseRepository,
    currency: CurrencyContext,
    group: GroupId,
}

impl Harness {
    fn service(&self) -> SettlementService<'_> {
        SettlementService::new(&self.repository, &self.currency)
    }
}

#[fixture]
fn harness() -> Harness {
    let repository = InMemoryExpenseRepository::new();
    let group = GroupId::new("trip");
    repository
        .create_group(&group)
        .expect("group should be created");
    Harness {
        repository,
        currency: CurrencyContext::cents(),
        group,
    }
}

fn minor(payer: &str, amount: i64, participants: &[&str]) -> RawExpense {
    RawExpense::new(payer, AmountInput::Minor(amount), participants.iter().copied())
}

fn decimal(payer: &str, amount: &str, participants: &[&str]) -> RawExpense {
    let amount: Decimal = amount.parse().expect("decimal literal");
    RawExpense::new(payer, AmountInput::Decimal(amount), participants.iter().copied())
}

fn balance_pairs(balances: &[PersonBalance]) -> Vec<(&str, i64)> {
    balances
        .iter()
        .map(|person| (person.id.as_str(), person.balance.amount()))
        .collect()
}

#[rstest]
fn settles_recorded_expenses(harness: Harness) {
    let service = harness.service();
    service
        .record_expense(&harness.group, decimal("A", "100.00", &["A", "B", "C"]))
        .expect("expense should be recorded");

    let result = service
        .settle_group(&harness.group)
        .expect("group should settle");

    assert_eq!(result.group, harness.group);
    assert_eq!(
        balance_pairs(&result.balances),
        [("A", 6666), ("B", -3333), ("C", -3333)]
    );
    let transfers: Vec<(&str, &str, i64)> = result
        .transfers
        .iter()
        .map(|t| (t.from.as_str(), t.to.as_str(), t.amount.amount()))
        .collect();
    assert_eq!(transfers, [("B", "A", 3333), ("C", "A", 3333)]);
}

#[rstest]
fn empty_group_settles_to_nothing(harness: Harness) {
    let result = harness
        .service()
        .settle_group(&harness.group)
        .expect("empty group should settle");

    assert!(result.balances.is_empty());
    assert!(result.transfers.is_empty());
}

#[rstest]
fn rejected_expense_is_not_stored(harness: Harness) {
    let service = harness.service();

    let err = service
        .record_expense(&harness.group, minor("A", 0, &["A", "B"]).with_expense_id("x1"))
        .expect_err("zero amount should be rejected");

    let SettlementServiceError::Ledger(LedgerError::InvalidRecords(violations)) = &err else {
        panic!("unexpected error: {err:?}");
    };
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].expense_id.as_deref(), Some("x1"));
    assert_eq!(
        violations[0].kinds,
        [ViolationKind::NonPositiveAmount { amount: 0 }]
    );
    assert_eq!(harness.repository.expense_count(&harness.group), Some(0));
}

#[rstest]
fn unconvertible_amount_is_reported_with_index(harness: Harness) {
    let expenses = [
        minor("A", 1000, &["A", "B"]),
        decimal("B", "3.333", &["A", "B"]),
    ];

    let err = harness
        .service()
        .settle_expenses(&harness.group, &expenses)
        .expect_err("sub-cent amount should be rejected");

    assert_eq!(
        err,
        SettlementServiceError::Amount {
            index: 1,
            source: AmountConversionError::NonIntegral,
        }
    );
}

#[rstest]
fn unknown_group_is_reported(harness: Harness) {
    let missing = GroupId::new("missing");

    let err = harness
        .service()
        .settle_group(&missing)
        .expect_err("unknown group should fail");

    assert_eq!(
        err,
        SettlementServiceError::Repository(RepositoryError::GroupNotFound(missing))
    );
}

#[rstest]
fn settlement_reflects_latest_snapshot(harness: Harness) {
    let service = harness.service();
    service
        .record_expense(&harness.group, minor("A", 500, &["A", "B"]))
        .expect("expense should be recorded");
    let before = service
        .settle_group(&harness.group)
        .expect("group should settle");

    harness
        .repository
        .append(&harness.group, minor("B", 500, &["A", "B"]))
        .expect("append should succeed");
    let after = service
        .settle_group(&harness.group)
        .expect("group should settle");

    assert_eq!(before.transfers.len(), 1);
    assert!(after.transfers.is_empty());
    assert!(after.balances.iter().all(|person| person.balance == Money::ZERO));
}

#[test]
fn yen_amounts_have_no_minor_digits() {
    let repository = InMemoryExpenseRepository::new();
    let group = GroupId::new("tokyo");
    repository.create_group(&group).expect("group should be created");
    let currency = CurrencyContext::new(0, "¥").expect("scale is supported");
    let service = SettlementService::new(&repository, &currency);

    service
        .record_expense(&group, decimal("A", "1000", &["A", "B", "C"]))
        .expect("expense should be recorded");
    let result = service.settle_group(&group).expect("group should settle");

    assert_eq!(
        balance_pairs(&result.balances),
        [("A", 666), ("B", -333), ("C", -333)]
    );
    assert_eq!(
        result
            .balances
            .iter()
            .find(|person| person.id == ParticipantId::new("A"))
            .map(|person| currency.display(person.balance)),
        Some("¥666".to_owned())
    );
}

#[rstest]
fn batch_reports_every_invalid_expense_and_stores_none(harness: Harness) {
    let expenses = vec![
        minor("a", 0, &["a", "b"]).with_expense_id("line 1"),
        minor("b", 500, &["a", "b"]).with_expense_id("line 2"),
        minor("c", 0, &["c", "a"]).with_expense_id("line 3"),
    ];

    let err = harness
        .service()
        .record_expenses(&harness.group, expenses)
        .expect_err("batch should be rejected");

    let SettlementServiceError::Ledger(LedgerError::InvalidRecords(violations)) = &err else {
        panic!("unexpected error: {err:?}");
    };
    let reported: Vec<(usize, Option<&str>)> = violations
        .iter()
        .map(|violation| (violation.index, violation.expense_id.as_deref()))
        .collect();
    assert_eq!(reported, [(0, Some("line 1")), (2, Some("line 3"))]);
    assert_eq!(harness.repository.expense_count(&harness.group), Some(0));
}

#[rstest]
fn valid_batch_is_appended_in_order(harness: Harness) {
    let expenses = vec![
        minor("a", 300, &["a", "b"]),
        decimal("b", "1.00", &["a", "b"]),
    ];

    harness
        .service()
        .record_expenses(&harness.group, expenses.clone())
        .expect("batch should be recorded");

    assert_eq!(harness.repository.snapshot(&harness.group), Ok(expenses));
}
