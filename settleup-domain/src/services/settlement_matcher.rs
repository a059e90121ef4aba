use crate::{
    error::LedgerError,
    model::{Balances, Money, ParticipantId, Transfer},
};
use std::cmp::Reverse;

/// Greedy largest-first debt matching.
///
/// Finding the minimum number of transfers is NP-hard in general. The sweep
/// here settles everything exactly with at most `nonzero - 1` transfers, and
/// its output depends only on the balance values, never on map order.
pub struct SettlementMatcher;

impl SettlementMatcher {
    pub fn match_transfers(&self, balances: &Balances) -> Result<Vec<Transfer>, LedgerError> {
        let total = Money::checked_sum(balances.values().copied()).ok_or_else(|| {
            LedgerError::Overflow {
                participant: largest_magnitude(balances),
            }
        })?;
        if !total.is_zero() {
            tracing::error!(total = total.amount(), "Settlement rejected due to imbalance");
            return Err(LedgerError::ImbalancedTotal(total));
        }

        let mut creditors: Vec<(&ParticipantId, Money)> = Vec::new();
        let mut debtors: Vec<(&ParticipantId, Money)> = Vec::new();
        for (participant, balance) in balances {
            if balance.is_positive() {
                creditors.push((participant, *balance));
            } else if balance.is_negative() {
                let owed = balance.checked_neg().ok_or_else(|| LedgerError::Overflow {
                    participant: participant.clone(),
                })?;
                debtors.push((participant, owed));
            }
        }

        creditors.sort_by(|a, b| (Reverse(a.1), a.0).cmp(&(Reverse(b.1), b.0)));
        debtors.sort_by(|a, b| (Reverse(a.1), a.0).cmp(&(Reverse(b.1), b.0)));

        let mut transfers = Vec::with_capacity((creditors.len() + debtors.len()).saturating_sub(1));
        let mut ci = 0;
        let mut di = 0;
        while ci < creditors.len() && di < debtors.len() {
            let (creditor, credit) = &mut creditors[ci];
            let (debtor, debt) = &mut debtors[di];
            let amount = (*credit).min(*debt);

            transfers.push(Transfer {
                from: (*debtor).clone(),
                to: (*creditor).clone(),
                amount,
            });
            *credit -= amount;
            *debt -= amount;

            if credit.is_zero() {
                ci += 1;
            }
            if debt.is_zero() {
                di += 1;
            }
        }

        debug_assert!(ci == creditors.len() && di == debtors.len());
        tracing::debug!(
            creditor_count = creditors.len(),
            debtor_count = debtors.len(),
            transfer_count = transfers.len(),
            "Settlement transfers matched"
        );

        Ok(transfers)
    }
}

/// Balances after every transfer in `transfers` has been paid.
pub fn apply_transfers(
    balances: &Balances,
    transfers: &[Transfer],
) -> Result<Balances, LedgerError> {
    let mut remaining = balances.clone();
    for transfer in transfers {
        shift(&mut remaining, &transfer.from, transfer.amount, Money::checked_add)?;
        shift(&mut remaining, &transfer.to, transfer.amount, Money::checked_sub)?;
    }
    Ok(remaining)
}

fn shift(
    balances: &mut Balances,
    participant: &ParticipantId,
    amount: Money,
    op: fn(Money, Money) -> Option<Money>,
) -> Result<(), LedgerError> {
    let entry = balances.entry(participant.clone()).or_insert(Money::ZERO);
    *entry = op(*entry, amount).ok_or_else(|| LedgerError::Overflow {
        participant: participant.clone(),
    })?;
    Ok(())
}

fn largest_magnitude(balances: &Balances) -> ParticipantId {
    balances
        .iter()
        .max_by_key(|(_, balance)| balance.amount().unsigned_abs())
        .map(|(participant, _)| participant.clone())
        .unwrap_or_else(|| ParticipantId::new(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn matcher() -> SettlementMatcher {
        SettlementMatcher
    }

    fn balances(entries: &[(&str, i64)]) -> Balances {
        entries
            .iter()
            .map(|(id, amount)| (ParticipantId::new(id), Money::from_i64(*amount)))
            .collect()
    }

    fn as_triples(transfers: &[Transfer]) -> Vec<(&str, &str, i64)> {
        transfers
            .iter()
            .map(|t| (t.from.as_str(), t.to.as_str(), t.amount.amount()))
            .collect()
    }

    #[rstest]
    #[case::one_creditor_two_debtors(
        &[("A", 6666), ("B", -3333), ("C", -3333)],
        &[("B", "A", 3333), ("C", "A", 3333)]
    )]
    #[case::zero_balance_excluded(
        &[("A", 0), ("B", 500), ("C", -500)],
        &[("C", "B", 500)]
    )]
    #[case::largest_first_sweep(
        &[("A", 300), ("B", 200), ("C", -100), ("D", -400)],
        &[("D", "A", 300), ("D", "B", 100), ("C", "B", 100)]
    )]
    #[case::equal_amounts_advance_both(
        &[("a", 100), ("b", -100), ("c", 50), ("d", -50)],
        &[("b", "a", 100), ("d", "c", 50)]
    )]
    #[case::ties_break_by_ascending_id(
        &[("z", 100), ("y", 100), ("b", -100), ("a", -100)],
        &[("a", "y", 100), ("b", "z", 100)]
    )]
    #[case::all_zero(&[("a", 0), ("b", 0)], &[])]
    #[case::empty(&[], &[])]
    fn matches_largest_first(
        matcher: SettlementMatcher,
        #[case] input: &[(&str, i64)],
        #[case] expected: &[(&str, &str, i64)],
    ) {
        let balances = balances(input);

        let transfers = matcher
            .match_transfers(&balances)
            .expect("matching should succeed");

        assert_eq!(as_triples(&transfers), expected);
        assert!(
            apply_transfers(&balances, &transfers)
                .expect("transfers stay in range")
                .values()
                .all(|balance| balance.is_zero())
        );
    }

    #[rstest]
    fn rejects_imbalanced_input(matcher: SettlementMatcher) {
        let err = matcher
            .match_transfers(&balances(&[("a", 100), ("b", -90)]))
            .expect_err("imbalanced balances should be rejected");

        assert_eq!(err, LedgerError::ImbalancedTotal(Money::from_i64(10)));
    }

    #[rstest]
    fn rejects_unrepresentable_debt(matcher: SettlementMatcher) {
        let input = Balances::from_iter([
            (ParticipantId::new("a"), Money::from_i64(i64::MAX)),
            (ParticipantId::new("b"), Money::from_i64(1)),
            (ParticipantId::new("c"), Money::from_i64(i64::MIN)),
        ]);

        let err = matcher
            .match_transfers(&input)
            .expect_err("i64::MIN cannot be negated");

        assert_eq!(
            err,
            LedgerError::Overflow {
                participant: ParticipantId::new("c"),
            }
        );
    }

    #[test]
    fn apply_transfers_moves_money_toward_zero() {
        let input = balances(&[("a", 50), ("b", -50)]);
        let transfers = [Transfer {
            from: ParticipantId::new("b"),
            to: ParticipantId::new("a"),
            amount: Money::from_i64(20),
        }];

        let remaining = apply_transfers(&input, &transfers).expect("transfers stay in range");

        assert_eq!(remaining, balances(&[("a", 30), ("b", -30)]));
    }

    #[test]
    fn apply_transfers_reports_overflow() {
        let input = balances(&[("a", i64::MAX), ("b", -1)]);
        let transfers = [Transfer {
            from: ParticipantId::new("a"),
            to: ParticipantId::new("b"),
            amount: Money::from_i64(1),
        }];

        let err = apply_transfers(&input, &transfers).expect_err("balance of a overflows");

        assert_eq!(
            err,
            LedgerError::Overflow {
                participant: ParticipantId::new("a"),
            }
        );
    }
}
