use arcstr::ArcStr;
use std::{
    collections::BTreeMap,
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

/// Identifier of a group member taking part in expenses.
///
/// Ordering is the plain string ordering of the id; every "ascending id"
/// rule in balance calculation and settlement relies on it.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticipantId(ArcStr);

impl ParticipantId {
    pub fn new(id: &str) -> Self {
        Self(ArcStr::from(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Signed amount in currency minor units (e.g. cents).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Self = Self(0);

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn from_i64(value: i64) -> Self {
        Self(value)
    }

    pub fn amount(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn signum(self) -> i64 {
        self.0.signum()
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub fn checked_neg(self) -> Option<Self> {
        self.0.checked_neg().map(Self)
    }

    /// Sums without overflow by widening; `None` when the total does not fit.
    pub fn checked_sum<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        let total: i128 = values.into_iter().map(|money| i128::from(money.0)).sum();
        i64::try_from(total).ok().map(Self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

/// How an expense's amount is divided among its participants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SplitPolicy {
    /// Equal shares among the listed participants, payer included.
    #[default]
    Equal,
}

impl SplitPolicy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "equal" => Some(Self::Equal),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Equal => "equal",
        }
    }
}

/// Unvalidated expense as handed over by the boundary layer.
///
/// Amounts are already in minor units; ids may still carry stray whitespace
/// or duplicates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub expense_id: Option<String>,
    pub payer_id: String,
    pub amount_minor: i64,
    pub participant_ids: Vec<String>,
    /// `None` selects the equal split.
    pub split_policy: Option<String>,
}

impl ExpenseDraft {
    pub fn new<I, S>(payer_id: &str, amount_minor: i64, participant_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            expense_id: None,
            payer_id: payer_id.to_owned(),
            amount_minor,
            participant_ids: participant_ids.into_iter().map(Into::into).collect(),
            split_policy: None,
        }
    }

    pub fn with_expense_id(mut self, expense_id: &str) -> Self {
        self.expense_id = Some(expense_id.to_owned());
        self
    }

    pub fn with_split_policy(mut self, policy: &str) -> Self {
        self.split_policy = Some(policy.to_owned());
        self
    }
}

/// A validated expense.
///
/// Only the ledger validator builds these, so `amount` is positive and
/// `participants` is non-empty, sorted ascending, free of duplicates, and
/// contains the payer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseRecord {
    expense_id: Option<String>,
    payer: ParticipantId,
    amount: Money,
    participants: Vec<ParticipantId>,
    policy: SplitPolicy,
}

impl ExpenseRecord {
    pub(crate) fn new_unchecked(
        expense_id: Option<String>,
        payer: ParticipantId,
        amount: Money,
        participants: Vec<ParticipantId>,
        policy: SplitPolicy,
    ) -> Self {
        debug_assert!(amount.is_positive());
        debug_assert!(participants.windows(2).all(|pair| pair[0] < pair[1]));
        debug_assert!(participants.binary_search(&payer).is_ok());
        Self {
            expense_id,
            payer,
            amount,
            participants,
            policy,
        }
    }

    pub fn expense_id(&self) -> Option<&str> {
        self.expense_id.as_deref()
    }

    pub fn payer(&self) -> &ParticipantId {
        &self.payer
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn participants(&self) -> &[ParticipantId] {
        &self.participants
    }

    pub fn policy(&self) -> SplitPolicy {
        self.policy
    }
}

/// Net position per participant. Positive is owed money, negative owes money.
pub type Balances = BTreeMap<ParticipantId, Money>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Money,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settlement {
    pub balances: Balances,
    pub transfers: Vec<Transfer>,
}

impl Settlement {
    pub fn nonzero_participant_count(&self) -> usize {
        self.balances
            .values()
            .filter(|balance| !balance.is_zero())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::lowercase("equal", Some(SplitPolicy::Equal))]
    #[case::mixed_case_padded("  Equal ", Some(SplitPolicy::Equal))]
    #[case::unequal("shares", None)]
    #[case::empty("", None)]
    fn split_policy_from_name(#[case] name: &str, #[case] expected: Option<SplitPolicy>) {
        assert_eq!(SplitPolicy::from_name(name), expected);
    }

    #[rstest]
    #[case::fits([Money::from_i64(i64::MAX), Money::from_i64(-1)], Some(Money::from_i64(i64::MAX - 1)))]
    #[case::overflows([Money::from_i64(i64::MAX), Money::from_i64(1)], None)]
    #[case::cancels([Money::from_i64(i64::MIN), Money::from_i64(i64::MAX)], Some(Money::from_i64(-1)))]
    fn checked_sum_widens(#[case] values: [Money; 2], #[case] expected: Option<Money>) {
        assert_eq!(Money::checked_sum(values), expected);
    }

    #[test]
    fn participant_ids_order_by_string() {
        let mut ids = vec![
            ParticipantId::new("carol"),
            ParticipantId::new("alice"),
            ParticipantId::new("bob"),
        ];
        ids.sort();
        let names: Vec<&str> = ids.iter().map(ParticipantId::as_str).collect();
        assert_eq!(names, ["alice", "bob", "carol"]);
    }
}
