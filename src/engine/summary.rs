use crate::model::{round2, Transaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The totals shown above the transaction list.
///
/// All three values are rounded to 2 decimal places. `expense` is a positive number.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub balance: Decimal,
    pub income: Decimal,
    pub expense: Decimal,
}

/// Computes balance, income and expense totals.
///
/// An empty input gives zeros. `balance == income - expense` holds for every input.
pub fn compute_summary<'a, I>(transactions: I) -> Summary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let (income, expense) = transactions.into_iter().map(|t| t.amount().value()).fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(income, expense), amount| {
            if amount > Decimal::ZERO {
                (income + amount, expense)
            } else {
                (income, expense - amount)
            }
        },
    );
    Summary {
        balance: round2(income - expense),
        income: round2(income),
        expense: round2(expense),
    }
}
