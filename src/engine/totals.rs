use crate::model::{Category, Transaction};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Totals per category, in the order each category was first encountered.
///
/// The order is what a chart uses for its slices and what breaks ties in `top_category`.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct CategoryTotals(Vec<(Category, Decimal)>);

impl CategoryTotals {
    /// Adds `amount` to `category`, appending the category if it has not been seen yet.
    pub fn add(&mut self, category: Category, amount: Decimal) {
        match self.0.iter_mut().find(|(c, _)| *c == category) {
            Some((_, total)) => *total += amount,
            None => self.0.push((category, amount)),
        }
    }

    pub fn get(&self, category: Category) -> Option<Decimal> {
        self.0
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, total)| *total)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, Decimal)> + '_ {
        self.0.iter().copied()
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.0.iter().map(|(c, _)| *c)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The sum of all category totals.
    pub fn grand_total(&self) -> Decimal {
        self.0.iter().map(|(_, total)| *total).sum()
    }
}

impl FromIterator<(Category, Decimal)> for CategoryTotals {
    fn from_iter<T: IntoIterator<Item = (Category, Decimal)>>(iter: T) -> Self {
        let mut totals = CategoryTotals::default();
        for (category, amount) in iter {
            totals.add(category, amount);
        }
        totals
    }
}

/// Serialized as a JSON object whose keys appear in first-encountered order.
impl Serialize for CategoryTotals {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, total) in &self.0 {
            map.serialize_entry(category, total)?;
        }
        map.end()
    }
}

/// Sums the absolute amounts of `transactions` per category.
///
/// The totals do not depend on the order of the input; only the iteration order of the result
/// does.
pub fn category_totals<'a, I>(transactions: I) -> CategoryTotals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .map(|t| (t.category(), t.amount().abs().value()))
        .collect()
}

/// The single largest category of a report and its share of the report's total.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub category: Category,
    pub total: Decimal,
    /// Whole percent, rounded half away from zero. Zero when the report total is zero.
    pub percent: u32,
}

/// Finds the category with the strictly largest total. On a tie the category encountered first
/// wins. Returns `None` when there are no categories.
pub fn top_category(totals: &CategoryTotals) -> Option<Insight> {
    let mut entries = totals.iter();
    let first = entries.next()?;
    let (category, total) = entries.fold(first, |best, next| {
        if next.1 > best.1 {
            next
        } else {
            best
        }
    });

    let grand_total = totals.grand_total();
    let percent = if grand_total.is_zero() {
        0
    } else {
        (total / grand_total * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .unwrap_or_default()
    };

    Some(Insight {
        category,
        total,
        percent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::filter_by_report;
    use crate::model::{Amount, ReportSelection, TxDate};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn tx(id: &str, amount: &str, category: Category) -> Transaction {
        Transaction::new(
            id,
            id,
            Amount::from_str(amount).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            category,
        )
    }

    #[test]
    fn test_expense_totals_by_category() {
        let list = vec![
            tx("a", "-100", Category::Food),
            tx("b", "-50", Category::Food),
            tx("c", "200", Category::Salary),
        ];
        let now = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let expenses = filter_by_report(&list, &ReportSelection::default(), now);
        let totals = category_totals(expenses);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals.get(Category::Food), Some(dec("150")));
        assert_eq!(totals.get(Category::Salary), None);
    }

    #[test]
    fn test_totals_use_absolute_amounts() {
        let list = vec![
            tx("a", "-10.50", Category::Transport),
            tx("b", "4.50", Category::Transport),
        ];
        let totals = category_totals(&list);
        assert_eq!(totals.get(Category::Transport), Some(dec("15")));
    }

    #[test]
    fn test_first_encountered_order() {
        let list = vec![
            tx("a", "-5", Category::Shopping),
            tx("b", "-50", Category::Food),
            tx("c", "-7", Category::Shopping),
            tx("d", "-1", Category::Utilities),
        ];
        let totals = category_totals(&list);
        let order: Vec<Category> = totals.categories().collect();
        assert_eq!(
            order,
            vec![Category::Shopping, Category::Food, Category::Utilities]
        );
    }

    #[test]
    fn test_totals_independent_of_input_order() {
        let list = vec![
            tx("a", "-5", Category::Shopping),
            tx("b", "-50", Category::Food),
            tx("c", "-7", Category::Shopping),
        ];
        let mut reversed = list.clone();
        reversed.reverse();
        let forward = category_totals(&list);
        let backward = category_totals(&reversed);
        for c in Category::ALL {
            assert_eq!(forward.get(c), backward.get(c));
        }
    }

    #[test]
    fn test_unknown_category_counts_as_other() {
        let json = r#"[
            {"id":"1","text":"x","amount":-3,"date":"2024-03-01","category":"pets"},
            {"id":"2","text":"y","amount":-4,"date":"2024-03-02"}
        ]"#;
        let list: crate::model::Transactions = serde_json::from_str(json).unwrap();
        let totals = category_totals(&list);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals.get(Category::Other), Some(dec("7")));
    }

    #[test]
    fn test_top_category() {
        let totals: CategoryTotals = [
            (Category::Food, dec("150")),
            (Category::Transport, dec("50")),
        ]
        .into_iter()
        .collect();
        let insight = top_category(&totals).unwrap();
        assert_eq!(insight.category, Category::Food);
        assert_eq!(insight.total, dec("150"));
        assert_eq!(insight.percent, 75);
    }

    #[test]
    fn test_top_category_tie_goes_to_first() {
        let totals: CategoryTotals = [
            (Category::Transport, dec("50")),
            (Category::Food, dec("50")),
        ]
        .into_iter()
        .collect();
        let insight = top_category(&totals).unwrap();
        assert_eq!(insight.category, Category::Transport);
        assert_eq!(insight.percent, 50);
    }

    #[test]
    fn test_top_category_rounds_percent() {
        let totals: CategoryTotals = [
            (Category::Food, dec("2")),
            (Category::Shopping, dec("1")),
        ]
        .into_iter()
        .collect();
        // 66.666..% rounds to 67.
        assert_eq!(top_category(&totals).unwrap().percent, 67);

        let totals: CategoryTotals = [
            (Category::Food, dec("1")),
            (Category::Shopping, dec("7")),
        ]
        .into_iter()
        .collect();
        // 87.5% rounds away from zero.
        assert_eq!(top_category(&totals).unwrap().percent, 88);
    }

    #[test]
    fn test_top_category_empty() {
        assert_eq!(top_category(&CategoryTotals::default()), None);
    }

    #[test]
    fn test_top_category_zero_total() {
        let totals: CategoryTotals = [(Category::Other, Decimal::ZERO)].into_iter().collect();
        let insight = top_category(&totals).unwrap();
        assert_eq!(insight.category, Category::Other);
        assert_eq!(insight.percent, 0);
    }

    #[test]
    fn test_serialize_keeps_order() {
        let totals: CategoryTotals = [
            (Category::Utilities, dec("3")),
            (Category::Food, dec("1.5")),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_string(&totals).unwrap();
        assert_eq!(json, r#"{"utilities":"3","food":"1.5"}"#);
    }

    #[test]
    fn test_invalid_date_is_not_reported() {
        let list = vec![Transaction::new(
            "z",
            "z",
            -9,
            TxDate::parse("?"),
            Category::Food,
        )];
        let now = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let expenses = filter_by_report(&list, &ReportSelection::default(), now);
        assert!(category_totals(expenses).is_empty());
    }
}
