//! Types that represent the core data model, such as `Transaction` and `Category`.
mod amount;
mod category;
mod date;
mod selection;
mod transaction;

pub(crate) use amount::round2;
pub use amount::{Amount, AmountError};
pub use category::Category;
pub use date::TxDate;
pub use selection::{
    FilterSelection, Period, ReportKind, ReportMode, ReportPeriod, ReportSelection, WeekKey,
    YearMonth,
};
pub use transaction::{NewTransaction, Transaction, TransactionId, Transactions};
