//! These structs provide the CLI interface for the money CLI.

use crate::model::{
    Amount, Category, FilterSelection, Period, ReportKind, ReportMode, ReportSelection, WeekKey,
    YearMonth,
};
use crate::store::Backend;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// money: keep track of what you earn and what you spend.
///
/// Record income and expenses, see your balance for the week or the month, and find out which
/// category your money goes to. Data is kept in a home directory (see --home) as a JSON file or a
/// SQLite database.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory, its config file and an empty list of transactions.
    Init(InitArgs),
    /// Record an expense, or income with --income.
    Add(AddArgs),
    /// Delete transactions by id. Nothing is deleted unless every id exists.
    Delete(DeleteArgs),
    /// Show transactions newest first, with the balance of the period.
    List(PeriodArgs),
    /// Show balance, income and expense for a period.
    Summary(PeriodArgs),
    /// Show totals per category for a month or a week, and the largest category.
    Report(ReportArgs),
    /// Write transactions as CSV.
    Export(ExportArgs),
    /// Replace all transactions with the contents of a JSON file. A backup is taken first.
    Import(ImportArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of none, error, warn, info, debug, trace. RUST_LOG takes
    /// precedence when it is set.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the config, the data and the backups are kept.
    #[arg(long, env = "MONEY_HOME", default_value_t = default_home())]
    home: DisplayPath,

    /// Print the command's structured output as JSON on stdout.
    #[arg(long)]
    json: bool,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf, json: bool) -> Self {
        Self {
            log_level,
            home: home.into(),
            json,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }

    pub fn json(&self) -> bool {
        self.json
    }
}

#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// How transactions are stored.
    #[arg(long, value_enum, default_value_t = Backend::Json)]
    backend: Backend,

    /// The currency symbol used when showing amounts. Defaults to ฿.
    #[arg(long)]
    currency: Option<String>,

    /// How many backups of each kind to keep. Defaults to 5.
    #[arg(long)]
    backup_copies: Option<u32>,
}

impl InitArgs {
    pub fn new(backend: Backend, currency: Option<String>, backup_copies: Option<u32>) -> Self {
        Self {
            backend,
            currency,
            backup_copies,
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    pub fn backup_copies(&self) -> Option<u32> {
        self.backup_copies
    }
}

#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// What the money was for.
    #[arg(long)]
    text: String,

    /// The amount, as a positive number. Use --income for money coming in.
    #[arg(long, allow_hyphen_values = true)]
    amount: Amount,

    /// The date as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Defaults to other.
    #[arg(long, value_enum)]
    category: Option<Category>,

    /// Record income instead of an expense.
    #[arg(long)]
    income: bool,
}

impl AddArgs {
    pub fn new(
        text: impl Into<String>,
        amount: impl Into<Amount>,
        date: Option<NaiveDate>,
        category: Option<Category>,
        income: bool,
    ) -> Self {
        Self {
            text: text.into(),
            amount: amount.into(),
            date,
            category,
            income,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn kind(&self) -> ReportKind {
        if self.income {
            ReportKind::Income
        } else {
            ReportKind::Expense
        }
    }
}

#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The ids of the transactions to delete, as shown by `money list`.
    #[arg(required = true)]
    ids: Vec<String>,
}

impl DeleteArgs {
    pub fn new<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

/// The balance view's period filter.
#[derive(Debug, Parser, Clone, Default)]
pub struct PeriodArgs {
    /// Which transactions to include.
    #[arg(long, value_enum, default_value_t = Period::All)]
    period: Period,

    /// The month for --period month, as YYYY-MM. Defaults to the current month.
    #[arg(long)]
    month: Option<YearMonth>,
}

impl PeriodArgs {
    pub fn new(period: Period, month: Option<YearMonth>) -> Self {
        Self { period, month }
    }

    pub fn selection(&self) -> FilterSelection {
        FilterSelection::new(self.period, self.month)
    }
}

#[derive(Debug, Parser, Clone, Default)]
pub struct ReportArgs {
    /// Report on a month or on an ISO week.
    #[arg(long, value_enum, default_value_t = ReportMode::Month)]
    mode: ReportMode,

    /// The month for --mode month, as YYYY-MM. Defaults to the current month.
    #[arg(long)]
    month: Option<YearMonth>,

    /// The week for --mode week, as YYYY-Www. Defaults to the current week.
    #[arg(long)]
    week: Option<WeekKey>,

    /// Report where income came from instead of where money went.
    #[arg(long)]
    income: bool,
}

impl ReportArgs {
    pub fn new(
        mode: ReportMode,
        month: Option<YearMonth>,
        week: Option<WeekKey>,
        income: bool,
    ) -> Self {
        Self {
            mode,
            month,
            week,
            income,
        }
    }

    pub fn selection(&self) -> ReportSelection {
        let kind = if self.income {
            ReportKind::Income
        } else {
            ReportKind::Expense
        };
        ReportSelection::new(self.mode, self.month, self.week, kind)
    }
}

#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    #[clap(flatten)]
    period: PeriodArgs,

    /// Where to write the CSV. Defaults to stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

impl ExportArgs {
    pub fn new(period: PeriodArgs, output: Option<PathBuf>) -> Self {
        Self { period, output }
    }

    pub fn selection(&self) -> FilterSelection {
        self.period.selection()
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}

#[derive(Debug, Parser, Clone)]
pub struct ImportArgs {
    /// A JSON array of transactions, e.g. a file written by the json backend or a backup.
    file: PathBuf,
}

impl ImportArgs {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("money-tracker"),
        None => {
            error!(
                "Unable to find your home directory. Pass --home or set MONEY_HOME instead of \
                relying on the default location."
            );
            PathBuf::from("money-tracker")
        }
    })
}

/// A `PathBuf` that clap can show as a default value.
#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReportPeriod;

    fn parse(args: &[&str]) -> Args {
        let mut all = vec!["money", "--home", "/tmp/money-test"];
        all.extend_from_slice(args);
        Args::try_parse_from(all).unwrap()
    }

    #[test]
    fn test_add() {
        let args = parse(&[
            "add", "--text", "Lunch", "--amount", "1,250.50", "--category", "food",
        ]);
        let Command::Add(add) = args.command() else {
            panic!("expected add");
        };
        assert_eq!(add.text(), "Lunch");
        assert_eq!(add.amount(), Amount::from_str("1250.50").unwrap());
        assert_eq!(add.category(), Some(Category::Food));
        assert_eq!(add.kind(), ReportKind::Expense);
        assert_eq!(add.date(), None);
    }

    #[test]
    fn test_add_income_with_date() {
        let args = parse(&[
            "add", "--text", "Pay", "--amount", "30000", "--income", "--date", "2024-05-25",
        ]);
        let Command::Add(add) = args.command() else {
            panic!("expected add");
        };
        assert_eq!(add.kind(), ReportKind::Income);
        assert_eq!(add.date(), NaiveDate::from_ymd_opt(2024, 5, 25));
    }

    #[test]
    fn test_list_month() {
        let args = parse(&["list", "--period", "month", "--month", "2024-02"]);
        let Command::List(period) = args.command() else {
            panic!("expected list");
        };
        assert_eq!(
            period.selection(),
            FilterSelection::Month(Some(YearMonth::new(2024, 2).unwrap()))
        );
    }

    #[test]
    fn test_report_week() {
        let args = parse(&["report", "--mode", "week", "--week", "2024-W05", "--income"]);
        let Command::Report(report) = args.command() else {
            panic!("expected report");
        };
        let sel = report.selection();
        assert_eq!(
            sel.period,
            ReportPeriod::Week(Some(WeekKey::new(2024, 5).unwrap()))
        );
        assert_eq!(sel.kind, ReportKind::Income);
    }

    #[test]
    fn test_bad_month_is_rejected() {
        let result = Args::try_parse_from(["money", "list", "--month", "2024-13"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_delete_requires_ids() {
        assert!(Args::try_parse_from(["money", "delete"]).is_err());
        let args = parse(&["delete", "a", "b"]);
        let Command::Delete(delete) = args.command() else {
            panic!("expected delete");
        };
        assert_eq!(delete.ids(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_common() {
        let args = parse(&["--json", "--log-level", "debug", "summary"]);
        assert!(args.common().json());
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
        assert_eq!(args.common().home().path(), Path::new("/tmp/money-test"));
    }
}
