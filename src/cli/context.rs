//! Shell state, command dispatch, and the command handlers.

use chrono::{NaiveDate, Utc};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm};
use rust_decimal::Decimal;
use strsim::levenshtein;
use uuid::Uuid;

use crate::cli::output;
use crate::cli::table::{Table, TableColumn};
use crate::config::{Config, ConfigManager};
use crate::core::{Period, Tracker};
use crate::domain::{
    BillingCycle, DueStatus, Identifiable, Subscription, Transaction, TransactionKind,
};
use crate::errors::{TrackerError, ValidationError};
use crate::storage::JsonFileStore;

/// One dispatchable command: its name, the second-word completions, and
/// the usage lines `help` prints for it.
pub(crate) struct CommandSpec {
    pub(crate) name: &'static str,
    pub(crate) subcommands: &'static [&'static str],
    pub(crate) usage: &'static [&'static str],
}

/// Dispatch table. Drives routing, help, completion, and suggestions.
pub(crate) const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "tx",
        subcommands: &["add", "list", "remove"],
        usage: &[
            "tx add income|expense <amount> [category] [description...]",
            "tx list [query]",
            "tx remove <id>",
        ],
    },
    CommandSpec {
        name: "sub",
        subcommands: &["add", "list", "remove"],
        usage: &[
            "sub add <name> <amount> <weekly|monthly|quarterly|yearly> [YYYY-MM-DD] [category] [description...]",
            "sub list [query]",
            "sub remove <id>",
        ],
    },
    CommandSpec {
        name: "summary",
        subcommands: &["week", "month", "year"],
        usage: &["summary [week|month|year]"],
    },
    CommandSpec {
        name: "config",
        subcommands: &["show", "currency", "period"],
        usage: &["config [show|currency <code>|period <week|month|year>]"],
    },
    CommandSpec {
        name: "help",
        subcommands: &[],
        usage: &["help"],
    },
    CommandSpec {
        name: "exit",
        subcommands: &[],
        usage: &["exit"],
    },
    // Alias for exit; kept out of the help listing.
    CommandSpec {
        name: "quit",
        subcommands: &[],
        usage: &[],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

/// Top-level CLI failures that abort the shell.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Per-command failures reported to the user without leaving the shell.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
}

pub type CommandResult = Result<(), CommandError>;

/// Holds the open tracker and configuration for one shell session.
pub struct ShellContext {
    pub mode: CliMode,
    pub running: bool,
    tracker: Tracker,
    config: Config,
    config_manager: ConfigManager,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let store = JsonFileStore::new_default()?;
        let tracker = Tracker::open(Box::new(store));
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        Ok(Self {
            mode,
            running: true,
            tracker,
            config,
            config_manager,
        })
    }

    pub fn prompt(&self) -> String {
        "fintrack> ".to_string()
    }

    /// Tokenizes and dispatches one input line. Unparseable lines are
    /// reported and swallowed; `exit` flips `running` off.
    pub(crate) fn process(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match shell_words::split(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err.to_string());
                return Ok(LoopControl::Continue);
            }
        };
        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };

        let command = raw.to_lowercase();
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        let control = self.dispatch(&command, raw, &args)?;
        if control == LoopControl::Exit {
            self.running = false;
        }
        Ok(control)
    }

    fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        match command {
            "tx" => self.cmd_tx(args).map(|_| LoopControl::Continue),
            "sub" => self.cmd_sub(args).map(|_| LoopControl::Continue),
            "summary" => self.cmd_summary(args).map(|_| LoopControl::Continue),
            "config" => self.cmd_config(args).map(|_| LoopControl::Continue),
            "help" => {
                self.cmd_help();
                Ok(LoopControl::Continue)
            }
            "exit" | "quit" => Ok(LoopControl::Exit),
            _ => {
                self.suggest_command(raw);
                Ok(LoopControl::Continue)
            }
        }
    }

    fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = COMMANDS
            .iter()
            .map(|spec| (levenshtein(spec.name, input), spec.name))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Exit shell?")
            .default(true)
            .interact()?;
        Ok(confirmed)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::info("Use `help` for usage details.");
                Ok(())
            }
            other => {
                output::error(other.to_string());
                Ok(())
            }
        }
    }

    fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()?;
        Ok(confirmed)
    }

    fn amount(&self, value: Decimal) -> String {
        format_amount(&self.config.currency, value)
    }

    fn cmd_tx(&mut self, args: &[&str]) -> CommandResult {
        match args.first().copied() {
            Some("add") => self.cmd_tx_add(&args[1..]),
            Some("list") => self.cmd_tx_list(&args[1..]),
            Some("remove") | Some("rm") => self.cmd_tx_remove(&args[1..]),
            _ => Err(CommandError::InvalidArguments(
                "usage: tx add|list|remove ...".into(),
            )),
        }
    }

    fn cmd_tx_add(&mut self, args: &[&str]) -> CommandResult {
        if args.len() < 2 {
            return Err(CommandError::InvalidArguments(
                "usage: tx add income|expense <amount> [category] [description...]".into(),
            ));
        }
        let kind = match args[0].to_lowercase().as_str() {
            "income" => TransactionKind::Income,
            "expense" => TransactionKind::Expense,
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown transaction kind `{}` (use income or expense)",
                    other
                )))
            }
        };
        let amount = parse_amount(args[1])?;
        let category = args.get(2).copied().unwrap_or("");
        let description = if args.len() > 3 {
            args[3..].join(" ")
        } else {
            String::new()
        };

        let txn = Transaction::new(kind, amount, category, description, Utc::now())?;
        let label = format!("{} of {}", kind.label(), self.amount(txn.amount));
        let id = self.tracker.add_transaction(txn)?;
        output::success(format!("{} recorded ({}).", label, short_id(id)));
        Ok(())
    }

    fn cmd_tx_list(&mut self, args: &[&str]) -> CommandResult {
        let query = args.join(" ");
        let matches = self.tracker.search_transactions(&query);
        if matches.is_empty() {
            if query.is_empty() {
                output::info("No transactions recorded.");
            } else {
                output::info(format!("No transactions match `{}`.", query));
            }
            return Ok(());
        }

        let mut table = Table::new(vec![
            TableColumn::left("ID"),
            TableColumn::left("Date"),
            TableColumn::left("Kind"),
            TableColumn::right("Amount"),
            TableColumn::left("Category"),
            TableColumn::left("Description"),
        ]);
        for txn in matches {
            table.push_row(vec![
                short_id(txn.id),
                txn.date.format("%Y-%m-%d").to_string(),
                txn.kind.label().to_string(),
                self.amount(txn.amount),
                placeholder(&txn.category),
                placeholder(&txn.description),
            ]);
        }
        println!("{}", table.render());
        Ok(())
    }

    fn cmd_tx_remove(&mut self, args: &[&str]) -> CommandResult {
        let token = args.first().copied().ok_or_else(|| {
            CommandError::InvalidArguments("usage: tx remove <id>".into())
        })?;
        let Some(id) = resolve_id(self.tracker.transactions(), token)? else {
            output::warning(format!("No transaction matches id `{}`.", token));
            return Ok(());
        };
        if !self.confirm(&format!("Remove transaction `{}`?", short_id(id)))? {
            output::info("Removal cancelled.");
            return Ok(());
        }
        if self.tracker.remove_transaction(id)? {
            output::success(format!("Transaction {} removed.", short_id(id)));
        }
        Ok(())
    }

    fn cmd_sub(&mut self, args: &[&str]) -> CommandResult {
        match args.first().copied() {
            Some("add") => self.cmd_sub_add(&args[1..]),
            Some("list") => self.cmd_sub_list(&args[1..]),
            Some("remove") | Some("rm") => self.cmd_sub_remove(&args[1..]),
            _ => Err(CommandError::InvalidArguments(
                "usage: sub add|list|remove ...".into(),
            )),
        }
    }

    fn cmd_sub_add(&mut self, args: &[&str]) -> CommandResult {
        if args.len() < 3 {
            return Err(CommandError::InvalidArguments(
                "usage: sub add <name> <amount> <weekly|monthly|quarterly|yearly> \
                 [YYYY-MM-DD] [category] [description...]"
                    .into(),
            ));
        }
        let name = args[0];
        let amount = parse_amount(args[1])?;
        let cycle = args[2].parse::<BillingCycle>()?;

        let now = Utc::now();
        let mut rest = &args[3..];
        let mut next_billing = now.date_naive();
        if let Some(first) = rest.first() {
            if let Ok(date) = NaiveDate::parse_from_str(first, "%Y-%m-%d") {
                next_billing = date;
                rest = &rest[1..];
            }
        }
        let category = rest.first().copied().unwrap_or("");
        let description = if rest.len() > 1 {
            rest[1..].join(" ")
        } else {
            String::new()
        };

        let sub = Subscription::new(name, amount, cycle, next_billing, category, description, now)?;
        let summary = format!(
            "Subscription `{}` added ({} {}, next billing {}).",
            sub.name,
            self.amount(sub.amount),
            sub.billing_cycle.label().to_lowercase(),
            sub.next_billing_date
        );
        self.tracker.add_subscription(sub)?;
        output::success(summary);
        Ok(())
    }

    fn cmd_sub_list(&mut self, args: &[&str]) -> CommandResult {
        let query = args.join(" ");
        let matches = self.tracker.search_subscriptions(&query);
        if matches.is_empty() {
            if query.is_empty() {
                output::info("No subscriptions recorded.");
            } else {
                output::info(format!("No subscriptions match `{}`.", query));
            }
            return Ok(());
        }

        let today = Utc::now().date_naive();
        let mut table = Table::new(vec![
            TableColumn::left("ID"),
            TableColumn::left("Name"),
            TableColumn::right("Amount"),
            TableColumn::left("Cycle"),
            TableColumn::left("Next billing"),
            TableColumn::left("Following"),
            TableColumn::left("Status"),
        ]);
        for sub in matches {
            table.push_row(vec![
                short_id(sub.id),
                sub.name.clone(),
                self.amount(sub.amount),
                sub.billing_cycle.label().to_string(),
                sub.next_billing_date.to_string(),
                sub.following_billing_date().to_string(),
                due_status_cell(sub.due_status(today)),
            ]);
        }
        println!("{}", table.render());
        Ok(())
    }

    fn cmd_sub_remove(&mut self, args: &[&str]) -> CommandResult {
        let token = args.first().copied().ok_or_else(|| {
            CommandError::InvalidArguments("usage: sub remove <id>".into())
        })?;
        let Some(id) = resolve_id(self.tracker.subscriptions(), token)? else {
            output::warning(format!("No subscription matches id `{}`.", token));
            return Ok(());
        };
        let name = self
            .tracker
            .subscriptions()
            .iter()
            .find(|sub| sub.id == id)
            .map(|sub| sub.name.clone())
            .unwrap_or_else(|| short_id(id));
        if !self.confirm(&format!("Remove subscription `{}`?", name))? {
            output::info("Removal cancelled.");
            return Ok(());
        }
        if self.tracker.remove_subscription(id)? {
            output::success(format!("Subscription `{}` removed.", name));
        }
        Ok(())
    }

    fn cmd_summary(&mut self, args: &[&str]) -> CommandResult {
        if args.len() > 1 {
            return Err(CommandError::InvalidArguments(
                "usage: summary [week|month|year]".into(),
            ));
        }
        let period = match args.first() {
            Some(token) => token.parse::<Period>()?,
            None => self.config.default_period,
        };

        let now = Utc::now();
        let summary = self.tracker.summarize(period, now);
        let overall = self.tracker.overall_totals();

        output::section(format!("Overview ({})", period.label()));
        output::info(format!(
            "All-time: income {}, expenses {}, balance {}",
            self.amount(overall.total_income),
            self.amount(overall.combined_expense()),
            self.amount(overall.balance()),
        ));

        let mut totals = Table::new(vec![
            TableColumn::left("Metric"),
            TableColumn::right("Amount"),
        ]);
        for (label, value) in summary.balance_series() {
            totals.push_row(vec![label.to_string(), self.amount(value)]);
        }
        totals.push_row(vec![
            "Subscriptions".into(),
            self.amount(summary.totals.total_subscription_cost),
        ]);
        totals.push_row(vec!["Balance".into(), self.amount(summary.balance())]);
        println!("{}", totals.render());

        let slices = summary.breakdown_slices();
        if slices.is_empty() {
            output::info("Nothing spent in this period.");
        } else {
            let mut breakdown = Table::new(vec![
                TableColumn::left("Category"),
                TableColumn::right("Amount"),
                TableColumn::right("Share"),
            ]);
            for slice in slices {
                breakdown.push_row(vec![
                    slice.label,
                    self.amount(slice.amount),
                    format!("{}%", slice.percent),
                ]);
            }
            println!("\n{}", breakdown.render());
        }
        Ok(())
    }

    fn cmd_config(&mut self, args: &[&str]) -> CommandResult {
        match args.first().copied() {
            None | Some("show") => {
                output::info(format!("Currency: {}", self.config.currency));
                output::info(format!(
                    "Default period: {}",
                    self.config.default_period.label().to_lowercase()
                ));
                Ok(())
            }
            Some("currency") => {
                let code = args.get(1).copied().map(str::trim).unwrap_or("");
                if code.is_empty() {
                    return Err(CommandError::InvalidArguments(
                        "usage: config currency <code>".into(),
                    ));
                }
                self.config.currency = code.to_uppercase();
                self.config_manager.save(&self.config)?;
                output::success(format!("Currency set to {}.", self.config.currency));
                Ok(())
            }
            Some("period") => {
                let token = args.get(1).copied().ok_or_else(|| {
                    CommandError::InvalidArguments("usage: config period <week|month|year>".into())
                })?;
                self.config.default_period = token.parse::<Period>()?;
                self.config_manager.save(&self.config)?;
                output::success(format!(
                    "Default period set to {}.",
                    self.config.default_period.label().to_lowercase()
                ));
                Ok(())
            }
            Some(other) => Err(CommandError::InvalidArguments(format!(
                "unknown config option `{}`; usage: config [show|currency <code>|period <p>]",
                other
            ))),
        }
    }

    fn cmd_help(&self) {
        output::section("Commands");
        for spec in COMMANDS {
            for usage in spec.usage {
                println!("  {}", usage);
            }
        }
    }
}

/// Formats a monetary value with the configured currency code.
pub(crate) fn format_amount(currency: &str, value: Decimal) -> String {
    format!("{} {:.2}", currency, value.round_dp(2))
}

fn placeholder(text: &str) -> String {
    if text.is_empty() {
        "-".to_string()
    } else {
        text.to_string()
    }
}

fn due_status_cell(status: DueStatus) -> String {
    match status {
        DueStatus::Overdue => status.label().bright_red().to_string(),
        DueStatus::DueSoon => status.label().bright_yellow().to_string(),
        DueStatus::Upcoming => status.label().to_string(),
    }
}

fn short_id(id: Uuid) -> String {
    let mut short = id.simple().to_string();
    short.truncate(8);
    short
}

fn parse_amount(input: &str) -> Result<Decimal, CommandError> {
    input
        .parse::<Decimal>()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid amount `{}`", input)))
}

/// Resolves a full UUID or an unambiguous prefix of the simple form
/// against any identifiable collection.
fn resolve_id<T: Identifiable>(items: &[T], token: &str) -> Result<Option<Uuid>, CommandError> {
    if let Ok(full) = Uuid::parse_str(token) {
        return Ok(items.iter().map(Identifiable::id).find(|id| *id == full));
    }
    let needle = token.to_lowercase();
    let matches: Vec<Uuid> = items
        .iter()
        .map(Identifiable::id)
        .filter(|id| id.simple().to_string().starts_with(&needle))
        .collect();
    match matches.len() {
        0 => Ok(None),
        1 => Ok(Some(matches[0])),
        _ => Err(CommandError::InvalidArguments(format!(
            "id `{}` is ambiguous, give more characters",
            token
        ))),
    }
}

#[cfg(test)]
impl ShellContext {
    pub(crate) fn for_tests(
        tracker: Tracker,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        let config = config_manager.load()?;
        Ok(Self {
            mode: CliMode::Script,
            running: true,
            tracker,
            config,
            config_manager,
        })
    }

    pub(crate) fn tracker(&self) -> &Tracker {
        &self.tracker
    }
}
