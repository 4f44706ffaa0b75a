//! Command-line front end for `tutor_core_cli`.

pub mod output;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{Datelike, Local};

use crate::config::{Config, ConfigError, ConfigManager};
use crate::core::services::dashboard_service::UNPAID_PREVIEW_LIMIT;
use crate::core::services::{
    DashboardService, ImportService, ReportService, ServiceError, YearReport,
};
use crate::core::time::{Clock, SystemClock};
use crate::core::utils::ledger_file;
use crate::core::Command;
use crate::currency::{format_currency_with, format_number};
use crate::domain::{Displayable, Ledger};
use crate::errors::TutorError;
use crate::export;
use crate::import::ImportBatch;
use crate::utils::{build_info, persistence};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Storage(#[from] TutorError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type CliResult<T = ()> = Result<T, CliError>;

const SESSION_TEMPLATE_FILENAME: &str = "sessions-template.csv";

const USAGE: &str = "Usage: tutor_core_cli [--data <ledger.json>] <command>\n\
Commands:\n  \
dashboard\n  \
report [year]\n  \
export-csv <year> [out.csv | dir]\n  \
export-ics [out.ics | dir]\n  \
template [out.csv | dir]\n  \
import-csv <file> [--commit]\n  \
import-calendar <file> [--commit]\n  \
version\n  \
help";

struct Context {
    ledger_path: PathBuf,
    ledger: Ledger,
    config: Config,
    clock: SystemClock,
}

impl Context {
    fn money(&self, amount: f64) -> String {
        format_currency_with(amount, &self.config.currency)
    }

    fn save(&self, ledger: &Ledger) -> CliResult {
        persistence::save_ledger_to_file(ledger, &self.ledger_path)?;
        Ok(())
    }
}

/// Parses `args` (without the program name) and runs the selected command.
pub fn run_cli<I>(args: I) -> CliResult
where
    I: IntoIterator<Item = String>,
{
    let mut data_path: Option<PathBuf> = None;
    let mut rest: Vec<String> = Vec::new();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "--data" {
            let path = iter
                .next()
                .ok_or_else(|| CliError::Usage("--data needs a file path".into()))?;
            data_path = Some(PathBuf::from(path));
        } else {
            rest.push(arg);
        }
    }

    let Some((command, args)) = rest.split_first() else {
        print_usage();
        return Err(CliError::Usage("no command given".into()));
    };

    match command.as_str() {
        "help" | "--help" | "-h" => {
            print_usage();
            return Ok(());
        }
        "version" | "--version" => {
            print_version();
            return Ok(());
        }
        _ => {}
    }

    let ledger_path = data_path.unwrap_or_else(ledger_file);
    let context = Context {
        ledger: persistence::load_or_default(&ledger_path)?,
        ledger_path,
        config: ConfigManager::new()?.load()?,
        clock: SystemClock,
    };

    match command.as_str() {
        "dashboard" => cmd_dashboard(&context),
        "report" => cmd_report(&context, args),
        "export-csv" => cmd_export_csv(&context, args),
        "export-ics" => cmd_export_ics(&context, args),
        "template" => cmd_template(&context, args),
        "import-csv" => cmd_import(&context, args, ImportKind::Spreadsheet),
        "import-calendar" => cmd_import(&context, args, ImportKind::Calendar),
        other => {
            print_usage();
            Err(CliError::Usage(format!("unknown command `{other}`")))
        }
    }
}

fn print_usage() {
    eprintln!("{USAGE}");
}

fn print_version() {
    let meta = build_info::current();
    output::section(format!("Tutor Core {}", meta.version));
    output::field("Build hash", meta.git_hash);
    output::field("Built on", meta.built_on);
    output::field("Target", meta.target);
    output::field("Profile", meta.profile);
}

fn cmd_dashboard(context: &Context) -> CliResult {
    let summary = DashboardService::summarize(&context.ledger, context.clock.now());

    output::section("Dashboard");
    output::field("Total income", context.money(summary.total_income));
    output::field("Paid", context.money(summary.paid_income));
    output::field("Unpaid", context.money(summary.unpaid_income));
    output::field(
        "Business miles",
        format!("{} miles", format_number(summary.total_mileage)),
    );
    output::field(
        "Deductible spend",
        context.money(summary.total_deductible_expenses),
    );
    output::field("Clients", summary.client_count);
    for client in &context.ledger.clients {
        output::info(format!("    {}", client.display_label()));
    }

    output::section(format!("{} so far", summary.current_year));
    output::field("Income", context.money(summary.current_year_income));
    output::field("Expenses", context.money(summary.current_year_expense_total));
    output::field("Sessions", summary.current_year_session_count);
    output::field("Net income (est.)", context.money(summary.net_income_estimate));

    if !summary.recent_sessions.is_empty() {
        output::section("Recent sessions");
        for session in &summary.recent_sessions {
            output::info(format!(
                "  {:<20} {}{}",
                context.ledger.client_name(&session.client_id),
                session.display_label(),
                if session.paid { "" } else { " (unpaid)" }
            ));
        }
    }

    let (shown, more) = summary.unpaid_preview(UNPAID_PREVIEW_LIMIT);
    if !shown.is_empty() {
        output::section("Awaiting payment");
        for unpaid in shown {
            output::warning(format!(
                "{} {} {} ({} days)",
                unpaid.session.date,
                unpaid.client_name,
                context.money(unpaid.session.total_earned),
                unpaid.days_outstanding
            ));
        }
        if more > 0 {
            output::info(format!("  ... and {more} more"));
        }
    }
    Ok(())
}

fn parse_year(raw: Option<&String>, fallback: i32) -> CliResult<i32> {
    match raw {
        None => Ok(fallback),
        Some(value) => value
            .parse()
            .map_err(|_| CliError::Usage(format!("`{value}` is not a year"))),
    }
}

fn year_report(context: &Context, year: i32) -> YearReport {
    ReportService::year_report(&context.ledger, year, context.config.mileage_rate)
}

fn cmd_report(context: &Context, args: &[String]) -> CliResult {
    let current_year = context.clock.today().year();
    let year = parse_year(args.first(), current_year)?;
    let report = year_report(context, year);

    output::section(format!("Tax report {year}"));
    output::field("Gross income", context.money(report.gross_income));
    output::field(
        "Deductible spend",
        context.money(report.deductible_expense_total),
    );
    output::field(
        "Business miles",
        format!("{} miles", format_number(report.business_mileage)),
    );
    output::field(
        "Mileage deduction",
        format!(
            "{} (@ ${}/mile)",
            context.money(report.mileage_deduction),
            format_number(report.mileage_rate)
        ),
    );
    output::field("Net income", context.money(report.net_income));

    if !report.expense_by_category.is_empty() {
        output::section("Expenses by category");
        for (category, amount) in report.categories_by_amount() {
            output::field(category.label(), context.money(amount));
        }
    }

    if !report.expenses.is_empty() {
        output::section("Expenses");
        for expense in &report.expenses {
            let marker = if expense.deductible { "" } else { " (not deductible)" };
            output::info(format!("  {}{marker}", expense.display_label()));
        }
    }

    if !report.client_income_breakdown.is_empty() {
        output::section("Income by client");
        for (name, income, share) in report.clients_by_income() {
            output::info(format!(
                "  {:<20} {:>10}  {:>3} sessions  {:>6}h  {:>5.1}%",
                name,
                context.money(income.income),
                income.session_count,
                format_number(income.total_hours),
                share
            ));
        }
    }

    output::section("Monthly");
    for month in &report.monthly_breakdown {
        output::info(format!(
            "  {}  {:>10}  {:>10}  {:>3} sessions",
            month.month_label,
            context.money(month.income),
            context.money(month.expenses),
            month.session_count
        ));
    }

    let years: Vec<String> = ReportService::available_years(&context.ledger, current_year)
        .iter()
        .map(ToString::to_string)
        .collect();
    output::info(format!("\nYears with data: {}", years.join(", ")));
    Ok(())
}

/// Output path for `out`; a directory gets `default_name` inside it.
fn output_path(out: &str, default_name: &str) -> PathBuf {
    let path = PathBuf::from(out);
    if path.is_dir() {
        path.join(default_name)
    } else {
        path
    }
}

fn write_output(contents: &str, out: &str, default_name: &str) -> CliResult {
    let path = output_path(out, default_name);
    fs::write(&path, contents)?;
    output::success(format!("Wrote {}", path.display()));
    Ok(())
}

/// Writes `contents` to `out` when given, otherwise to stdout.
fn emit(contents: &str, out: Option<&String>, default_name: &str) -> CliResult {
    match out {
        Some(path) => write_output(contents, path, default_name),
        None => {
            println!("{contents}");
            Ok(())
        }
    }
}

fn cmd_export_csv(context: &Context, args: &[String]) -> CliResult {
    let year = args
        .first()
        .ok_or_else(|| CliError::Usage("export-csv needs a year".into()))
        .and_then(|raw| parse_year(Some(raw), 0))?;
    let report = year_report(context, year);
    let csv = export::tax_report_csv(&context.ledger, &report, &context.config.app_name);
    emit(&csv, args.get(1), &export::tax_report_filename(year))
}

fn cmd_export_ics(context: &Context, args: &[String]) -> CliResult {
    let offset = *Local::now().offset();
    let options = context.config.ics_options(offset);
    let ics = export::sessions_to_ics(&context.ledger, &context.ledger.sessions, &options);
    match args.first() {
        Some(path) => write_output(&ics, path, export::calendar_filename()),
        None => {
            print!("{ics}");
            Ok(())
        }
    }
}

fn cmd_template(context: &Context, args: &[String]) -> CliResult {
    let csv = if context.ledger.sessions.is_empty() {
        export::blank_session_template()
    } else {
        export::session_template_csv(&context.ledger, &context.ledger.sessions)
    };
    emit(&csv, args.first(), SESSION_TEMPLATE_FILENAME)
}

#[derive(Clone, Copy)]
enum ImportKind {
    Spreadsheet,
    Calendar,
}

fn cmd_import(context: &Context, args: &[String], kind: ImportKind) -> CliResult {
    let commit = args.iter().any(|arg| arg == "--commit");
    let file = args
        .iter()
        .find(|arg| !arg.starts_with("--"))
        .ok_or_else(|| CliError::Usage("import needs a file path".into()))?;
    let text = fs::read_to_string(Path::new(file))?;

    let batch = match kind {
        ImportKind::Spreadsheet => ImportService::preview_sessions_csv(&context.ledger, &text),
        ImportKind::Calendar => ImportService::preview_calendar(
            &context.ledger,
            &text,
            context.config.fallback_hourly_rate,
        ),
    };
    report_batch(&batch);

    if !commit {
        output::info("Preview only; re-run with --commit to add the valid rows.");
        return Ok(());
    }
    let valid = batch.valid_count();
    let next = context.ledger.apply(Command::CommitImport(batch))?;
    context.save(&next)?;
    output::success(format!(
        "Imported {valid} session(s) into {}",
        context.ledger_path.display()
    ));
    Ok(())
}

fn report_batch(batch: &ImportBatch) {
    output::section("Import preview");
    output::field("Rows", batch.len());
    output::field("Valid", batch.valid_count());
    output::field("With errors", batch.invalid_count());
    for row in batch.invalid_rows() {
        output::warning(format!("line {}: {}", row.line, row.errors.join("; ")));
    }
    for row in batch.rows.iter().filter_map(|row| {
        row.draft
            .payment_hint
            .filter(|paid| *paid)
            .map(|_| row.line)
    }) {
        output::info(format!(
            "  line {row}: mentions payment but will be imported as unpaid"
        ));
    }
}
