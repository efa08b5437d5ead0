//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `clinic_core` linkage and open the clinic database.
//! - Run the one-time same-day appointment check and print the reminder.
//!
//! Usage: `clinic_cli [--dev] [DB_PATH]`. Logs go to `./logs`; `--dev` forces
//! debug level. The database defaults to `clinic_pos.sqlite3`.

use clap::Parser;
use clinic_core::{default_log_level, format_amount, open_db, sqlite_service, ClinicState};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const DEFAULT_DB_FILE: &str = "clinic_pos.sqlite3";

#[derive(Parser, Debug)]
#[command(name = "clinic_cli")]
#[command(about = "Open the clinic database and print today's reminder and report")]
#[command(version)]
struct Cli {
    /// Force debug-level logging
    #[arg(long)]
    dev: bool,

    /// SQLite database file
    #[arg(default_value = DEFAULT_DB_FILE)]
    db_path: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.dev { "debug" } else { default_log_level() };
    if let Err(err) = init_file_logging(level) {
        eprintln!("logging disabled: {err}");
    }

    println!("clinic_core ping={}", clinic_core::ping());
    println!("clinic_core version={}", clinic_core::core_version());

    match run(&cli.db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(db_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    // A store that cannot be opened aborts startup.
    let conn = open_db(db_path)?;
    let service = sqlite_service(&conn)?;

    let reminder = service.startup_reminder()?;
    println!("{} ({})", reminder.message, reminder.date);
    for appointment in &reminder.appointments {
        let fields = &appointment.fields;
        println!(
            "  {}  {}  Dr. {}  {}",
            fields.time, fields.patient_name, fields.doctor_name, fields.reason_for_visit
        );
    }

    let state = ClinicState::load(&service)?;
    let report = state.report(&reminder.date);
    println!(
        "appointments={} today={} bill_items={} billed_total={}",
        report.total_appointments,
        report.today_appointments,
        report.total_bill_items,
        format_amount(report.total_billed)
    );
    Ok(())
}

fn init_file_logging(level: &str) -> Result<(), String> {
    let log_dir = std::env::current_dir()
        .map_err(|err| format!("cannot resolve working directory: {err}"))?
        .join("logs");
    clinic_core::init_logging(level, &log_dir.to_string_lossy())
}
