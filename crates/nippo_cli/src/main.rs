//! Operator CLI.
//!
//! # Responsibility
//! - Provide a minimal probe to verify `nippo_core` linkage.
//! - Seed employees so the web surface has principals to resolve.

use clap::{Parser, Subcommand, ValueEnum};
use nippo_core::db::open_db;
use nippo_core::{Employee, EmployeeRepository, Role, SqliteEmployeeRepository};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "nippo", version, about = "Daily report service operator tool")]
struct Cli {
    /// SQLite database file; created and migrated when missing.
    #[arg(long, global = true, env = "NIPPO_DB_PATH", default_value = "nippo.sqlite3")]
    db_path: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core health and version.
    Ping,
    /// Register an employee who can log reports.
    AddEmployee {
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: String,
        #[arg(long, value_enum, default_value_t = RoleArg::General)]
        role: RoleArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoleArg {
    Admin,
    General,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Admin => Role::Admin,
            RoleArg::General => Role::General,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Ping => {
            println!("nippo_core ping={}", nippo_core::ping());
            println!("nippo_core version={}", nippo_core::core_version());
            Ok(())
        }
        Command::AddEmployee { code, name, role } => {
            let conn = open_db(&cli.db_path)
                .map_err(|err| format!("failed to open {}: {err}", cli.db_path.display()))?;
            let repo = SqliteEmployeeRepository::try_new(&conn).map_err(|err| err.to_string())?;
            let code = repo
                .create_employee(&Employee::new(code, name, role.into()))
                .map_err(|err| err.to_string())?;
            println!("employee added code={code}");
            Ok(())
        }
    }
}
