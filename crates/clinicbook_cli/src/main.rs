//! Interactive ClinicBook shell.
//!
//! # Responsibility
//! - Read one command per line from stdin and print the outcome.
//! - Redisplay the filtered list after `find`/`list` style commands.

use clinicbook_core::{
    core_version, init_logging, AppConfig, BookRepository, CommandOutput, InMemoryBookRepository,
    LogicService, RecordKind,
};
use log::{info, warn};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("clinicbook: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(&config) {
        eprintln!("clinicbook: logging disabled: {err}");
    }

    let mut service = match LogicService::open(&config.data_file) {
        Ok(service) => service,
        Err(err) => {
            eprintln!(
                "clinicbook: cannot open `{}`: {err}",
                config.data_file.display()
            );
            return ExitCode::FAILURE;
        }
    };

    println!("ClinicBook {}. Type `help` to see all commands.", core_version());
    match run(&mut service) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            warn!("event=shell_exit module=cli status=error error_code=stdin_failed");
            eprintln!("clinicbook: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(service: &mut LogicService<InMemoryBookRepository>) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        let Some(line) = lines.next().transpose()? else {
            info!("event=shell_exit module=cli status=ok reason=eof");
            return Ok(());
        };

        match service.execute(&line) {
            Ok(output) => {
                render(&mut stdout, &output, service.repo())?;
                if output.exit {
                    info!("event=shell_exit module=cli status=ok reason=exit_command");
                    return Ok(());
                }
            }
            Err(err) => writeln!(stdout, "{err}")?,
        }
    }
}

fn render(
    out: &mut impl Write,
    output: &CommandOutput,
    repo: &InMemoryBookRepository,
) -> io::Result<()> {
    writeln!(out, "{}", output.feedback)?;
    match output.listing {
        Some(RecordKind::Patient) => {
            for (position, patient) in repo.filtered_patients().iter().enumerate() {
                writeln!(out, "{}. {patient}", position + 1)?;
            }
        }
        Some(RecordKind::Appointment) => {
            for (position, appointment) in repo.filtered_appointments().iter().enumerate() {
                writeln!(out, "{}. {appointment}", position + 1)?;
            }
        }
        None => {}
    }
    Ok(())
}
