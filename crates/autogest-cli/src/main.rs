//! autogest-cli: registra trámites y consulta el historial de AutoGest-Yau.
//!
//! `autogest-cli submit --dni 74700819 --tipo "Emergencia Médica" --dias 1 --errores 2 --email a@b.com`
//! `autogest-cli history [--limit N]`
//! `autogest-cli summary`

mod client;

use std::process::ExitCode;
use std::time::Duration;

use autogest_domain::{Priority, Record, SubmitRequest};
use clap::{Parser, Subcommand};

use crate::client::{ApiClient, ClientError};

#[derive(Debug, Parser)]
#[command(name = "autogest-cli", version, about = "Cliente de priorización de trámites (Municipalidad de Yau)")]
struct Cli {
    /// URL base del servidor.
    #[arg(long, env = "AUTOGEST_SERVER", default_value = "http://127.0.0.1:5000")]
    server: String,
    #[arg(long, default_value_t = 15)]
    timeout_secs: u64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Registra un trámite y muestra la prioridad asignada.
    Submit {
        #[arg(long = "dni")]
        citizen_id: String,
        #[arg(long = "tipo")]
        document_type: String,
        #[arg(long = "dias")]
        estimated_days: i64,
        #[arg(long = "errores", default_value_t = 0)]
        prior_errors: i64,
        #[arg(long)]
        email: String,
    },
    /// Lista el historial, el más reciente primero.
    History {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Total, críticos y registrados hoy.
    Summary,
}

fn tier_guidance(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "Trámite crítico - Atención en <24h",
        Priority::Medium => "Atención en 3-5 días",
        Priority::Low => "Atención estándar",
    }
}

fn history_line(r: &Record) -> String {
    format!("{:>5}  {}  {:<10}  {:<5}  {}",
            r.id,
            r.created_at.format(autogest_domain::CREATED_AT_FORMAT),
            r.citizen_id,
            r.priority.label(),
            r.document_type)
}

fn run(cli: Cli) -> Result<(), ClientError> {
    let api = ApiClient::new(&cli.server, Duration::from_secs(cli.timeout_secs))?;
    match cli.command {
        Command::Submit { citizen_id,
                          document_type,
                          estimated_days,
                          prior_errors,
                          email, } => {
            let request = SubmitRequest { citizen_id,
                                          document_type,
                                          estimated_days,
                                          prior_errors,
                                          contact_email: email };
            let resp = api.submit(&request)?;
            println!("PRIORIDAD: {}", resp.prioridad.label());
            println!("{}", tier_guidance(resp.prioridad));
            if resp.notified {
                println!("Correo enviado a {}", request.contact_email.trim());
            } else {
                println!("No se envió correo de aviso");
            }
            println!("Registro #{}", resp.record_id);
        }
        Command::History { limit } => {
            let records = api.history()?;
            if records.is_empty() {
                println!("Aún no hay trámites registrados.");
            }
            for r in records.iter().take(limit.unwrap_or(usize::MAX)) {
                println!("{}", history_line(r));
            }
        }
        Command::Summary => {
            let s = api.summary()?;
            println!("Total: {}", s.total);
            println!("Críticos: {}", s.critical);
            println!("Hoy: {}", s.today);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Record {
        serde_json::from_str(r#"{"id":12,"citizen_id":"74700819","document_type":"Emergencia Médica",
                                "priority":"Alta","created_at":"2025-11-03 09:15","contact_email":null}"#).unwrap()
    }

    #[test]
    fn guidance_per_tier() {
        assert_eq!(tier_guidance(Priority::High), "Trámite crítico - Atención en <24h");
        assert_eq!(tier_guidance(Priority::Medium), "Atención en 3-5 días");
        assert_eq!(tier_guidance(Priority::Low), "Atención estándar");
    }

    #[test]
    fn history_line_shows_minute_timestamp_and_label() {
        let line = history_line(&record());
        assert!(line.contains("2025-11-03 09:15"));
        assert!(line.contains("Alta"));
        assert!(line.contains("Emergencia Médica"));
    }

    #[test]
    fn cli_parses_submit_with_form_flags() {
        let cli = Cli::try_parse_from(["autogest-cli", "submit", "--dni", "1", "--tipo", "Matrimonio Civil", "--dias", "4", "--email", "x@y.pe"]).unwrap();
        match cli.command {
            Command::Submit { prior_errors, estimated_days, .. } => {
                assert_eq!(prior_errors, 0);
                assert_eq!(estimated_days, 4);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
