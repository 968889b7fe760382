use anyhow::Result;

use swiss_club_ranking::cli::Command;
use swiss_club_ranking::{handle_create_admin, handle_init_db, handle_serve, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::InitDb => handle_init_db(),
        Command::CreateAdmin {
            username,
            display_name,
        } => handle_create_admin(username, display_name),
    }
}
