pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod errors;
pub mod rating;
pub mod services;
pub mod tournament;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::services::lifecycle::TournamentService;
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_init_db() -> Result<()> {
    let pool = database::create_pool(&database_path())?;
    let conn = database::get_connection(&pool)?;
    database::setup::reset_database(&conn)?;
    println!("Database initialized at {}", database_path());
    Ok(())
}

pub fn handle_create_admin(username: &str, display_name: &str) -> Result<()> {
    let config = AppConfig::new();
    let pool = database::create_pool(&database_path())?;
    let service = TournamentService::new(pool, config.rating);
    let admin = service.create_player(username, display_name, true)?;
    println!(
        "Administrator '{}' created with rating {}",
        admin.username, admin.rating
    );
    Ok(())
}

fn database_path() -> String {
    std::env::var("DATABASE_PATH").unwrap_or_else(|_| "swiss_club_ranking.db".to_string())
}
