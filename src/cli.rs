use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "swiss club ranking backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Create (or reset) the database schema
    InitDb,
    /// Create an administrator account
    CreateAdmin {
        /// Login name, must be unique
        #[arg(short, long)]
        username: String,
        /// Name shown in standings and reports
        #[arg(short, long)]
        display_name: String,
    },
}
