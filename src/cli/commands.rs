use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "clinic-edge", version, about = "Edge service for the clinic website")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
    /// Inspect or change the stored consent decision
    Consent(ConsentArgs),
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Listen port (overrides config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Listen address (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// SQLite database path (overrides config)
    #[arg(long)]
    pub db: Option<String>,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: String,
}

#[derive(Args, Clone)]
pub struct ConsentArgs {
    #[command(subcommand)]
    pub action: ConsentAction,

    /// SQLite database path
    #[arg(long, default_value = "./data/clinic-edge.db", global = true)]
    pub db: String,
}

#[derive(Subcommand, Clone)]
pub enum ConsentAction {
    /// Print the stored decision
    Show,
    /// Grant every category
    AcceptAll,
    /// Keep only functional storage
    RejectAll,
    /// Save a custom decision
    Save {
        /// Allow analytics
        #[arg(long)]
        analytics: bool,
        /// Allow marketing
        #[arg(long)]
        marketing: bool,
    },
}
