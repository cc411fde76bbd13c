use anyhow::Result;
use clap::{Parser, Subcommand};

use splitledger::cli::{
    handle_audit_command, handle_balance_command, handle_expense_command, handle_export_command,
    handle_group_command, handle_participant_command, handle_user_command,
};
use splitledger::config::{paths::LedgerPaths, settings::Settings};
use splitledger::services::UserService;
use splitledger::storage::Storage;

#[derive(Parser)]
#[command(
    name = "splitledger",
    author = "Kaylee Beyene",
    version,
    about = "Terminal-based group expense splitting",
    long_about = "SplitLedger tracks shared expenses within small groups, works out \
                  who owes whom, and suggests the fewest practical transfers to \
                  settle up, all from the command line."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the first user and make it active
    Init {
        /// Your display name
        #[arg(short, long)]
        name: String,
        /// Your email address
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Show current configuration and paths
    Config,

    /// User management commands
    #[command(subcommand)]
    User(splitledger::cli::UserCommands),

    /// Group management commands
    #[command(subcommand)]
    Group(splitledger::cli::GroupCommands),

    /// Participant management commands
    #[command(subcommand)]
    Participant(splitledger::cli::ParticipantCommands),

    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(splitledger::cli::ExpenseCommands),

    /// Balances and settlement suggestions
    #[command(subcommand)]
    Balance(splitledger::cli::BalanceCommands),

    /// Export data to JSON or CSV
    #[command(subcommand)]
    Export(splitledger::cli::ExportCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        count: usize,
        /// Only show one entity type (user, group, participant, expense)
        #[arg(long)]
        entity: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = LedgerPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::open(paths.clone())?;

    match cli.command {
        Some(Commands::Init { name, email }) => {
            let service = UserService::new(&storage);
            if let Some(user_id) = settings.active_user_id {
                if let Some(user) = service.get(user_id)? {
                    println!("Already initialized. Active user: {}", user.name);
                    return Ok(());
                }
            }

            println!("Initializing SplitLedger at: {}", paths.base_dir().display());
            let user = service.create(&name, email.as_deref())?;
            storage.save_all()?;
            settings.active_user_id = Some(user.id);
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!("Active user: {} ({})", user.name, user.id);
            println!();
            println!("Run 'splitledger group create <NAME>' to start a group.");
        }
        Some(Commands::Config) => {
            println!("SplitLedger Configuration");
            println!("=========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!(
                "Initialized:    {}",
                if storage.is_initialized() { "yes" } else { "no" }
            );
            println!();
            println!("Settings:");
            let active = match settings.active_user_id {
                Some(id) => UserService::new(&storage)
                    .get(id)?
                    .map(|u| u.name)
                    .unwrap_or_else(|| id.to_string()),
                None => "(none)".to_string(),
            };
            println!("  Active user:        {}", active);
            println!("  Currency symbol:    {}", settings.currency_symbol);
            println!("  Date format:        {}", settings.date_format);
            println!("  Strict splits:      {}", settings.strict_split_validation);
        }
        Some(Commands::User(cmd)) => {
            handle_user_command(&storage, &paths, &mut settings, cmd)?;
        }
        Some(Commands::Group(cmd)) => {
            handle_group_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Participant(cmd)) => {
            handle_participant_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Balance(cmd)) => {
            handle_balance_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Export(cmd)) => {
            handle_export_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Audit { count, entity }) => {
            handle_audit_command(&storage, count, entity)?;
        }
        None => {
            println!("SplitLedger - Terminal-based group expense splitting");
            println!();
            println!("Run 'splitledger --help' for usage information.");
            println!("Run 'splitledger init --name <NAME>' to get started.");
        }
    }

    Ok(())
}
