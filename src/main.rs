use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stockroom::cli::{
    handle_adjust_command, handle_backup_command, handle_check_command,
    handle_duplicates_command, handle_export_command, handle_match_command,
    handle_normalize_command, handle_order_command, handle_rename_command,
    handle_search_command, handle_show_command, handle_strict_sync_command,
    handle_transfer_command, BackupCommands, OrderCommands,
};
use stockroom::config::paths::StockroomPaths;
use stockroom::export::ExportFormat;
use stockroom::models::MatchMode;
use stockroom::services::Direction;
use stockroom::session::Session;
use stockroom::storage::Dialect;

#[derive(Parser)]
#[command(
    name = "stockroom",
    author = "Kaylee Beyene",
    version,
    about = "Flat-file inventory stores with transfers, sync and fuzzy matching",
    long_about = "Stockroom keeps named inventory stores as plain text files, one \
                  item per line, and moves stock between them: transfers, \
                  adjustments, key-set sync, pending orders and fuzzy matching \
                  of hand-typed descriptions."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write default settings and restrictions
    Init,

    /// Show current configuration and paths
    Config,

    /// Print a store
    Show {
        /// Store name or path to a store file
        store: String,
    },

    /// Report lines of a store that could not be read
    Check {
        store: String,
        /// Read grammar to check against (defaults to the configured one)
        #[arg(long)]
        dialect: Option<Dialect>,
        /// Include blank and comment lines
        #[arg(long)]
        all: bool,
    },

    /// Search stores for matching descriptions
    #[command(alias = "find")]
    Search {
        /// phrase, keywords or advanced (use -term to exclude)
        #[arg(short, long)]
        mode: Option<MatchMode>,
        /// Store to search; repeat for several (default: all)
        #[arg(short, long = "store")]
        stores: Vec<String>,
        /// Query words
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        query: Vec<String>,
    },

    /// Move stock from one store to another
    Transfer {
        /// Item description (case-insensitive)
        description: String,
        quantity: u64,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },

    /// Add or remove stock in one store
    Adjust {
        store: String,
        /// add or remove
        direction: Direction,
        description: String,
        quantity: u64,
        /// Keep the file's line order instead of sorting it
        #[arg(long)]
        keep_order: bool,
    },

    /// Add missing items at zero so two stores share the same items
    Normalize { first: String, second: String },

    /// Make target's items exactly match reference's (drops extra items)
    StrictSync {
        reference: String,
        target: String,
        /// Apply instead of previewing
        #[arg(short, long)]
        force: bool,
    },

    /// Rename an item everywhere it appears
    Rename {
        old: String,
        new: String,
        /// Store to rename in; repeat for several (default: all)
        #[arg(short, long = "store")]
        stores: Vec<String>,
        /// Apply instead of previewing
        #[arg(short, long)]
        force: bool,
    },

    /// Pending order commands
    #[command(subcommand)]
    Order(OrderCommands),

    /// Match an order's lines against a store's descriptions
    Match {
        order: String,
        store: String,
        /// Minimum similarity percentage
        #[arg(short, long)]
        threshold: Option<f64>,
    },

    /// Find near-duplicate descriptions inside a store
    Duplicates {
        store: String,
        /// Minimum similarity percentage
        #[arg(short, long)]
        threshold: Option<f64>,
    },

    /// Export a store as CSV, JSON or YAML
    Export {
        store: String,
        #[arg(short, long, default_value = "json")]
        format: ExportFormat,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Backup management commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Finish an update that was interrupted part-way
    Recover,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let paths = StockroomPaths::new()?;
    let mut session = Session::open(paths)?;

    match cli.command {
        Some(Commands::Init) => {
            let paths = session.paths();
            println!("Initializing Stockroom at: {}", paths.base_dir().display());
            if !paths.settings_file().exists() {
                session.settings().save(paths)?;
            }
            if !paths.restrictions_file().exists() {
                session.restrictions().save(paths)?;
            }
            println!("Initialization complete!");
            println!();
            println!("Stores:");
            for (name, file) in &session.settings().stores {
                println!("  {} -> {}", name, paths.data_dir().join(file).display());
            }
            println!();
            println!("Run 'stockroom show warehouse' to see a store.");
        }
        Some(Commands::Config) => {
            let paths = session.paths();
            let settings = session.settings();
            println!("Stockroom Configuration");
            println!("=======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Orders directory: {}", paths.orders_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!();
            println!("Settings:");
            println!("  Encoding:             {}", settings.encoding);
            println!("  Dialect:              {}", settings.dialect);
            println!("  Default match mode:   {}", settings.default_match_mode);
            println!("  Similarity threshold: {}%", settings.similarity_threshold);
            println!("  Backups kept:         {}", settings.backup_retention.keep);
            println!("  Stores:");
            for (name, file) in &settings.stores {
                println!("    {} -> {}", name, file);
            }
        }
        Some(Commands::Show { store }) => handle_show_command(&session, &store)?,
        Some(Commands::Check {
            store,
            dialect,
            all,
        }) => handle_check_command(&session, &store, dialect, all)?,
        Some(Commands::Search {
            mode,
            stores,
            query,
        }) => handle_search_command(&mut session, &query, mode, &stores)?,
        Some(Commands::Transfer {
            description,
            quantity,
            from,
            to,
        }) => handle_transfer_command(&session, &description, quantity, &from, &to)?,
        Some(Commands::Adjust {
            store,
            direction,
            description,
            quantity,
            keep_order,
        }) => handle_adjust_command(
            &session,
            &store,
            direction,
            &description,
            quantity,
            keep_order,
        )?,
        Some(Commands::Normalize { first, second }) => {
            handle_normalize_command(&session, &first, &second)?
        }
        Some(Commands::StrictSync {
            reference,
            target,
            force,
        }) => handle_strict_sync_command(&session, &reference, &target, force)?,
        Some(Commands::Rename {
            old,
            new,
            stores,
            force,
        }) => handle_rename_command(&session, &old, &new, &stores, force)?,
        Some(Commands::Order(cmd)) => handle_order_command(&session, cmd)?,
        Some(Commands::Match {
            order,
            store,
            threshold,
        }) => handle_match_command(&session, &order, &store, threshold)?,
        Some(Commands::Duplicates { store, threshold }) => {
            handle_duplicates_command(&session, &store, threshold)?
        }
        Some(Commands::Export {
            store,
            format,
            output,
        }) => handle_export_command(&session, &store, format, output)?,
        Some(Commands::Backup(cmd)) => handle_backup_command(&session, cmd)?,
        Some(Commands::Audit { limit }) => {
            let entries = session.storage().audit().read_recent(limit)?;
            if entries.is_empty() {
                println!("No audit entries.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Recover) => match session.storage().recover()? {
            Some(intent) => {
                println!(
                    "Finished interrupted '{}' from {}:",
                    intent.operation,
                    intent.created_at.format("%Y-%m-%d %H:%M:%S UTC")
                );
                for write in &intent.writes {
                    println!("  wrote {}", write.path.display());
                }
            }
            None => println!("Nothing to recover."),
        },
        None => {
            println!("Stockroom - flat-file inventory stores");
            println!();
            println!("Run 'stockroom --help' for usage information.");
        }
    }

    Ok(())
}
