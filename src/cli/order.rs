//! Order CLI commands
//!
//! Appending to, listing and applying pending order files.

use clap::Subcommand;

use crate::display::{format_apply_report, format_order};
use crate::error::StockroomResult;
use crate::services::OrderService;
use crate::session::Session;

/// Order subcommands
#[derive(Subcommand)]
pub enum OrderCommands {
    /// Add an item to an order, checking the order's restrictions
    Add {
        /// Order name (e.g. wholesale)
        order: String,
        /// Item description
        description: String,
        /// Quantity to order
        quantity: u64,
    },

    /// List order files, or the lines of one order
    List {
        /// Order to show; omit to list all orders and their restrictions
        order: Option<String>,
    },

    /// Apply every line marked `ok` and remove it from the order
    Apply {
        order: String,
        /// Store that receives the stock
        #[arg(long)]
        to: String,
        /// Store the stock is moved from; omit to receive new stock
        #[arg(long)]
        from: Option<String>,
    },
}

/// Handle an order command
pub fn handle_order_command(session: &Session, cmd: OrderCommands) -> StockroomResult<()> {
    let service = OrderService::new(session.storage(), session.restrictions());

    match cmd {
        OrderCommands::Add {
            order,
            description,
            quantity,
        } => {
            let record = service.append(&order, &description, quantity)?;
            println!("{}: {} now {}", order, record.description(), record.quantity());
        }

        OrderCommands::List { order: Some(order) } => {
            let file = service.load(&order)?;
            print!("{}", format_order(&file));

            let keywords = session.restrictions().keywords_for(&order);
            if !keywords.is_empty() {
                println!("Restricted: {}", keywords.join(", "));
            }
        }

        OrderCommands::List { order: None } => {
            let names = session.storage().order_names()?;
            if names.is_empty() {
                println!("No order files.");
            }
            for name in &names {
                let file = service.load(name)?;
                println!(
                    "  {} ({} ready, {} pending)",
                    name,
                    file.ready().count(),
                    file.pending().count()
                );
            }

            println!();
            println!("Restrictions:");
            for (order, keywords) in session.restrictions().iter() {
                println!("  {}: {}", order, keywords.join(", "));
            }
        }

        OrderCommands::Apply { order, to, from } => {
            let report = service.apply(&order, from.as_deref(), &to)?;
            print!("{}", format_apply_report(&report));
        }
    }

    Ok(())
}
