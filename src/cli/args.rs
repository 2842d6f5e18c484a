use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::PathBuf;

use crate::services::ResponseOrdering;

#[derive(Parser)]
#[command(name = "cart-total")]
#[command(about = "Keeps a shopping cart total in step with the checked items")]
#[command(version = "0.1.0")]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Cart server origin, overrides CART_BASE_URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Product catalog JSON file, overrides CART_CATALOG
    #[arg(short, long, global = true)]
    pub catalog: Option<PathBuf>,

    /// How overlapping responses are applied, overrides CART_RESPONSE_ORDERING
    #[arg(long, global = true)]
    pub ordering: Option<OrderingArg>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the products on the cart page
    Items,
    /// Print the total request url for a selection without sending it
    Query {
        /// Ids of the checked products
        ids: Vec<String>,
    },
    /// Check the given products one by one and print the resulting total
    Total {
        /// Ids of the products to check
        ids: Vec<String>,
    },
    /// Toggle products interactively and watch the total
    Interactive,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OrderingArg {
    LatestIssued,
    LastResolved,
}

impl From<OrderingArg> for ResponseOrdering {
    fn from(arg: OrderingArg) -> Self {
        match arg {
            OrderingArg::LatestIssued => ResponseOrdering::LatestIssued,
            OrderingArg::LastResolved => ResponseOrdering::LastResolved,
        }
    }
}

impl fmt::Display for OrderingArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ResponseOrdering::from(*self).fmt(f)
    }
}
