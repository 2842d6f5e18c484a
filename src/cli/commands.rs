use std::sync::Arc;

use anyhow::{Context, Result};
use console::{style, Emoji};
use dialoguer::{theme::ColorfulTheme, Confirm, MultiSelect};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::{
    cli::args::*,
    client::{ConnectionConfig, HttpConnection, HttpTotalEndpoint},
    models::{item::SelectableItem, page::CartPage, selection::SelectionSet},
    services::{CartTotalUpdater, Catalog, UpdateOutcome, UpdaterError},
    utils::{
        formatting::{format_item_table, format_product_table, format_total},
        Config,
    },
};

static CROSS: Emoji<'_, '_> = Emoji("❌ ", "");
static WARNING: Emoji<'_, '_> = Emoji("⚠️ ", "");
static INFO: Emoji<'_, '_> = Emoji("ℹ️ ", "");
static CART: Emoji<'_, '_> = Emoji("🛒 ", "");

pub struct CliApp {
    catalog: Catalog,
    endpoint: Arc<HttpTotalEndpoint>,
    updater: CartTotalUpdater,
}

impl CliApp {
    pub fn new(config: &Config) -> Result<Self> {
        let catalog = Catalog::load_or_default(config.catalog_path.as_deref())
            .context("Failed to load product catalog")?;

        let connection = HttpConnection::new(&ConnectionConfig {
            base_url: config.parsed_base_url()?,
            timeout: config.request_timeout,
        });
        let endpoint = Arc::new(HttpTotalEndpoint::new(connection, config.total_path.clone()));

        let page = Arc::new(CartPage::new(catalog.items()));
        let updater = CartTotalUpdater::new(page, endpoint.clone(), config.ordering);

        Ok(Self {
            catalog,
            endpoint,
            updater,
        })
    }

    pub async fn run(&self, args: Args) -> Result<()> {
        match args.command {
            Commands::Items => self.handle_items(),
            Commands::Query { ids } => self.handle_query(&ids),
            Commands::Total { ids } => self.handle_total(&ids).await,
            Commands::Interactive => self.handle_interactive().await,
        }
    }

    fn handle_items(&self) -> Result<()> {
        if self.catalog.products().is_empty() {
            println!("{} No products in catalog", INFO);
            return Ok(());
        }
        println!("{}", format_product_table(self.catalog.products()));
        Ok(())
    }

    fn handle_query(&self, ids: &[String]) -> Result<()> {
        for id in ids.iter().filter(|id| self.catalog.get(id).is_none()) {
            warn!("Ignoring unknown product id '{}'", id);
            println!("{} Unknown product id '{}' ignored", WARNING, style(id).yellow());
        }

        let items: Vec<SelectableItem> = self
            .catalog
            .items()
            .into_iter()
            .map(|mut item| {
                item.selected = ids.contains(&item.id);
                item
            })
            .collect();
        let url = self.endpoint.request_url(&SelectionSet::scan(&items))?;
        println!("GET {}", url);
        Ok(())
    }

    async fn handle_total(&self, ids: &[String]) -> Result<()> {
        let mut handles = Vec::new();
        for id in ids {
            if let Some(handle) = self.check(id, true) {
                handles.push(handle);
            }
        }
        // Nothing changed, so nothing was sent; ask once for the current selection
        if handles.is_empty() {
            handles.push(self.updater.handle_change());
        }

        let outcomes = settle(handles).await?;
        report(&outcomes);
        println!("{}", format_total(&self.updater.page().display().text()));
        Ok(())
    }

    async fn handle_interactive(&self) -> Result<()> {
        let items = self.updater.page().items();
        if items.is_empty() {
            println!("{} No products in catalog", INFO);
            return Ok(());
        }

        println!("{} {}", CART, style("Cart").bold().cyan());
        let theme = ColorfulTheme::default();
        let labels: Vec<String> = items
            .iter()
            .map(|item| format!("{} ({})", item.label, item.id))
            .collect();

        loop {
            let current: Vec<bool> = self
                .updater
                .page()
                .items()
                .iter()
                .map(|item| item.selected)
                .collect();

            let chosen = MultiSelect::with_theme(&theme)
                .with_prompt("Check the items in your cart")
                .items(&labels)
                .defaults(&current)
                .interact()?;

            let mut handles = Vec::new();
            for (index, item) in items.iter().enumerate() {
                if let Some(handle) = self.check(&item.id, chosen.contains(&index)) {
                    handles.push(handle);
                }
            }

            let outcomes = settle(handles).await?;
            report(&outcomes);
            println!("{}", format_item_table(&self.updater.page().items()));
            println!("{}", format_total(&self.updater.page().display().text()));

            let again = Confirm::with_theme(&theme)
                .with_prompt("Change the selection?")
                .default(true)
                .interact()?;
            if !again {
                break;
            }
        }

        info!("Issued {} total request(s)", self.updater.issued_count());
        Ok(())
    }

    fn check(&self, id: &str, selected: bool) -> Option<JoinHandle<UpdateOutcome>> {
        match self.updater.set_selected(id, selected) {
            Ok(handle) => handle,
            Err(UpdaterError::UnknownItem { id }) => {
                warn!("Ignoring unknown product id '{}'", id);
                println!("{} Unknown product id '{}' ignored", WARNING, style(id).yellow());
                None
            }
            Err(e) => {
                warn!("Ignoring selection change: {}", e);
                None
            }
        }
    }
}

/// Waits for every in-flight request to finish.
pub async fn settle(handles: Vec<JoinHandle<UpdateOutcome>>) -> Result<Vec<UpdateOutcome>> {
    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        outcomes.push(handle.await.context("Total request task failed")?);
    }
    Ok(outcomes)
}

fn report(outcomes: &[UpdateOutcome]) {
    for outcome in outcomes {
        match outcome {
            UpdateOutcome::Applied { .. } => {}
            UpdateOutcome::Superseded { seq, applied_seq } => {
                println!(
                    "{} Response #{} arrived after #{} and was dropped",
                    INFO, seq, applied_seq
                );
            }
            UpdateOutcome::Failed { seq, error } => {
                println!(
                    "{} Request #{} failed: {}",
                    CROSS,
                    seq,
                    style(error).red()
                );
            }
        }
    }
}

/// Folds command line flags over the loaded configuration.
pub fn apply_overrides(config: &mut Config, args: &Args) -> Result<()> {
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(catalog) = &args.catalog {
        config.catalog_path = Some(catalog.clone());
    }
    if let Some(ordering) = args.ordering {
        config.ordering = ordering.into();
    }
    config.validate()
}
