use console::style;
use tabled::{Table, Tabled, settings::{Style, Alignment}};

use crate::models::item::{Product, SelectableItem};

#[derive(Tabled)]
struct ProductTableRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
}

#[derive(Tabled)]
struct ItemTableRow {
    #[tabled(rename = "")]
    checkbox: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Item")]
    label: String,
}

pub fn format_product_table(products: &[Product]) -> String {
    if products.is_empty() {
        return String::new();
    }

    let rows: Vec<ProductTableRow> = products
        .iter()
        .map(|product| ProductTableRow {
            id: product.id.clone(),
            name: truncate(&product.name, 30),
            price: product.price.to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Alignment::left());

    table.to_string()
}

pub fn format_item_table(items: &[SelectableItem]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let rows: Vec<ItemTableRow> = items
        .iter()
        .map(|item| ItemTableRow {
            checkbox: checkbox(item.selected).to_string(),
            id: item.id.clone(),
            label: truncate(&item.label, 30),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Alignment::left());

    table.to_string()
}

pub fn format_total(text: &str) -> String {
    let value = if text.is_empty() {
        style("-").dim().to_string()
    } else {
        style(text).green().bold().to_string()
    };
    format!("{}: {}", style("Total").bold(), value)
}

fn checkbox(selected: bool) -> &'static str {
    if selected {
        "[x]"
    } else {
        "[ ]"
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars - 3).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
