//! Shared utilities for demos.
//!
//! Provides common functionality used across all demos:
//! - Command-line argument parsing
//! - Logging initialization
//! - A sample storefront page

#![allow(dead_code)]

// ============================================================================
// Imports
// ============================================================================

use page_tagger::{Document, NodeId, Result};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Types
// ============================================================================

/// Command-line arguments for demos.
#[derive(Debug, Clone)]
pub struct Args {
    pub debug: bool,
    pub stats: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self {
            debug: args.iter().any(|a| a == "--debug"),
            stats: args.iter().any(|a| a == "--stats"),
        }
    }
}

/// Interesting nodes of the sample page.
#[derive(Debug, Clone, Copy)]
pub struct Storefront {
    pub nav_link: NodeId,
    pub buy_button: NodeId,
    pub size_select: NodeId,
    pub quantity: NodeId,
    pub footer_link: NodeId,
}

// ============================================================================
// Functions
// ============================================================================

/// Initialize tracing/logging.
pub fn init_logging(debug: bool) {
    let filter = if debug {
        "page_tagger=debug"
    } else {
        "page_tagger=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}

/// Builds a 2000px storefront: nav, hero, product section, footer.
pub fn storefront(doc: &mut Document) -> Result<Storefront> {
    let body = doc.body();
    doc.set_scroll_height(2000.0);

    let header = doc.append_element(body, "header", &[])?;
    doc.set_layout(header, 0.0, 80.0)?;
    let nav = doc.append_element(header, "nav", &[])?;
    let nav_link = doc.append_element(nav, "a", &[("href", "/deals")])?;
    doc.append_text(nav_link, "Deals")?;
    doc.set_layout(nav_link, 20.0, 40.0)?;

    let hero = doc.append_element(body, "section", &[("class", "Hero-Banner")])?;
    doc.set_layout(hero, 80.0, 400.0)?;
    let buy_button = doc.append_element(hero, "button", &[("class", "cta")])?;
    doc.append_text(buy_button, "Buy Now")?;
    doc.set_layout(buy_button, 300.0, 48.0)?;

    let product = doc.append_element(body, "section", &[])?;
    let title = doc.append_element(product, "h2", &[])?;
    doc.append_text(title, "Running Shoes")?;
    let size_select = doc.append_element(product, "select", &[("aria-label", "Size")])?;
    for size in ["40", "41", "42"] {
        let option = doc.append_element(size_select, "option", &[("value", size)])?;
        doc.append_text(option, &format!("EU {size}"))?;
    }
    let quantity = doc.append_element(
        product,
        "input",
        &[("type", "number"), ("value", "1"), ("class", "quantity")],
    )?;
    doc.set_layout(product, 600.0, 600.0)?;

    let footer = doc.append_element(body, "footer", &[])?;
    let footer_link = doc.append_element(footer, "a", &[("href", "/contact")])?;
    doc.append_text(footer_link, "Contact")?;
    doc.set_layout(footer_link, 1900.0, 40.0)?;

    Ok(Storefront {
        nav_link,
        buy_button,
        size_select,
        quantity,
        footer_link,
    })
}
