//! Tag a storefront page and report interactions.
//!
//! Demonstrates:
//! - Building a tagger configuration
//! - Bulk tagging on init
//! - Click reporting through ancestor attributes
//! - Refreshing tags on select and number input changes
//! - Reading stats and the sink as JSON
//!
//! Usage:
//!   cargo run --example tag_page
//!   cargo run --example tag_page -- --debug
//!   cargo run --example tag_page -- --stats

mod common;

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use common::Args;
use page_tagger::{Document, MemorySink, Result, Tagger, TaggerConfig};

// ============================================================================
// Main
// ============================================================================

fn main() {
    let args = Args::parse();
    common::init_logging(args.debug);

    if let Err(e) = run(args) {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    println!("=== Tag Page ===\n");

    let mut doc = Document::new();
    let page = common::storefront(&mut doc)?;
    doc.set_heap_probe(|| Some(48 * 1_048_576));

    // ========================================================================
    // Init
    // ========================================================================

    let config = TaggerConfig::builder()
        .selectors(["a", "button", "select", "input"])
        .debug(args.debug)
        .build()?;

    let sink = Arc::new(MemorySink::new());
    let mut tagger = Tagger::with_sink(config, sink.clone());
    tagger.init(&mut doc);

    println!("[Init] Tagged elements:");
    for tagged in tagger.tagged_elements(&doc) {
        println!(
            "        {} type={} action={:?} context={} value={}",
            tagged.node,
            tagged.element_type,
            tagged.action,
            tagged.context,
            tagged.value.as_deref().unwrap_or("-"),
        );
    }
    println!();

    // ========================================================================
    // Interactions
    // ========================================================================

    println!("[Interact] Clicking and changing controls...");
    doc.click(page.nav_link);
    doc.click(page.buy_button);

    doc.select_option(page.size_select, 2)?;
    doc.change(page.size_select);
    doc.click(page.size_select);

    doc.set_value(page.quantity, "3")?;
    doc.change(page.quantity);
    doc.click(page.quantity);

    doc.scroll_to(1200.0);
    doc.click(page.footer_link);
    println!("        ✓ {} records in sink\n", sink.len());

    if args.stats {
        let stats = tagger.stats(&doc);
        println!("[Stats]");
        println!("{}\n", serde_json::to_string_pretty(&stats)?);
    }

    // ========================================================================
    // Report
    // ========================================================================

    println!("[Sink]");
    println!("{}", sink.to_json()?);

    tagger.destroy(&mut doc);
    println!("\n=== Done ===");
    Ok(())
}
