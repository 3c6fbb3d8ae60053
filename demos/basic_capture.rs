//! Capturing events from application code.
//!
//! This example walks through a typical test body:
//! 1. Configure a production-style pipeline
//! 2. Start a capture session and run the code under test
//! 3. Assert on captured events by message, by fields and by order
//! 4. Drop the session and watch the original pipeline come back
//!
//! Run with: `cargo run --example basic_capture`

use std::sync::Arc;

use logcap::processors::{AddLogLevel, JsonRenderer};
use logcap::{fields, get_named_logger, try_capture, LoggingHost};

fn checkout(items: u32) {
    let log = get_named_logger("shop").bind(fields! { "cart" => "c-42" });
    log.info("checkout started", fields! { "items" => items });
    if items > 3 {
        log.warning("large order", fields! { "items" => items });
    }
    log.info("checkout finished", ());
}

fn main() {
    println!("=== Basic Capture Example ===\n");

    let host = LoggingHost::global();
    host.configure(vec![Arc::new(AddLogLevel), Arc::new(JsonRenderer::new())]);
    println!("Pipeline before capture: {:?}", host.processor_names());

    println!("\n--- Scenario 1: Capturing a call ---");
    let session = match try_capture() {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Capture failed to start: {}", e);
            return;
        }
    };
    println!("Pipeline during capture: {:?}", host.processor_names());
    checkout(5);
    println!("Captured {} events:", session.events().len());
    println!("{}", session.events());

    println!("\n--- Scenario 2: Lookup by message and fields ---");
    println!(
        "has(\"large order\", items=5): {}",
        session.has("large order", fields! { "items" => 5 })
    );
    println!(
        "has(\"large order\", items=9): {}",
        session.has("large order", fields! { "items" => 9 })
    );
    println!(
        "count(\"checkout finished\"): {}",
        session.count("checkout finished", ())
    );

    println!("\n--- Scenario 3: Ordered containment ---");
    let expected = [
        session.info("checkout started", fields! { "cart" => "c-42", "items" => 5 }),
        session.info("checkout finished", fields! { "cart" => "c-42" }),
    ];
    println!(
        "started then finished, gaps allowed: {}",
        session.events().contains_subsequence(&expected)
    );
    let reversed = [expected[1].clone(), expected[0].clone()];
    println!(
        "finished then started: {}",
        session.events().contains_subsequence(&reversed)
    );

    println!("\n--- Scenario 4: Restoring the pipeline ---");
    drop(session);
    println!("Pipeline after capture: {:?}", host.processor_names());
    println!("Rendered output after capture goes to stderr:");
    checkout(1);

    println!("\n=== Example Complete ===");
}
