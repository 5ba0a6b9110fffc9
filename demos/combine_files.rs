//! Combine guest files example
//!
//! This example demonstrates the core functionality of guest-toolhub:
//! - Creating a hub instance
//! - Subscribing to events
//! - Combining guest account files given on the command line
//! - Writing `combined_guest.json` into the output directory
//!
//! Usage: `cargo run --example combine_files -- guest100.dat guest101.dat`

use guest_toolhub::config::{CombinerConfig, Config};
use guest_toolhub::{Error, Event, RawInput, ToolHub};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        eprintln!("Please select at least one .dat file.");
        eprintln!("usage: combine_files <guest.dat>...");
        std::process::exit(2);
    }

    let config = Config {
        combiner: CombinerConfig {
            output_dir: "combined".into(),
            max_concurrent_reads: 8,
            ..Default::default()
        },
        ..Default::default()
    };

    let hub = ToolHub::new(config)?;

    // Subscribe to events
    let mut events = hub.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                Event::InputSkipped { name, kind, reason, .. } => {
                    println!("✗ Skipped {} ({}): {}", name, kind, reason);
                }
                Event::BatchCompleted { records, skipped } => {
                    println!("✓ Combined {} record(s), skipped {}", records, skipped);
                }
                _ => {}
            }
        }
    });

    let inputs = paths.into_iter().map(RawInput::from_path).collect();

    let outcome = hub.combine_to_dir(inputs).await;

    // Closing the channel lets the printer drain and exit
    drop(hub);
    printer.await.ok();

    match outcome {
        Ok(path) => println!("📄 Wrote {}", path.display()),
        Err(Error::NoValidData { .. }) => println!("No valid .dat file data found."),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
