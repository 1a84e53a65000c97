//! verso-demo - walkthrough of the version store.
//!
//! Records a few versions of a file, reads them back, then fans out
//! concurrent writers against a single file and checks the resulting ids.

use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use verso_core::{InMemoryVersionStore, StoreConfig, Version, VersionDraft, VersionStore};

const WRITERS: usize = 100;

fn print_version(v: &Version) {
    println!(
        "Version ID: {}, Author: {}, Description: {}, Created: {}, Data: {}",
        v.id,
        v.author.as_deref().unwrap_or("-"),
        v.description.as_deref().unwrap_or("-"),
        v.created_at.to_rfc3339(),
        v.payload_str().unwrap_or("<binary>"),
    );
}

fn load_config() -> Result<StoreConfig, Box<dyn std::error::Error>> {
    match std::env::var("VERSO_CONFIG") {
        Ok(path) => {
            info!("Loading store config from {}", path);
            Ok(StoreConfig::from_file(path)?)
        }
        Err(_) => Ok(StoreConfig::from_env()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive(Level::INFO.into())
                .add_directive("verso_demo=debug".parse()?),
        )
        .init();

    let store = Arc::new(InMemoryVersionStore::with_config(load_config()?)?);

    let file_id = "testfile.txt";
    store.add_version_with(
        file_id,
        VersionDraft::new("Version 1 data")
            .authored_by("user123")
            .with_description("Initial version"),
    )?;
    store.add_version_with(
        file_id,
        VersionDraft::new("Version 2 data")
            .authored_by("user456")
            .with_description("Second version"),
    )?;

    println!("Retrieved version 1:");
    print_version(&store.get_version(file_id, 1)?);
    println!("Retrieved version 2:");
    print_version(&store.get_version(file_id, 2)?);

    println!("\nAll versions for '{}':", file_id);
    let before = store.list_versions(file_id)?;
    before.iter().for_each(print_version);

    store.add_version_with(
        file_id,
        VersionDraft::new("Version 3 data")
            .authored_by("user789")
            .with_description("Third version"),
    )?;

    println!("\nAll versions for '{}' after adding version 3:", file_id);
    store.list_versions(file_id)?.iter().for_each(print_version);
    println!("(earlier listing still holds {} versions)", before.len());

    if let Err(e) = store.get_version(file_id, 42) {
        println!(
            "\nLookup of version 42 failed as expected: {} [{}]",
            e,
            e.code().as_str()
        );
    }

    info!("Starting {} concurrent writers", WRITERS);
    let handles: Vec<_> = (0..WRITERS)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::task::spawn_blocking(move || {
                store.add_version("x", format!("worker {}", i).into_bytes())
            })
        })
        .collect();

    for handle in handles {
        handle.await??;
    }

    let ids: Vec<u32> = store.list_versions("x")?.iter().map(|v| v.id).collect();
    let gap_free = ids.iter().copied().eq(1..=WRITERS as u32);
    info!(versions = ids.len(), gap_free, "Concurrent writers finished");

    let summary = store.summary("x")?;
    println!(
        "\n'{}': {} versions, {} bytes, first {}, last {}",
        summary.file_id,
        summary.total_versions,
        summary.total_bytes,
        summary.first_created.to_rfc3339(),
        summary.last_modified.to_rfc3339(),
    );
    println!("Tracked files: {:?}", store.file_ids()?);

    Ok(())
}
