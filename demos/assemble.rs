//! Assembles one ETL release into an in-memory dataset and prints a
//! summary of what was decoded.
//!
//! Run with:
//!   cargo run --example assemble --release -- /path/to/etl/data
//!
//! The data directory must contain the release's raw record files laid
//! out the usual way (e.g. ETL7/ETL7LC_1). Defaults to the current
//! directory.

use std::path::Path;
use std::sync::mpsc;
use std::thread;

use etlcdb::dataset::releases;
use etlcdb::{AssembleConfig, AssembleEvent, DatasetAssembler, ErrorPolicy};

fn main() {
    let base = std::env::args().nth(1).unwrap_or_else(|| ".".to_string());
    let (family, manifest) = releases::etl7(Path::new(&base));

    println!("ETL7 ({} files, {} declared records)", manifest.len(), manifest.total_records());

    // Forward file-level progress while the assembler runs.
    let (tx, rx) = mpsc::channel();
    let reporter = thread::spawn(move || {
        for event in rx {
            match event {
                AssembleEvent::FileStarted { path, declared, .. } => {
                    println!("  {} ({} records)...", path.display(), declared);
                }
                AssembleEvent::FileFailed { path, error, .. } => {
                    println!("  {} FAILED: {}", path.display(), error);
                }
                _ => {}
            }
        }
    });

    let mut config = AssembleConfig::new(64, 64);
    config.on_error = ErrorPolicy::SkipFile;
    config.progress = Some(tx);

    let assembler = DatasetAssembler::from_family(family, config).expect("valid configuration");
    let result = assembler.assemble_parallel(&manifest).expect("assembly failed");
    drop(assembler); // releases the progress sender so the reporter drains and exits
    reporter.join().unwrap();

    println!("\nDecoded {} samples ({} distinct labels)", result.len(), result.frequencies.len());
    println!("Consistent with declared counts: {}", result.consistent);
    println!(
        "Expanded pixel range: [{}, {}]",
        result.pixel_stats.min, result.pixel_stats.max
    );

    println!("\nPer-file results:");
    println!("{:>40}  {:>10}  {:>10}", "File", "Declared", "Decoded");
    println!("{}", "-".repeat(64));
    for report in &result.file_reports {
        println!(
            "{:>40}  {:>10}  {:>10}{}",
            report.path.display().to_string(),
            report.declared,
            report.decoded,
            report.error.as_deref().map(|e| format!("  ({})", e)).unwrap_or_default(),
        );
    }

    println!("\nMost common labels:");
    let mut entries: Vec<_> = result.frequencies.counts.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
    for (label, count) in entries.iter().take(10) {
        println!("  {:>8}  {:>8}", label, count);
    }
}
