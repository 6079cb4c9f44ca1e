// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Validate the configuration (seed URL, filter pattern, output dir)
// 3. Set up logging and the Ctrl-C handler
// 4. Run the crawl session with a progress renderer attached
// 5. Print the summary and exit with the proper code
//    (0 = completed, 1 = cancelled, 2 = configuration/startup error)
//
// Per-URL failures do NOT change the exit code: a crawl that finished with
// some 404s in it still completed.
// =============================================================================

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

// anyhow::Result is like std::result::Result but simpler for applications
// It lets us return any error type with the ? operator
use anyhow::Result;
use clap::Parser;

use fetchanything::cli::Cli;
use fetchanything::{
    CrawlConfig, CrawlEvent, CrawlResult, CrawlSession, FilenamePattern, ProgressHook,
    SessionState,
};

// The #[tokio::main] attribute transforms our async main into a real main
// function. It creates a tokio runtime and runs our async code inside it.
#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Configuration and startup errors land here
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // All three constructors validate their input; any ConfigError aborts
    // here, before the first request
    let seed = cli.seed_url()?;
    let pattern = FilenamePattern::new(cli.filter.as_deref())?;

    let config = CrawlConfig {
        seed: seed.clone(),
        max_depth: cli.level,
        out_dir: cli.out.clone(),
        workers: cli.workers,
        timeout: Duration::from_secs(cli.timeout),
    };

    let mut session = CrawlSession::new(config, pattern)?;

    if !cli.json {
        println!("🔍 Crawling: {}", seed);
        println!("📊 Max depth: {}, output: {}", cli.level, cli.out.display());
        session.set_progress_hook(console_progress());
    }

    // Ctrl-C flips the cancellation flag; the session stops at the next
    // safe point and still hands back the partial result
    let cancel = session.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n⚠️  Interrupted, finishing in-flight requests...");
            cancel.store(true, Ordering::SeqCst);
        }
    });

    let result = session.run().await;

    if cli.json {
        // Serialize the whole result and print
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result);
    }

    Ok(match session.state() {
        SessionState::Cancelled => 1,
        _ => 0,
    })
}

// Log level follows the -v flag; RUST_LOG still wins when set, so
// `RUST_LOG=fetchanything=debug` works without -v
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .init();
}

// The progress renderer the engine calls back into. Rendering lives out
// here on purpose: the engine reports, the CLI draws.
fn console_progress() -> ProgressHook {
    Arc::new(|event| match event {
        CrawlEvent::TaskDequeued { url, depth } => {
            println!("  Crawling [depth {}]: {}", depth, url);
        }
        CrawlEvent::DownloadCompleted { url, path } => {
            println!("  ✅ Saved {} -> {}", url, path.display());
        }
        CrawlEvent::DownloadFailed { url, kind } => {
            eprintln!("  ❌ Failed {}: {}", url, kind);
        }
    })
}

// Prints the human-readable summary table
fn print_summary(result: &CrawlResult) {
    println!();

    if !result.failed.is_empty() {
        println!("{:<60} {:<30}", "FAILED URL", "REASON");
        println!("{}", "=".repeat(90));
        for failure in &result.failed {
            println!(
                "{:<60} {:<30}",
                truncate(&failure.url, 57),
                failure.error.to_string()
            );
        }
        println!();
    }

    println!("📊 Summary:");
    println!("   📄 Pages visited: {}", result.pages_visited);
    println!("   ✅ Downloaded: {}", result.downloaded.len());
    println!("   ❌ Failed: {}", result.failed.len());
}

// Truncates a URL so the table columns stay lined up
fn truncate(s: &str, max: usize) -> String {
    if s.len() > max {
        format!("{}...", &s[..max])
    } else {
        s.to_string()
    }
}
