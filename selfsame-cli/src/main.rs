//! Selfsame CLI
//!
//! Passive identity correlation across public platforms.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use selfsame_core::InvestigationReport;
use selfsame_runtime::{Investigator, InvestigatorConfig};
use selfsame_session::Credentials;

mod render;

const BANNER: &str = r#"
 ___  ___| |/ _|___  __ _ _ __ ___   ___
/ __|/ _ \ | |_/ __|/ _` | '_ ` _ \ / _ \
\__ \  __/ |  _\__ \ (_| | | | | | |  __/
|___/\___|_|_| |___/\__,_|_| |_| |_|\___|
"#;

#[derive(Parser)]
#[command(name = "selfsame")]
#[command(author, version, about = "Passive identity correlation across public platforms", long_about = None)]
struct Cli {
    /// Target handle on the primary platform
    #[arg(short = 'u', long)]
    handle: String,

    /// Raw cookie string for the primary-platform session
    #[arg(long)]
    cookie: Option<String>,

    /// Path to a cookies JSON file (plain map or browser export)
    #[arg(long)]
    cookies_file: Option<PathBuf>,

    /// Write the JSON report to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the Markdown report to this path
    #[arg(long)]
    md: Option<PathBuf>,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1")]
    verbose: u8,

    /// Suppress the banner
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    if !cli.quiet {
        println!("{}", BANNER);
        println!("selfsame v{}\n", env!("CARGO_PKG_VERSION"));
    }

    let credentials = Credentials::load(cli.cookie.as_deref(), cli.cookies_file.as_deref())?
        .ok_or_else(|| {
            anyhow::anyhow!("Session credential required. Use --cookie or --cookies-file")
        })?;

    let investigator = Investigator::new(credentials, InvestigatorConfig::default())?;

    println!("[+] Checking credential health...");
    investigator.check_credentials().await?;

    println!("[+] Investigating: {}\n", cli.handle);
    let report = investigator.investigate(&cli.handle).await?;

    print_summary(&report);

    if let Some(path) = &cli.json {
        render::save_json(&report, path)?;
        println!("\n[+] JSON report saved to {}", path.display());
    }
    if let Some(path) = &cli.md {
        render::save_markdown(&report, path)?;
        println!("[+] Markdown report saved to {}", path.display());
    }

    Ok(())
}

fn print_summary(report: &InvestigationReport) {
    println!("[+] RESULT SUMMARY");
    println!("{:<22}: {}", "handle", report.handle);
    println!("{:<22}: {}", "platform_id", report.platform_id);
    println!("{:<22}: {}", "full_name", report.profile.full_name);
    println!("{:<22}: {}", "biography", report.profile.biography);
    println!("{:<22}: {}", "external_url", report.profile.external_url);
    println!("{:<22}: {}", "followers", report.profile.followers);
    println!("{:<22}: {}", "following", report.profile.following);
    println!("{:<22}: {}", "posts", report.profile.posts);
    println!("{:<22}: {}", "verified", report.profile.verified);
    println!("{:<22}: {}", "business", report.profile.business);
    println!("{:<22}: {}", "private", report.profile.private);

    let exposure = if report.vulnerability_checks.is_vulnerable() {
        "VULNERABLE"
    } else if report.vulnerability_checks.inconclusive {
        "INCONCLUSIVE"
    } else {
        "NOT_VULNERABLE"
    };
    println!("{:<22}: {}", "exposure_status", exposure);

    println!("\n[+] PLATFORM PRESENCE");
    for (platform, result) in &report.platforms {
        if result.exists {
            println!("  - {} FOUND: {}", platform.to_uppercase(), result.url);
        } else {
            println!("  - {} not found", platform.to_uppercase());
        }
    }

    if !report.advanced_platforms.is_empty() {
        println!("\n[+] CONTENT MATCHES");
        for (platform, result) in &report.advanced_platforms {
            println!(
                "  - {}: confidence {} ({})",
                platform.to_uppercase(),
                result.confidence,
                result.matches.join(", ")
            );
        }
    }

    let pastes = &report.leak_signals.pastes;
    if pastes.is_empty() {
        println!("\n[+] NO PASTE LEAKS FOUND");
    } else {
        println!("\n[+] PASTE LEAKS FOUND");
        for paste in pastes {
            println!("  - {} ({})", paste.url, paste.site);
            if !paste.found_keywords.is_empty() {
                println!("    Keywords: {}", paste.found_keywords.join(", "));
            }
        }
    }

    println!("\n[+] ANALYSIS");
    println!(
        "{:<22}: {:?}",
        "timeline_consistency", report.timeline_consistency
    );
    println!("{:<22}: {}", "confidence", report.confidence);
    println!("{:<22}: {}", "risk", report.risk);
    println!("{:<22}: {}", "risk_explanation", report.risk_explanation);
}
