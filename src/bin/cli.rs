//! budget-sync CLI
//!
//! Loads the budget dataset, optionally scrapes product pages for current
//! prices, then reconciles the selected bill's sections against the portal.
//! Signing in (including MFA) is left to the operator in the opened browser
//! window.

use anyhow::{bail, Context, Result};
use budget_sync::price::prepare_screenshot_dir;
use budget_sync::{
    ChromeDriver, ChromeOptions, Dataset, LocatorSet, PriceScraper, Reconciler, RunConfig,
    UiDriver,
};
use clap::Parser;
use log::info;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "budget-sync",
    version,
    about = "Reconcile a CSV budget dataset against the campus engagement portal"
)]
struct Args {
    /// Input CSV dataset
    #[arg(long, default_value = "Fall25_Bills_Budget.csv")]
    csv: PathBuf,

    /// Bill title selecting the rows to reconcile
    #[arg(long)]
    bill: String,

    /// Edit URL of the bill's budgeting request
    #[arg(long)]
    bill_url: String,

    /// Portal landing page opened for the interactive sign-in
    #[arg(long, default_value = "https://gatech.campuslabs.com/engage/")]
    portal: String,

    /// Directory with per-item attachment images
    #[arg(long, default_value = "downloads")]
    downloads: PathBuf,

    /// Directory for per-item price screenshots
    #[arg(long, default_value = "screenshots")]
    screenshots: PathBuf,

    /// Where to write the cost-updated copy of the dataset
    /// (default: `<csv stem>_Updated.csv`)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Run the browser with a visible window
    #[arg(long)]
    headed: bool,

    /// Skip the product-page price pass
    #[arg(long)]
    skip_prices: bool,

    /// Skip the portal reconciliation pass
    #[arg(long)]
    skip_sync: bool,

    /// Retry ceiling for interactive steps
    #[arg(long, default_value_t = 5)]
    max_attempts: u32,

    /// JSON file overriding the element descriptor set
    #[arg(long)]
    locators: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut dataset =
        Dataset::load(&args.csv).with_context(|| format!("loading {}", args.csv.display()))?;
    let mut sections = dataset.sections(&args.bill)?;
    if sections.is_empty() {
        println!("No entries for '{}'", args.bill);
        return Ok(());
    }
    let item_count: usize = sections.iter().map(|s| s.items.len()).sum();
    info!("selected {} section(s), {item_count} item(s)", sections.len());

    let locators = load_locators(args.locators.as_deref())?;
    let config = RunConfig::new()
        .max_attempts(args.max_attempts)
        .downloads_dir(args.downloads.clone())
        .screenshots_dir(args.screenshots.clone());

    // The sync pass needs a visible window for the operator to sign in
    let headless = !args.headed && args.skip_sync;
    let driver = ChromeDriver::launch(ChromeOptions::new().headless(headless))
        .context("launching Chrome")?;

    if !args.skip_prices {
        prepare_screenshot_dir(&args.screenshots)
            .with_context(|| format!("preparing {}", args.screenshots.display()))?;

        let scraper = PriceScraper::new(&driver, &config);
        let updates = scraper.enrich(&mut sections);
        info!("price pass updated {} item(s)", updates.len());

        if !updates.is_empty() {
            dataset.apply_updates(&updates);
            let out = args
                .output
                .clone()
                .unwrap_or_else(|| updated_path(&args.csv));
            dataset
                .write(&out)
                .with_context(|| format!("writing {}", out.display()))?;
            info!("updated costs written to {}", out.display());
        }
    }

    if !args.skip_sync {
        wait_for_sign_in(&driver, &args.portal)?;

        let engine = Reconciler::new(&driver, &config, &locators);
        engine
            .open_bill(&args.bill_url)
            .context("opening the budget tab")?;

        let report = engine.run(&sections);
        report.log_summary();

        let failed = report.failures().count();
        if failed > 0 {
            bail!("{failed} item(s) failed to reconcile; re-run to retry");
        }
        println!("All items for '{}' processed successfully.", args.bill);
    }

    Ok(())
}

fn load_locators(path: Option<&std::path::Path>) -> Result<LocatorSet> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
        }
        None => Ok(LocatorSet::default()),
    }
}

/// Navigate to the portal and block until the operator confirms they are
/// signed in. Authentication (including MFA) is deliberately not automated.
fn wait_for_sign_in<D: UiDriver>(driver: &D, portal: &str) -> Result<()> {
    driver.navigate(portal).context("opening the portal")?;

    print!("Sign in to the portal in the browser window (complete MFA if prompted), then press Enter... ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;

    info!("continuing at {}", driver.current_url().unwrap_or_default());
    Ok(())
}

fn updated_path(csv: &std::path::Path) -> PathBuf {
    let stem = csv
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string());
    csv.with_file_name(format!("{stem}_Updated.csv"))
}
