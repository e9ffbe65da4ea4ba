use clap::Parser;
use screenshot_watcher::app::{self, AppOptions};
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "screenshot-watcher")]
#[command(about = "Moves screenshots out of a folder, once or continuously while watching it")]
struct Cli {
	/// Source folder to search for screenshots
	#[arg(long)]
	src: PathBuf,

	/// Destination folder for screenshots (created if missing)
	#[arg(long)]
	dest: PathBuf,

	/// Show what would be done without moving files
	#[arg(long)]
	dry_run: bool,

	/// Keep watching the source folder after the initial pass
	#[arg(short, long)]
	watch: bool,

	/// Enable verbose logging
	#[arg(short, long)]
	verbose: bool,

	/// Regular expression to use instead of the built-in screenshot pattern
	#[arg(long)]
	pattern: Option<String>,

	/// Ignore repeated creations of the same file name within this many milliseconds
	#[arg(long, default_value_t = 2000)]
	dedup_window_ms: u64,

	/// Minimum milliseconds between sweeps of the dedup table
	#[arg(long, default_value_t = 30_000)]
	cleanup_interval_ms: u64,

	/// Milliseconds to wait after a file appears before moving it
	#[arg(long, default_value_t = 100)]
	settle_delay_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	let level = if cli.verbose {
		Level::DEBUG
	} else {
		Level::INFO
	};
	tracing_subscriber::fmt().with_max_level(level).init();

	let options = AppOptions {
		dry_run: cli.dry_run,
		watch: cli.watch,
		pattern: cli.pattern,
		dedup_window: Duration::from_millis(cli.dedup_window_ms),
		cleanup_interval: Duration::from_millis(cli.cleanup_interval_ms),
		settle_delay: Duration::from_millis(cli.settle_delay_ms),
		..AppOptions::new(cli.src, cli.dest)
	};

	let cancel = CancellationToken::new();
	let ctrl_c = cancel.clone();
	tokio::spawn(async move {
		if tokio::signal::ctrl_c().await.is_ok() {
			info!("Shutting down watcher...");
			ctrl_c.cancel();
		}
	});

	app::run(options, cancel).await?;
	Ok(())
}
