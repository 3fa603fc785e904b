use std::fs::File;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use mercodex::backend::HttpBackend;
use mercodex::core::config;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "mercodex", about = "Product research assistant in your terminal")]
struct Args {
    /// Backend base URL (overrides MERCODEX_BASE_URL and the config file)
    #[arg(short, long)]
    base_url: Option<String>,

    /// User id sent with every request
    #[arg(short, long)]
    user_id: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // File logger: the terminal belongs to the UI
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("mercodex.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let config = config::resolve(args.base_url, args.user_id);
    log::info!(
        "Mercodex starting up (backend={}, user={})",
        config.base_url,
        config.user_id
    );

    let backend = Arc::new(HttpBackend::new(
        config.base_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    ));
    mercodex::tui::run(config, backend)
}
