use carsharing::console::Console;
use carsharing::core::config::{self, ResolvedConfig};
use carsharing::store::Database;
use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "carsharing", about = "Console car sharing manager")]
struct Args {
    /// Database name, stored as db/<NAME>.json
    #[arg(long)]
    database_file_name: Option<String>,

    /// Config file to use instead of ~/.carsharing/config.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

fn init_logging(config: &ResolvedConfig) {
    // stdout is the UI, so logs only ever go to a file.
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&config.log_file) {
        let _ = WriteLogger::init(config.log_level, log_config, log_file);
    }
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = match &args.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    }
    .map_err(io::Error::other)?;
    let resolved = config::resolve(&file_config, args.database_file_name.as_deref());

    init_logging(&resolved);
    log::info!(
        "Car sharing starting up with database {}",
        resolved.database_path.display()
    );

    let store = Database::open(&resolved.database_path).map_err(io::Error::other)?;
    let mut console = Console::stdio();
    carsharing::core::run(store, &mut console).map_err(io::Error::other)?;
    Ok(())
}
