use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use log::info;
use wirehttp_rs::{HttpServer, ServerConfig, ServerError};

#[derive(Parser)]
#[command(name = "wirehttp")]
#[command(about = "Minimal HTTP/1.1 file server", long_about = None)]
struct Cli {
    /// Directory served by /files/{name}
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long)]
    addr: Option<SocketAddr>,

    /// Maximum number of connections handled at once
    #[arg(long)]
    max_connections: Option<usize>,

    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log every connection event
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn server_config(&self) -> Result<ServerConfig, ServerError> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_json_file(path)?,
            None => ServerConfig::default(),
        };
        if let Some(directory) = &self.directory {
            config.base_dir = directory.clone();
        }
        if let Some(addr) = self.addr {
            config.addr = addr;
        }
        if let Some(max_connections) = self.max_connections {
            config.max_connections = max_connections;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = cli.server_config()?;
    if cli.debug {
        info!("Debugging turned on");
    }

    HttpServer::new(config).start().await
}
