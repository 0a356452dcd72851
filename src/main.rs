use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use studydeck_lib::config::ServerConfig;
use studydeck_lib::server;

#[derive(Parser)]
#[command(name = "studydeck", about = "Study set server", version)]
struct Args {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    bind: Option<IpAddr>,

    /// Port to listen on (0 picks a free port)
    #[arg(long)]
    port: Option<u16>,

    /// Directory holding the study set files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Disable permissive CORS headers
    #[arg(long)]
    no_cors: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config =
        ServerConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if args.no_cors {
        config.permissive_cors = false;
    }

    let server = server::start_server(&config)
        .await
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to start server")?;
    println!("Server running on {}", server.base_url());

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    server.shutdown().await;

    Ok(())
}
