//! Play five-card draw against Luigi, or against another player on the
//! local network.

use anyhow::{Context, Result};
use env_logger::Env;
use log::info;
use pico_args::Arguments;
use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};

use luigi_poker::{GameConfig, PeerLink, Role};
use lp_client::app;

const HELP: &str = "\
Play five-card draw poker against Luigi

USAGE:
  lp_client [OPTIONS]

OPTIONS:
  --host                Wait for another player to join
  --join IP             Join a player hosting at IP
  --port PORT           Port to host on or join  [default: 5555]
  --save PATH           Solo save file  [default: balances.json]

FLAGS:
  -h, --help            Print help information

ENVIRONMENT:
  LUIGI_PORT, LUIGI_SAVE_PATH, LUIGI_NETWORK_WAGER, LUIGI_ROUND_DELAY_MS
";

enum Mode {
    Solo,
    Host,
    Join(IpAddr),
}

struct Args {
    mode: Mode,
    port: Option<u16>,
    save_path: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let host = pargs.contains("--host");
    let join: Option<IpAddr> = pargs.opt_value_from_str("--join")?;
    let mode = match (host, join) {
        (true, Some(_)) => anyhow::bail!("--host and --join can't be used together"),
        (true, None) => Mode::Host,
        (false, Some(ip)) => Mode::Join(ip),
        (false, None) => Mode::Solo,
    };

    let args = Args {
        mode,
        port: pargs.opt_value_from_str("--port")?,
        save_path: pargs.opt_value_from_str("--save")?,
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        anyhow::bail!("unexpected arguments: {remaining:?}");
    }
    Ok(args)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let mut config = GameConfig::from_env().context("invalid configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(save_path) = args.save_path {
        config.save_path = save_path;
    }

    match args.mode {
        Mode::Solo => app::run_solo(config),
        Mode::Host => {
            println!("waiting for a player on port {}...", config.port);
            let link = PeerLink::host(config.port)
                .with_context(|| format!("can't host on port {}", config.port))?;
            info!("{} joined", link.peer_addr());
            app::run_network(&config, Role::Host, link)
        }
        Mode::Join(ip) => {
            let addr = SocketAddr::new(ip, config.port);
            let link = PeerLink::connect(&addr).with_context(|| format!("can't reach {addr}"))?;
            info!("connected to {addr}");
            app::run_network(&config, Role::Client, link)
        }
    }
}
