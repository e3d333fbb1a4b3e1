use std::path::PathBuf;

use color_eyre::eyre::{
    Result,
    eyre,
};
use holdem_client::client;

fn print_usage_and_exit() -> ! {
    println!(
        "Usage: holdem-client [--server-url <url>] [--players <n>] [--dealer <n>]\n\
         [--unit <chips>] [--log-dir <path>]\n\
         \n\
         Flags:\n\
           --server-url <url>  Game server base URL (default {})\n\
           --players <n>       Players seated at the table (default {})\n\
           --dealer <n>        Dealer seat index (default 0)\n\
           --unit <chips>      Table unit; bet floor is one unit, raise floor two (default {})\n\
           --log-dir <path>    Directory for client log files (default {})",
        client::DEFAULT_SERVER_URL,
        client::DEFAULT_NUM_PLAYERS,
        client::DEFAULT_TABLE_UNIT,
        client::DEFAULT_LOG_DIR,
    );
    std::process::exit(0);
}

fn parse_cli_args() -> Result<client::AppConfig> {
    let mut args = std::env::args().skip(1);
    let mut server_url: Option<String> = None;
    let mut players: Option<u32> = None;
    let mut dealer: Option<u32> = None;
    let mut unit: Option<u64> = None;
    let mut log_dir: Option<String> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--server-url" => {
                let url = args
                    .next()
                    .ok_or_else(|| eyre!("--server-url requires a URL argument"))?;
                if server_url.is_some() {
                    return Err(eyre!("--server-url may only be specified once"));
                }
                server_url = Some(url);
            }
            "--players" => {
                let n = args
                    .next()
                    .ok_or_else(|| eyre!("--players requires a number argument"))?;
                if players.is_some() {
                    return Err(eyre!("--players may only be specified once"));
                }
                players = Some(
                    n.parse()
                        .map_err(|_| eyre!("--players expects a positive integer"))?,
                );
            }
            "--dealer" => {
                let n = args
                    .next()
                    .ok_or_else(|| eyre!("--dealer requires a number argument"))?;
                if dealer.is_some() {
                    return Err(eyre!("--dealer may only be specified once"));
                }
                dealer = Some(
                    n.parse()
                        .map_err(|_| eyre!("--dealer expects a non-negative integer"))?,
                );
            }
            "--unit" => {
                let n = args
                    .next()
                    .ok_or_else(|| eyre!("--unit requires a chip amount"))?;
                if unit.is_some() {
                    return Err(eyre!("--unit may only be specified once"));
                }
                unit = Some(
                    n.parse()
                        .map_err(|_| eyre!("--unit expects a positive integer"))?,
                );
            }
            "--log-dir" => {
                let dir = args
                    .next()
                    .ok_or_else(|| eyre!("--log-dir requires a path argument"))?;
                if log_dir.is_some() {
                    return Err(eyre!("--log-dir may only be specified once"));
                }
                log_dir = Some(dir);
            }
            "--help" | "-h" => print_usage_and_exit(),
            other => return Err(eyre!("Unknown argument: {other}")),
        }
    }

    let num_players = players.unwrap_or(client::DEFAULT_NUM_PLAYERS);
    if num_players < 2 {
        return Err(eyre!("--players must be at least 2"));
    }
    let dealer_index = dealer.unwrap_or(0);
    if dealer_index >= num_players {
        return Err(eyre!("--dealer must be a seat below --players"));
    }
    let table_unit = unit.unwrap_or(client::DEFAULT_TABLE_UNIT);
    if table_unit == 0 {
        return Err(eyre!("--unit must be at least 1"));
    }
    let log_dir = PathBuf::from(
        shellexpand::tilde(log_dir.as_deref().unwrap_or(client::DEFAULT_LOG_DIR))
            .into_owned(),
    );

    Ok(client::AppConfig {
        server_url: server_url
            .unwrap_or_else(|| client::DEFAULT_SERVER_URL.to_string()),
        num_players,
        dealer_index,
        table_unit,
        log_dir,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let config = parse_cli_args()?;
    let _guard = client::init_tracing(&config.log_dir)?;
    tracing::info!("starting holdem-client");
    client::run_app(config).await
}
