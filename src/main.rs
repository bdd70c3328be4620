use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use oanda_client::model::{Instrument, OrderId, Price, TradeId};
use oanda_client::{ClientConfig, Environment, OandaClient};
use rust_decimal::Decimal;
use std::io::Write;

#[derive(Parser)]
#[command(name = "oanda", version, about = "OANDA v3 REST API client")]
struct Cli {
    /// Where credentials are read from
    #[arg(long, value_enum, default_value_t = Source::Env, global = true)]
    source: Source,

    /// Practice or Trade (defaults to OANDA_ENVIRONMENT / ENVIRONMENT)
    #[arg(long, global = true)]
    environment: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Source {
    /// OANDA_ACCOUNT_ID / OANDA_API_KEY environment variables
    Env,
    /// /Oanda/<ENV>/AccountID and /Oanda/<ENV>/APIKey parameters
    Params,
}

#[derive(Subcommand)]
enum Command {
    /// List account names
    Accounts,
    /// Pending orders
    #[command(subcommand)]
    Orders(OrdersCommand),
    /// Open trades
    #[command(subcommand)]
    Trades(TradesCommand),
    /// Order book snapshots
    #[command(subcommand)]
    Orderbook(OrderBookCommand),
}

#[derive(Subcommand)]
enum OrdersCommand {
    List(JsonFlag),
    Get { id: String },
    Cancel { id: String },
}

#[derive(Subcommand)]
enum TradesCommand {
    List(JsonFlag),
    Close { id: String },
}

#[derive(Subcommand)]
enum OrderBookCommand {
    Fetch {
        instrument: String,
        /// Historical snapshot time (RFC3339)
        #[arg(long)]
        time: Option<DateTime<Utc>>,
        #[command(flatten)]
        json: JsonFlag,
    },
    /// Buckets surrounding a price
    Vicinity {
        instrument: String,
        #[arg(long)]
        price: Decimal,
        #[arg(long, default_value_t = 3)]
        count: usize,
    },
}

#[derive(Args)]
struct JsonFlag {
    /// Print the raw API response
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries command output, logs go to stderr
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let client = build_client(&cli).await?;
    tracing::info!(base_url = client.base_url(), "OANDA client ready");

    match cli.command {
        Command::Accounts => {
            let names = client.list_account_names().await?;
            println!("account name list: {:?}", names);
        }
        Command::Orders(OrdersCommand::List(flag)) => {
            if flag.json {
                print_raw(&client.list_orders_json().await?)?;
            } else {
                for order in client.list_orders().await? {
                    println!("{:?}", order);
                }
            }
        }
        Command::Orders(OrdersCommand::Get { id }) => {
            println!("{:?}", client.get_order(&OrderId::from(id)).await?);
        }
        Command::Orders(OrdersCommand::Cancel { id }) => {
            client.cancel_order(&OrderId::from(id)).await?;
            println!("order canceled");
        }
        Command::Trades(TradesCommand::List(flag)) => {
            if flag.json {
                print_raw(&client.list_open_trades_json().await?)?;
            } else {
                for trade in client.list_open_trades().await? {
                    println!("{:?}", trade);
                }
            }
        }
        Command::Trades(TradesCommand::Close { id }) => {
            let id = TradeId::from(id);
            client
                .close_trade(&id)
                .await
                .with_context(|| format!("failed to close trade (id={})", id))?;
            println!("trade closed");
        }
        Command::Orderbook(OrderBookCommand::Fetch {
            instrument,
            time,
            json,
        }) => {
            let instrument = Instrument::from(instrument);
            if json.json {
                print_raw(&client.get_order_book_json(&instrument, time).await?)?;
            } else {
                println!("{:?}", client.get_order_book(&instrument, time).await?);
            }
        }
        Command::Orderbook(OrderBookCommand::Vicinity {
            instrument,
            price,
            count,
        }) => {
            let book = client
                .get_order_book(&Instrument::from(instrument), None)
                .await?;
            let vicinity = book
                .extract_bucket_vicinity(Price::new(price), count)
                .context("failed to get vicinity from order book")?;
            println!("lower={:?}", vicinity.lower);
            println!("higher={:?}", vicinity.higher);
        }
    }

    Ok(())
}

async fn build_client(cli: &Cli) -> anyhow::Result<OandaClient> {
    let environment = match cli.environment.as_deref() {
        Some(raw) => match Environment::parse(raw) {
            Some(environment) => Some(environment),
            None => bail!("unknown environment {:?} (expected Practice or Trade)", raw),
        },
        None => None,
    };

    let config = match cli.source {
        Source::Env => {
            let mut config = ClientConfig::from_env()?;
            if let Some(environment) = environment {
                config = ClientConfig {
                    base_url: environment.rest_base_url().to_string(),
                    environment,
                    ..config
                };
            }
            config
        }
        Source::Params => {
            let environment = match environment {
                Some(environment) => environment,
                None => Environment::from_env()?,
            };
            ClientConfig::from_parameter_store(environment).await?
        }
    };

    Ok(OandaClient::new(config)?)
}

fn print_raw(body: &[u8]) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(body)?;
    stdout.write_all(b"\n")?;
    Ok(())
}
