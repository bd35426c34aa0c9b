use anyhow::Context;
use clap::{Parser, Subcommand};
use marketlens_core::domain::analysis::Timeframe;
use marketlens_core::market::{normalize_ticker, HttpMarketDataClient};
use marketlens_core::view::{detail, search, trending};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod chat;
mod render;

#[derive(Debug, Parser)]
#[command(name = "marketlens", about = "Terminal dashboard for the stock analysis backend")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ranked list of stocks with unusual volume today.
    Trending,

    /// Full analysis for one ticker.
    Stock {
        ticker: String,

        /// Chart timeframe: "1 Day", "1 Week", "6 Months", "1 Year", "5 Year" (or 1d/1w/6m/1y/5y).
        #[arg(long, default_value = "1d", value_parser = parse_timeframe)]
        timeframe: Timeframe,
    },

    /// Look up a single ticker and show its summary.
    Search { query: String },

    /// Ask the market assistant. Interactive when no message is given.
    Chat {
        #[arg(long)]
        message: Option<String>,
    },
}

fn parse_timeframe(s: &str) -> Result<Timeframe, String> {
    Timeframe::parse(s).ok_or_else(|| format!("unknown timeframe: {s}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = marketlens_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    match args.command {
        Command::Trending => {
            let client = HttpMarketDataClient::from_settings(&settings)?;
            let page = trending::load_trending(&client, chrono::Utc::now()).await;
            print!("{}", render::trending_page(&page));
        }
        Command::Stock { ticker, timeframe } => {
            let ticker = normalize_ticker(&ticker).context("invalid ticker argument")?;
            let client = HttpMarketDataClient::from_settings(&settings)?;
            let page = detail::load_stock_detail(&client, &ticker, timeframe).await;
            print!("{}", render::detail_page(&ticker, &page));
        }
        Command::Search { query } => {
            let client = HttpMarketDataClient::from_settings(&settings)?;
            let result = search::search_stock(&client, &query).await;
            print!("{}", render::search_result(&result));
        }
        Command::Chat { message } => {
            let client = marketlens_core::llm::gemini::GeminiClient::from_settings(&settings)?;
            tracing::info!(model = %client.model(), "chat session started");
            match message {
                Some(text) => chat::ask_once(client, &text).await?,
                None => chat::repl(client).await?,
            }
        }
    }

    Ok(())
}

fn init_sentry(settings: &marketlens_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
