use clap::{Parser, Subcommand};
use order_forge::api::{run_api_server, server::DEFAULT_BODY_LIMIT, ApiConfig};
use order_forge::cli;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "order-forge")]
#[command(about = "Order intake export: priced, formula-bearing Excel workbooks from line items")]
#[command(long_about = "Order Forge - 1688/Taobao order sheets
Commission 5% | Exchange rate 12.2 RUB/CNY | Live Excel formulas

COMMANDS:
  export  - Items JSON to an order workbook (.xlsx)
  totals  - Print the commission and currency totals
  check   - Report which items are complete
  serve   - Run the HTTP export server

INPUT:
  {\"items\": [{\"id\": \"1\", \"url\": \"https://detail.1688.com/...\",
              \"photo\": \"data:image/png;base64,...\", \"quantity\": 2,
              \"color\": \"red\", \"size\": \"M\", \"price\": 100}]}
  A bare JSON array of items is accepted too.

EXAMPLES:
  order-forge export items.json                 # writes order_<date>.xlsx
  order-forge export items.json -o order.xlsx
  order-forge totals items.json
  order-forge serve --port 3000")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export items to an order workbook
    Export {
        /// Path to the items JSON file
        input: PathBuf,

        /// Output .xlsx path (defaults to order_<date>.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show per-row photo results
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print order totals without writing a workbook
    Totals {
        /// Path to the items JSON file
        input: PathBuf,
    },

    /// Check items against the order form rules
    Check {
        /// Path to the items JSON file
        input: PathBuf,
    },

    /// Run the HTTP export server
    Serve {
        /// Host address to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1", env = "ORDER_HOST")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8080", env = "ORDER_PORT")]
        port: u16,

        /// Maximum request body size in bytes
        #[arg(long, default_value_t = DEFAULT_BODY_LIMIT, env = "ORDER_BODY_LIMIT")]
        body_limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            input,
            output,
            verbose,
        } => cli::export(input, output, verbose)?,

        Commands::Totals { input } => cli::totals(input)?,

        Commands::Check { input } => cli::check(input)?,

        Commands::Serve {
            host,
            port,
            body_limit,
        } => {
            let config = ApiConfig {
                host,
                port,
                body_limit,
            };
            tokio::runtime::Runtime::new()?.block_on(run_api_server(config))?;
        }
    }

    Ok(())
}
