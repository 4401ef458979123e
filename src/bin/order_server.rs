//! Order export API server binary
//!
//! Serves `POST /export-excel`: JSON line items in, priced .xlsx out.

use clap::Parser;
use order_forge::api::{run_api_server, server::DEFAULT_BODY_LIMIT, ApiConfig};

#[derive(Parser, Debug)]
#[command(name = "order-server")]
#[command(version)]
#[command(about = "Order export server - line items to a priced Excel workbook")]
#[command(long_about = r#"
Order export server

Endpoints:
  - POST /export-excel     - Build the order workbook (.xlsx)
  - GET  /health           - Health check
  - GET  /version          - Server version info
  - GET  /                 - API summary

Request body:
  {"items": [{"id": "1", "url": "https://detail.1688.com/...", "photo": null,
              "quantity": 2, "color": "", "size": "", "price": 100}]}

Example usage:
  order-server                           # Start on localhost:8080
  order-server --host 0.0.0.0 --port 3000

  curl -X POST http://localhost:8080/export-excel \
    -H "Content-Type: application/json" \
    -d @items.json -o order.xlsx
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "ORDER_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "ORDER_PORT")]
    port: u16,

    /// Maximum request body size in bytes
    #[arg(long, default_value_t = DEFAULT_BODY_LIMIT, env = "ORDER_BODY_LIMIT")]
    body_limit: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        body_limit: args.body_limit,
    };

    run_api_server(config).await
}
