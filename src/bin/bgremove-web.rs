//! Background removal web service
//!
//! HTTP server exposing background removal and stock photo search,
//! built on the bgremove-web library crate.

use bgremove_web::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::main().await
}
