//! Portfolio Site - binary entry point
//! Delegates to the library for all app logic.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    portfolio_site::run().await
}
