use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    ledger::cli::run().await
}
