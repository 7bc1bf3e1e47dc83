#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = atheno_rust::run().await {
        eprintln!("atheno-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
