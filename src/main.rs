#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = edulink_rust::run().await {
        eprintln!("edulink-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
