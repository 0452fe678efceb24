//! Seshat binary entry point

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    seshat::run().await
}
