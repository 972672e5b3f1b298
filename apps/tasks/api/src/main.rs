//! Tasks API - Entry Point

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tasks_api::run().await
}
