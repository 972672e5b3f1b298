//! Notification Worker - Entry Point

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tasks_notification_worker::run().await
}
