use rask_log_producer::app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::main().await
}
