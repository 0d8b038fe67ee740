use rask_hec_relay::app;
use rask_hec_relay::error::RelayError;

#[tokio::main]
async fn main() -> Result<(), RelayError> {
    app::run().await
}
