use anyhow::Context;
use newsagent::configuration::get_configuration;
use newsagent::startup::Application;
use newsagent::telemetry::{get_subscriber, init_subscriber};

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("newsagent".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber).context("Failed to initialise telemetry.")?;

    let configuration = get_configuration().context("Failed to read configuration.")?;
    let application = Application::build(&configuration).await?;
    tracing::info!(
        host = %configuration.application.host,
        "Starting the NewsAgent server"
    );
    application
        .run_until_stopped()
        .await
        .map_err(|e| anyhow::anyhow!("The server stopped with an error: {}", e))
}
