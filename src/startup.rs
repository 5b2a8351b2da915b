use crate::catchers::*;
use crate::configuration::{DatabaseSettings, Settings};
use crate::port_saver;
use crate::port_saver::Port;
use crate::routes::*;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use rocket::fairing::{self, AdHoc};
use rocket::figment::util::map;
use rocket::figment::value::{Map, Value};
use rocket::figment::Figment;
use rocket::{Build, Ignite, Rocket};
use rocket_sync_db_pools::database;
use secrecy::ExposeSecret;

/// Pooled connection to the application database, shared by every request.
#[database("newsagent")]
pub struct NewsAgentDbConn(diesel::PgConnection);

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub struct Application {
    pub server: Rocket<Ignite>,
    pub port: Port,
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Invalid admin settings: {0}")]
    InvalidAdminSettings(String),
    #[error("Failed to ignite the server: {0}")]
    Ignite(String),
}

impl Application {
    pub async fn build(configuration: &Settings) -> Result<Application, StartupError> {
        let admin_email_suffix = configuration
            .admin
            .email_suffix()
            .map_err(StartupError::InvalidAdminSettings)?;
        let (port_saver, port) = port_saver::create_pair();

        let server = rocket::custom(figment(configuration))
            .attach(NewsAgentDbConn::fairing())
            .attach(AdHoc::try_on_ignite("Database migrations", run_migrations))
            .attach(port_saver)
            .manage(admin_email_suffix)
            .mount(
                "/",
                routes![
                    health_check,
                    join_waitlist,
                    admin_home,
                    list_waitlist,
                    list_subscriptions,
                    get_subscription,
                    create_subscription
                ],
            )
            .register("/", catchers![unprocessable_entity_to_bad_request])
            .ignite()
            .await
            .map_err(|e| StartupError::Ignite(e.to_string()))?;

        Ok(Application { server, port })
    }

    pub async fn run_until_stopped(self) -> Result<(), rocket::Error> {
        self.server.launch().await.map(|_| ())
    }
}

fn figment(configuration: &Settings) -> Figment {
    rocket::Config::figment()
        .merge(("address", configuration.application.host))
        .merge(("port", configuration.application.port.unwrap_or(0)))
        .merge(("log_level", rocket::config::LogLevel::Off))
        .merge((
            "databases",
            map!["newsagent" => database_config(&configuration.database)],
        ))
}

fn database_config(settings: &DatabaseSettings) -> Map<String, Value> {
    map! {
        "url".to_string() => settings.connection_string().expose_secret().as_str().into(),
        "pool_size".to_string() => settings.pool_size.into(),
        "timeout".to_string() => settings.timeout_seconds.into()
    }
}

async fn run_migrations(rocket: Rocket<Build>) -> fairing::Result {
    let conn = match NewsAgentDbConn::get_one(&rocket).await {
        Some(conn) => conn,
        None => {
            tracing::error!("No database connection available to run migrations.");
            return Err(rocket);
        }
    };
    let outcome = conn
        .run(|c| {
            c.run_pending_migrations(MIGRATIONS)
                .map(|versions| versions.len())
                .map_err(|e| e.to_string())
        })
        .await;
    match outcome {
        Ok(applied) => {
            tracing::info!(applied, "Database migrations are up to date.");
            Ok(rocket)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to run database migrations.");
            Err(rocket)
        }
    }
}
