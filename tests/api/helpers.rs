use diesel::prelude::*;
use diesel::{Connection, PgConnection};
use newsagent::authentication::compute_password_hash;
use newsagent::configuration::{get_configuration, Settings};
use newsagent::models::{NewUser, NewUserEmailAddress};
use newsagent::startup::Application;
use newsagent::telemetry::{get_subscriber, init_subscriber};
use once_cell::sync::Lazy;
use secrecy::{ExposeSecret, Secret};
use uuid::Uuid;

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".into();
    let subscriber_name = "test".into();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber).expect("Failed to initialise telemetry.");
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).expect("Failed to initialise telemetry.");
    }
});

pub const ADMIN_EMAIL_SUFFIX: &str = "@newsagent.ai";

pub struct TestApp {
    pub address: String,
    pub db_connection: PgConnection,
    pub api_client: reqwest::Client,
}

pub struct TestUser {
    pub username: String,
    pub password: String,
}

impl TestUser {
    pub fn generate() -> Self {
        Self {
            username: Uuid::new_v4().to_string(),
            password: Uuid::new_v4().to_string(),
        }
    }
}

impl TestApp {
    pub async fn post_waitlist(&self, body: String) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/waitlist", &self.address))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_as(&self, path: &str, user: Option<&TestUser>) -> reqwest::Response {
        let mut request = self.api_client.get(&format!("{}{}", &self.address, path));
        if let Some(user) = user {
            request = request.basic_auth(&user.username, Some(&user.password));
        }
        request.send().await.expect("Failed to execute request.")
    }

    pub async fn post_subscription_as(
        &self,
        body: &serde_json::Value,
        user: Option<&TestUser>,
    ) -> reqwest::Response {
        let mut request = self
            .api_client
            .post(&format!("{}/admin/subscriptions", &self.address))
            .json(body);
        if let Some(user) = user {
            request = request.basic_auth(&user.username, Some(&user.password));
        }
        request.send().await.expect("Failed to execute request.")
    }

    /// Registers a user owning `email_addresses` and returns its credentials.
    pub fn create_user(&mut self, email_addresses: &[&str]) -> TestUser {
        use newsagent::schema::{user_email_addresses, users};

        let user = TestUser::generate();
        let user_id = Uuid::new_v4();
        let password_hash = compute_password_hash(Secret::new(user.password.clone()))
            .expect("Failed to hash password.");

        diesel::insert_into(users::table)
            .values(NewUser {
                user_id: &user_id,
                username: &user.username,
                password_hash: password_hash.expose_secret(),
            })
            .execute(&mut self.db_connection)
            .expect("Failed to store test user.");

        for email_address in email_addresses.iter().copied() {
            diesel::insert_into(user_email_addresses::table)
                .values(NewUserEmailAddress {
                    user_id: &user_id,
                    email_address,
                })
                .execute(&mut self.db_connection)
                .expect("Failed to store test user email address.");
        }
        user
    }

    pub fn create_admin(&mut self) -> TestUser {
        let email = format!("ops{}", ADMIN_EMAIL_SUFFIX);
        self.create_user(&[email.as_str()])
    }
}

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.application.port = None;
        c.database.url = None;
        c.database.database_name = Uuid::new_v4().to_string();
        c.admin.email_domain_suffix = ADMIN_EMAIL_SUFFIX.into();
        c
    };

    create_database(&configuration);

    // Migrations run while the application ignites.
    let app = Application::build(&configuration)
        .await
        .expect("Failed to build application.");
    let Application { server, port } = app;
    let _ = tokio::spawn(server.launch());
    let port = port.get().await.expect("Failed to learn the server port.");

    let api_client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        db_connection: connect_to_database(&configuration),
        api_client,
    }
}

fn create_database(configuration: &Settings) {
    let connection_string = configuration.database.connection_string_without_database();
    let mut connection = PgConnection::establish(connection_string.expose_secret())
        .expect("Failed to connect to Postgres.");

    diesel::sql_query(format!(
        "CREATE DATABASE \"{}\"",
        configuration.database.database_name
    ))
    .execute(&mut connection)
    .expect("Failed to create database.");
}

fn connect_to_database(configuration: &Settings) -> PgConnection {
    let connection_string = configuration.database.connection_string();
    PgConnection::establish(connection_string.expose_secret())
        .expect("Failed to connect to Postgres.")
}

pub fn assert_is_redirect_to(response: &reqwest::Response, location: &str) {
    assert_eq!(303, response.status().as_u16());
    assert_eq!(
        response
            .headers()
            .get("Location")
            .expect("The response had no Location header."),
        location
    );
}
