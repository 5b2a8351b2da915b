use crate::models::User;
use crate::schema::{user_email_addresses, users};
use anyhow::Context;
use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use diesel::prelude::*;
use diesel::PgConnection;
use secrecy::{ExposeSecret, Secret};
use uuid::Uuid;

#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: Secret<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials.")]
    InvalidCredentials(#[source] anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

// Verifying against this hash when the username is unknown keeps the response
// time independent of whether the account exists.
const FALLBACK_PASSWORD_HASH: &str = "$argon2id$v=19$m=15000,t=2,p=1$\
    gZiV/M1gPc22ElAH/Jh1Hw$CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno";

/// Checks `credentials` against the `users` table and returns the user id.
///
/// Runs on a blocking database thread; argon2 verification is CPU-bound.
#[tracing::instrument(name = "Validate credentials", skip(credentials, conn))]
pub fn validate_credentials(
    credentials: Credentials,
    conn: &mut PgConnection,
) -> Result<Uuid, AuthError> {
    let mut user_id = None;
    let mut expected_password_hash = Secret::new(FALLBACK_PASSWORD_HASH.to_string());

    if let Some((stored_user_id, stored_password_hash)) =
        get_stored_credentials(&credentials.username, conn)?
    {
        user_id = Some(stored_user_id);
        expected_password_hash = stored_password_hash;
    }

    verify_password_hash(expected_password_hash, credentials.password)?;

    user_id
        .ok_or_else(|| anyhow::anyhow!("Unknown username."))
        .map_err(AuthError::InvalidCredentials)
}

fn get_stored_credentials(
    username: &str,
    conn: &mut PgConnection,
) -> Result<Option<(Uuid, Secret<String>)>, anyhow::Error> {
    let row = users::table
        .filter(users::username.eq(username))
        .first::<User>(conn)
        .optional()
        .context("Failed to perform a query to retrieve stored credentials.")?
        .map(|user| (user.user_id, Secret::new(user.password_hash)));
    Ok(row)
}

#[tracing::instrument(name = "Verify password hash", skip(expected_password_hash, password_candidate))]
fn verify_password_hash(
    expected_password_hash: Secret<String>,
    password_candidate: Secret<String>,
) -> Result<(), AuthError> {
    let expected_password_hash = PasswordHash::new(expected_password_hash.expose_secret())
        .context("Failed to parse hash in PHC string format.")?;

    Argon2::default()
        .verify_password(
            password_candidate.expose_secret().as_bytes(),
            &expected_password_hash,
        )
        .context("Invalid password.")
        .map_err(AuthError::InvalidCredentials)
}

/// All email addresses registered for `user_id`, in no particular order.
#[tracing::instrument(name = "Load user email addresses", skip(conn))]
pub fn get_email_addresses(
    user_id: Uuid,
    conn: &mut PgConnection,
) -> Result<Vec<String>, anyhow::Error> {
    user_email_addresses::table
        .select(user_email_addresses::email_address)
        .filter(user_email_addresses::user_id.eq(user_id))
        .load::<String>(conn)
        .context("Failed to load the email addresses of an authenticated user.")
}

/// PHC-format argon2id hash of `password`, suitable for `users.password_hash`.
pub fn compute_password_hash(password: Secret<String>) -> Result<Secret<String>, anyhow::Error> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let password_hash = Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(15000, 2, 1, None).context("Invalid argon2 parameters.")?,
    )
    .hash_password(password.expose_secret().as_bytes(), &salt)
    .context("Failed to hash password.")?
    .to_string();
    Ok(Secret::new(password_hash))
}
