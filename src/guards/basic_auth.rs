use crate::authentication::Credentials;
use anyhow::{anyhow, Context};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use secrecy::Secret;

/// Credentials carried by an `Authorization: Basic ...` header. Not yet verified.
pub struct BasicAuth(pub Credentials);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for BasicAuth {
    type Error = anyhow::Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let header_value = match request.headers().get_one("Authorization") {
            Some(value) => value,
            None => {
                return Outcome::Error((
                    Status::Unauthorized,
                    anyhow!("The 'Authorization' header was missing"),
                ))
            }
        };
        match parse_basic_credentials(header_value) {
            Ok(credentials) => Outcome::Success(BasicAuth(credentials)),
            Err(e) => Outcome::Error((Status::Unauthorized, e)),
        }
    }
}

fn parse_basic_credentials(header_value: &str) -> Result<Credentials, anyhow::Error> {
    let base64encoded_segment = header_value
        .strip_prefix("Basic ")
        .context("The authorization scheme was not 'Basic'.")?;

    let decoded_bytes = base64::decode_config(base64encoded_segment, base64::STANDARD)
        .context("Failed to base64-decode 'Basic' credentials.")?;

    let decoded_credentials = String::from_utf8(decoded_bytes)
        .context("The decoded credential string is not valid UTF8.")?;

    let mut credentials = decoded_credentials.splitn(2, ':');

    let username = credentials
        .next()
        .filter(|username| !username.is_empty())
        .ok_or_else(|| anyhow!("A username must be provided in 'Basic' auth."))?
        .to_string();

    let password = credentials
        .next()
        .ok_or_else(|| anyhow!("A password must be provided in 'Basic' auth."))?
        .to_string();

    Ok(Credentials {
        username,
        password: Secret::new(password),
    })
}
