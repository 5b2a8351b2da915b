use crate::authentication::{get_email_addresses, validate_credentials, AuthError};
use crate::guards::BasicAuth;
use crate::startup::NewsAgentDbConn;
use anyhow::anyhow;
use diesel::PgConnection;
use rocket::http::Status;
use rocket::outcome::try_outcome;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use uuid::Uuid;

pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    pub email_addresses: Vec<String>,
    // prevents construction outside of this module
    _private: (),
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = anyhow::Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let BasicAuth(credentials) = try_outcome!(request.guard::<BasicAuth>().await);
        let conn = match request.guard::<NewsAgentDbConn>().await {
            Outcome::Success(conn) => conn,
            _ => {
                return Outcome::Error((
                    Status::InternalServerError,
                    anyhow!("Failed to retrieve a connection from the DB pool."),
                ))
            }
        };

        let username = credentials.username.clone();
        let result = conn
            .run(move |conn: &mut PgConnection| {
                let user_id = validate_credentials(credentials, conn)?;
                let email_addresses = get_email_addresses(user_id, conn)?;
                Ok::<_, AuthError>((user_id, email_addresses))
            })
            .await;

        match result {
            Ok((user_id, email_addresses)) => Outcome::Success(AuthenticatedUser {
                user_id,
                username,
                email_addresses,
                _private: (),
            }),
            Err(AuthError::InvalidCredentials(e)) => Outcome::Error((Status::Unauthorized, e)),
            Err(AuthError::UnexpectedError(e)) => {
                Outcome::Error((Status::InternalServerError, e))
            }
        }
    }
}
