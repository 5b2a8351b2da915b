use crate::domain::AdminEmailSuffix;
use crate::guards::{AuthenticatedUser, OrStatus};
use anyhow::anyhow;
use rocket::http::Status;
use rocket::outcome::try_outcome;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;

/// An authenticated user owning at least one email address on the
/// organisational admin domain.
pub struct AdminUser {
    pub username: String,
    pub email_addresses: Vec<String>,
    _private: (),
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminUser {
    type Error = anyhow::Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let user = try_outcome!(request.guard::<AuthenticatedUser>().await);
        let suffix = match request
            .rocket()
            .state::<AdminEmailSuffix>()
            .or_status(Status::InternalServerError, "The admin email suffix is not managed.")
        {
            Ok(suffix) => suffix,
            Err(failure) => return Outcome::Error(failure),
        };

        if !suffix.permits(&user.email_addresses) {
            return Outcome::Error((
                Status::Forbidden,
                anyhow!(
                    "User {} has no email address ending in {}.",
                    user.username,
                    suffix.as_ref()
                ),
            ));
        }

        Outcome::Success(AdminUser {
            username: user.username,
            email_addresses: user.email_addresses,
            _private: (),
        })
    }
}
