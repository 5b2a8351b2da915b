mod admin_user;
mod authenticated_user;
mod basic_auth;

pub use admin_user::*;
use anyhow::anyhow;
pub use authenticated_user::*;
pub use basic_auth::*;
use rocket::http::Status;

/// Turns a missing value into a guard failure with the given status.
trait OrStatus<T> {
    fn or_status(self, status: Status, context: &'static str)
        -> Result<T, (Status, anyhow::Error)>;
}

impl<T> OrStatus<T> for Option<T> {
    fn or_status(
        self,
        status: Status,
        context: &'static str,
    ) -> Result<T, (Status, anyhow::Error)> {
        self.ok_or_else(|| (status, anyhow!(context)))
    }
}
