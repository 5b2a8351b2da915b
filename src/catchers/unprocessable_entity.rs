use rocket::http::Status;
use rocket::response::status;
use rocket::Request;

/// Form and JSON bodies that fail to parse (e.g. a signup without an `email`
/// field) are reported as 400 rather than Rocket's default 422.
#[catch(422)]
pub fn unprocessable_entity_to_bad_request(req: &Request) -> status::Custom<()> {
    tracing::info!(uri = %req.uri(), "Rejecting an unparseable request body");
    status::Custom(Status::BadRequest, ())
}
