use crate::models::NewWaitlistEntry;
use crate::routes::error_chain_fmt;
use crate::startup::NewsAgentDbConn;
use anyhow::{anyhow, Context};
use diesel::{PgConnection, RunQueryDsl};
use rocket::form::Form;
use rocket::http::{ContentType, Status};
use rocket::response::{Redirect, Responder};
use rocket::{Request, Response};
use std::io::Cursor;
use uuid::Uuid;

#[derive(FromForm)]
pub struct FormData {
    email: String,
}

/// Records the submitted email and sends the caller back to the landing page.
///
/// The email is stored exactly as submitted: no format check and no duplicate
/// check, so repeated submissions produce repeated rows.
#[tracing::instrument(
    name = "Adding a new waitlist entry",
    skip(form, conn),
    fields(
        request_id = %Uuid::new_v4(),
        waitlist_email = %form.email
    )
)]
#[post("/waitlist", data = "<form>")]
pub async fn join_waitlist(
    form: Form<FormData>,
    conn: Option<NewsAgentDbConn>,
) -> Result<Redirect, JoinWaitlistError> {
    let conn = conn
        .ok_or_else(|| anyhow!("Failed to retrieve a connection from the DB pool."))
        .map_err(JoinWaitlistError::InsertFailed)?;
    insert_waitlist_entry(form.into_inner().email, &conn)
        .await
        .map_err(JoinWaitlistError::InsertFailed)?;
    Ok(Redirect::to(uri!("/")))
}

#[tracing::instrument(name = "Saving a new waitlist entry in the database", skip(email, conn))]
async fn insert_waitlist_entry(email: String, conn: &NewsAgentDbConn) -> Result<(), anyhow::Error> {
    use crate::schema::waitlist;
    conn.run(move |c: &mut PgConnection| {
        diesel::insert_into(waitlist::table)
            .values(NewWaitlistEntry { email: &email })
            .execute(c)
    })
    .await
    .context("Failed to insert a new waitlist entry.")?;
    Ok(())
}

#[derive(thiserror::Error)]
pub enum JoinWaitlistError {
    #[error("Failed to join waitlist")]
    InsertFailed(#[source] anyhow::Error),
}

impl std::fmt::Debug for JoinWaitlistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for JoinWaitlistError {
    fn respond_to(self, _request: &'r Request<'_>) -> rocket::response::Result<'static> {
        tracing::error!(error.cause_chain = ?self, "Waitlist signup failed");
        // The cause stays in the logs; callers only ever see the fixed message.
        let body = self.to_string();
        Response::build()
            .status(match self {
                JoinWaitlistError::InsertFailed(_) => Status::InternalServerError,
            })
            .header(ContentType::Plain)
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}
