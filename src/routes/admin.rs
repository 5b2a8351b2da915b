use crate::domain::{DefaultModel, NewUserSubscription, SubscriberEmail, UserName};
use crate::guards::AdminUser;
use crate::models::{NewUserSubscriptionRow, UserSubscription, WaitlistEntry};
use crate::routes::error_chain_fmt;
use crate::startup::NewsAgentDbConn;
use anyhow::Context;
use chrono::Utc;
use diesel::prelude::*;
use diesel::PgConnection;
use rocket::http::Status;
use rocket::response::status::Created;
use rocket::response::{Redirect, Responder};
use rocket::serde::json::Json;
use rocket::{Request, Response};
use uuid::Uuid;

/// Every admin route takes this parameter instead of the bare guard so that a
/// failed check turns into a redirect rather than an error page.
pub type AdminCheck = Result<AdminUser, anyhow::Error>;

fn require_admin(admin: AdminCheck) -> Result<AdminUser, AdminError> {
    admin.map_err(AdminError::AccessDenied)
}

#[derive(serde::Serialize)]
pub struct AdminProfile {
    username: String,
    email_addresses: Vec<String>,
}

#[tracing::instrument(name = "Show admin profile", skip(admin), fields(request_id = %Uuid::new_v4()))]
#[get("/admin")]
pub async fn admin_home(admin: AdminCheck) -> Result<Json<AdminProfile>, AdminError> {
    let admin = require_admin(admin)?;
    Ok(Json(AdminProfile {
        username: admin.username,
        email_addresses: admin.email_addresses,
    }))
}

#[tracing::instrument(name = "List waitlist entries", skip(admin, conn), fields(request_id = %Uuid::new_v4()))]
#[get("/admin/waitlist")]
pub async fn list_waitlist(
    admin: AdminCheck,
    conn: NewsAgentDbConn,
) -> Result<Json<Vec<WaitlistEntry>>, AdminError> {
    require_admin(admin)?;
    let entries = conn
        .run(|c: &mut PgConnection| {
            use crate::schema::waitlist;
            waitlist::table
                .order(waitlist::id.asc())
                .load::<WaitlistEntry>(c)
        })
        .await
        .context("Failed to load waitlist entries.")?;
    Ok(Json(entries))
}

#[tracing::instrument(name = "List user subscriptions", skip(admin, conn), fields(request_id = %Uuid::new_v4()))]
#[get("/admin/subscriptions")]
pub async fn list_subscriptions(
    admin: AdminCheck,
    conn: NewsAgentDbConn,
) -> Result<Json<Vec<UserSubscription>>, AdminError> {
    require_admin(admin)?;
    let subscriptions = conn
        .run(|c: &mut PgConnection| {
            use crate::schema::user_subscriptions as subs;
            subs::table.order(subs::id.asc()).load::<UserSubscription>(c)
        })
        .await
        .context("Failed to load user subscriptions.")?;
    Ok(Json(subscriptions))
}

#[tracing::instrument(name = "Get a user subscription", skip(admin, conn), fields(request_id = %Uuid::new_v4()))]
#[get("/admin/subscriptions/<id>")]
pub async fn get_subscription(
    id: Result<i32, &str>,
    admin: AdminCheck,
    conn: NewsAgentDbConn,
) -> Result<Option<Json<UserSubscription>>, AdminError> {
    require_admin(admin)?;
    // No subscription has a non-numeric id.
    let id = match id {
        Ok(id) => id,
        Err(_) => return Ok(None),
    };
    let subscription = conn
        .run(move |c: &mut PgConnection| {
            use crate::schema::user_subscriptions as subs;
            subs::table
                .filter(subs::id.eq(id))
                .first::<UserSubscription>(c)
                .optional()
        })
        .await
        .context("Failed to load a user subscription.")?;
    Ok(subscription.map(Json))
}

#[derive(serde::Deserialize)]
pub struct SubscriptionBody {
    email: String,
    user_name: String,
    default_model: String,
    payment_id: String,
    #[serde(default = "active_by_default")]
    active: bool,
}

fn active_by_default() -> bool {
    true
}

impl TryFrom<SubscriptionBody> for NewUserSubscription {
    type Error = String;

    fn try_from(body: SubscriptionBody) -> Result<Self, Self::Error> {
        let email = SubscriberEmail::parse(body.email)?;
        let user_name = UserName::parse(body.user_name)?;
        let default_model = DefaultModel::parse(body.default_model)?;
        Ok(NewUserSubscription {
            email,
            user_name,
            default_model,
            payment_id: body.payment_id,
            active: body.active,
        })
    }
}

#[tracing::instrument(
    name = "Adding a new user subscription",
    skip(admin, body, conn),
    fields(
        request_id = %Uuid::new_v4(),
        subscriber_email = %body.email
    )
)]
#[post("/admin/subscriptions", data = "<body>")]
pub async fn create_subscription(
    admin: AdminCheck,
    body: Json<SubscriptionBody>,
    conn: NewsAgentDbConn,
) -> Result<Created<Json<UserSubscription>>, AdminError> {
    require_admin(admin)?;
    let new_subscription: NewUserSubscription = body
        .into_inner()
        .try_into()
        .map_err(AdminError::ValidationError)?;
    let stored = insert_subscription(new_subscription, &conn)
        .await
        .context("Failed to insert a new user subscription.")?;
    Ok(Created::new(format!("/admin/subscriptions/{}", stored.id)).body(Json(stored)))
}

#[tracing::instrument(
    name = "Saving new user subscription details in the database",
    skip(new_subscription, conn)
)]
async fn insert_subscription(
    new_subscription: NewUserSubscription,
    conn: &NewsAgentDbConn,
) -> diesel::QueryResult<UserSubscription> {
    use crate::schema::user_subscriptions;
    conn.run(move |c: &mut PgConnection| {
        let join_date = Utc::now().to_rfc3339();
        diesel::insert_into(user_subscriptions::table)
            .values(NewUserSubscriptionRow {
                email: new_subscription.email.as_ref(),
                user_name: new_subscription.user_name.as_ref(),
                default_model: new_subscription.default_model.as_ref(),
                active: new_subscription.active,
                payment_id: &new_subscription.payment_id,
                join_date: &join_date,
            })
            .get_result::<UserSubscription>(c)
    })
    .await
}

#[derive(thiserror::Error)]
pub enum AdminError {
    #[error("Admin access denied.")]
    AccessDenied(#[source] anyhow::Error),
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for AdminError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for AdminError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        match self {
            AdminError::AccessDenied(_) => {
                tracing::warn!(error.cause_chain = ?self, "Admin check failed");
                Redirect::to(uri!("/")).respond_to(request)
            }
            AdminError::ValidationError(_) => {
                tracing::info!("AdminError: {:?}", self);
                Response::build().status(Status::BadRequest).ok()
            }
            AdminError::UnexpectedError(_) => {
                tracing::error!(error.cause_chain = ?self, "Admin request failed");
                Response::build().status(Status::InternalServerError).ok()
            }
        }
    }
}
