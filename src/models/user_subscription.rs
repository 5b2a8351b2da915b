use crate::schema::user_subscriptions;
use diesel::prelude::*;

#[derive(Queryable, serde::Serialize, Debug)]
pub struct UserSubscription {
    pub id: i32,
    pub email: String,
    pub user_name: String,
    pub default_model: String,
    pub active: bool,
    pub payment_id: String,
    pub join_date: String,
}

#[derive(Insertable)]
#[diesel(table_name = user_subscriptions)]
pub struct NewUserSubscriptionRow<'a> {
    pub email: &'a str,
    pub user_name: &'a str,
    pub default_model: &'a str,
    pub active: bool,
    pub payment_id: &'a str,
    pub join_date: &'a str,
}
