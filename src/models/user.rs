use crate::schema::{user_email_addresses, users};
use diesel::prelude::*;

#[derive(Queryable)]
pub struct User {
    pub user_id: uuid::Uuid,
    pub username: String,
    pub password_hash: String,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub user_id: &'a uuid::Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = user_email_addresses)]
pub struct NewUserEmailAddress<'a> {
    pub user_id: &'a uuid::Uuid,
    pub email_address: &'a str,
}
