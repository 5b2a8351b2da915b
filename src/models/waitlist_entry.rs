use crate::schema::waitlist;
use chrono::offset::Utc;
use chrono::DateTime;
use diesel::prelude::*;

#[derive(Queryable, serde::Serialize, Debug)]
pub struct WaitlistEntry {
    pub id: i32,
    pub email: String,
    pub joined_at: DateTime<Utc>,
}

// `id` and `joined_at` are filled in by the database.
#[derive(Insertable)]
#[diesel(table_name = waitlist)]
pub struct NewWaitlistEntry<'a> {
    pub email: &'a str,
}
