mod user;
mod user_subscription;
mod waitlist_entry;

pub use user::*;
pub use user_subscription::*;
pub use waitlist_entry::*;
