mod admin_email_suffix;
mod default_model;
mod new_user_subscription;
mod subscriber_email;
mod user_name;

pub use admin_email_suffix::AdminEmailSuffix;
pub use default_model::DefaultModel;
pub use new_user_subscription::NewUserSubscription;
pub use subscriber_email::SubscriberEmail;
pub use user_name::UserName;
