use crate::domain::{DefaultModel, SubscriberEmail, UserName};

pub struct NewUserSubscription {
    pub email: SubscriberEmail,
    pub user_name: UserName,
    pub default_model: DefaultModel,
    pub payment_id: String,
    pub active: bool,
}
