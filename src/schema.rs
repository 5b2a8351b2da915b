diesel::table! {
    waitlist (id) {
        id -> Int4,
        email -> Text,
        joined_at -> Timestamptz,
    }
}

diesel::table! {
    user_subscriptions (id) {
        id -> Int4,
        email -> Text,
        user_name -> Text,
        default_model -> Text,
        active -> Bool,
        payment_id -> Text,
        join_date -> Text,
    }
}

diesel::table! {
    users (user_id) {
        user_id -> Uuid,
        username -> Text,
        password_hash -> Text,
    }
}

diesel::table! {
    user_email_addresses (user_id, email_address) {
        user_id -> Uuid,
        email_address -> Text,
    }
}

diesel::joinable!(user_email_addresses -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, user_email_addresses,);
