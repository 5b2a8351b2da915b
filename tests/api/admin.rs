use crate::helpers::{assert_is_redirect_to, spawn_app, TestUser};
use diesel::RunQueryDsl;
use newsagent::models::UserSubscription;
use newsagent::schema::user_subscriptions::dsl::user_subscriptions;

fn subscription_body() -> serde_json::Value {
    serde_json::json!({
        "email": "ursula_le_guin@gmail.com",
        "user_name": "le guin",
        "default_model": "gpt-4o-mini",
        "payment_id": "pay_123",
    })
}

#[tokio::test]
async fn an_admin_can_see_the_admin_page() {
    // arrange
    let mut app = spawn_app().await;
    let admin = app.create_admin();

    // act
    let response = app.get_as("/admin", Some(&admin)).await;

    // assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["username"], admin.username.as_str());
    assert_eq!(body["email_addresses"][0], "ops@newsagent.ai");
}

#[tokio::test]
async fn one_matching_email_address_is_enough() {
    // arrange
    let mut app = spawn_app().await;
    let user = app.create_user(&["ursula@gmail.com", "ursula@newsagent.ai"]);

    // act
    let response = app.get_as("/admin", Some(&user)).await;

    // assert
    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn admin_routes_redirect_home_when_the_check_fails() {
    // arrange
    let mut app = spawn_app().await;
    let outsider = app.create_user(&["ursula@gmail.com"]);
    let lookalike = app.create_user(&["ursula@evil-newsagent.ai"]);
    let no_email = app.create_user(&[]);
    let admin = app.create_admin();
    let wrong_password = TestUser {
        username: admin.username.clone(),
        password: "not-the-password".into(),
    };
    let unknown = TestUser::generate();
    let test_cases = vec![
        (None, "no credentials"),
        (Some(&outsider), "a user outside the organisation"),
        (Some(&lookalike), "a lookalike domain"),
        (Some(&no_email), "a user without email addresses"),
        (Some(&wrong_password), "a wrong password"),
        (Some(&unknown), "an unknown user"),
    ];

    for path in [
        "/admin",
        "/admin/waitlist",
        "/admin/subscriptions",
        "/admin/subscriptions/1",
        "/admin/subscriptions/abc",
    ] {
        for (user, description) in &test_cases {
            // act
            let response = app.get_as(path, *user).await;

            // assert
            assert_eq!(
                303,
                response.status().as_u16(),
                "{} did not redirect for {}.",
                path,
                description
            );
            assert_is_redirect_to(&response, "/");
            assert_eq!(response.text().await.unwrap(), "");
        }
    }
}

#[tokio::test]
async fn admins_can_list_waitlist_entries_in_signup_order() {
    // arrange
    let mut app = spawn_app().await;
    let admin = app.create_admin();
    app.post_waitlist("email=first%40example.com".into()).await;
    app.post_waitlist("email=second%40example.com".into()).await;
    app.post_waitlist("email=first%40example.com".into()).await;

    // act
    let response = app.get_as("/admin/waitlist", Some(&admin)).await;

    // assert
    assert_eq!(200, response.status().as_u16());
    let entries: Vec<serde_json::Value> = response.json().await.unwrap();
    let emails: Vec<&str> = entries
        .iter()
        .map(|entry| entry["email"].as_str().unwrap())
        .collect();
    assert_eq!(
        emails,
        vec!["first@example.com", "second@example.com", "first@example.com"]
    );
}

#[tokio::test]
async fn admins_can_create_a_user_subscription() {
    // arrange
    let mut app = spawn_app().await;
    let admin = app.create_admin();

    // act
    let response = app
        .post_subscription_as(&subscription_body(), Some(&admin))
        .await;

    // assert
    assert_eq!(201, response.status().as_u16());
    let location = response
        .headers()
        .get("Location")
        .expect("Missing Location header.")
        .to_str()
        .unwrap()
        .to_string();

    let saved = user_subscriptions
        .load::<UserSubscription>(&mut app.db_connection)
        .expect("Failed to fetch saved subscriptions.");
    assert_eq!(saved.len(), 1);
    let saved = &saved[0];
    assert_eq!(saved.email, "ursula_le_guin@gmail.com");
    assert_eq!(saved.user_name, "le guin");
    assert_eq!(saved.default_model, "gpt-4o-mini");
    assert_eq!(saved.payment_id, "pay_123");
    assert!(saved.active);
    assert!(chrono::DateTime::parse_from_rfc3339(&saved.join_date).is_ok());
    assert_eq!(location, format!("/admin/subscriptions/{}", saved.id));

    let fetched = app.get_as(&location, Some(&admin)).await;
    assert_eq!(200, fetched.status().as_u16());
    let fetched: serde_json::Value = fetched.json().await.unwrap();
    assert_eq!(fetched["email"], "ursula_le_guin@gmail.com");
}

#[tokio::test]
async fn subscriptions_can_be_created_inactive() {
    // arrange
    let mut app = spawn_app().await;
    let admin = app.create_admin();
    let mut body = subscription_body();
    body["active"] = serde_json::json!(false);

    // act
    let response = app.post_subscription_as(&body, Some(&admin)).await;

    // assert
    assert_eq!(201, response.status().as_u16());
    let listed = app.get_as("/admin/subscriptions", Some(&admin)).await;
    let listed: Vec<serde_json::Value> = listed.json().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["active"], false);
}

#[tokio::test]
async fn create_subscription_returns_a_400_when_fields_are_present_but_invalid() {
    // arrange
    let mut app = spawn_app().await;
    let admin = app.create_admin();
    let test_cases = vec![
        ("email", "definitely-not-an-email", "invalid email"),
        ("user_name", "", "empty user name"),
        ("user_name", "<script>", "forbidden characters in user name"),
        ("default_model", " ", "blank default model"),
    ];

    for (field, value, description) in test_cases {
        let mut body = subscription_body();
        body[field] = serde_json::json!(value);

        // act
        let response = app.post_subscription_as(&body, Some(&admin)).await;

        // assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not return a 400 Bad Request when the payload had {}.",
            description
        );
    }
    let saved = user_subscriptions
        .load::<UserSubscription>(&mut app.db_connection)
        .unwrap();
    assert!(saved.is_empty());
}

#[tokio::test]
async fn create_subscription_returns_a_400_when_data_is_missing() {
    // arrange
    let mut app = spawn_app().await;
    let admin = app.create_admin();
    let body = serde_json::json!({ "email": "ursula_le_guin@gmail.com" });

    // act
    let response = app.post_subscription_as(&body, Some(&admin)).await;

    // assert
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn non_admins_cannot_create_subscriptions() {
    // arrange
    let mut app = spawn_app().await;
    let outsider = app.create_user(&["ursula@gmail.com"]);

    // act
    let response = app
        .post_subscription_as(&subscription_body(), Some(&outsider))
        .await;

    // assert
    assert_is_redirect_to(&response, "/");
    let saved = user_subscriptions
        .load::<UserSubscription>(&mut app.db_connection)
        .unwrap();
    assert!(saved.is_empty());
}

#[tokio::test]
async fn unknown_subscriptions_are_not_found() {
    // arrange
    let mut app = spawn_app().await;
    let admin = app.create_admin();

    // act
    let response = app.get_as("/admin/subscriptions/4242", Some(&admin)).await;

    // assert
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn non_numeric_subscription_ids_are_not_found_for_admins() {
    // arrange
    let mut app = spawn_app().await;
    let admin = app.create_admin();

    // act
    let response = app.get_as("/admin/subscriptions/abc", Some(&admin)).await;

    // assert
    assert_eq!(404, response.status().as_u16());
}
