mod admin;
mod health_check;
mod helpers;
