//! Integration tests driving the full router against the in-memory database.

mod helpers;

mod auth_test;
mod drive_test;
mod hub_test;
mod note_test;
mod notification_test;
mod rate_limit_test;
