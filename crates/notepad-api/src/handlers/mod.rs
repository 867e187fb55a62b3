//! Route handlers organized by domain.

pub mod auth;
pub mod drive;
pub mod health;
pub mod hub;
pub mod note;
pub mod notification;
pub mod preference;
pub mod user;
