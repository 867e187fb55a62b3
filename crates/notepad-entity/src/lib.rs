//! # notepad-entity
//!
//! Domain entity models for Notepad Plus. Every struct in this crate is a
//! table row or a domain value object. Row types derive `sqlx::FromRow` and
//! serialize in the camelCase shape the REST API exposes.

pub mod file;
pub mod folder;
pub mod note;
pub mod notification;
pub mod token;
pub mod user;
