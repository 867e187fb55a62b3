//! Drive file entities.

pub mod model;

pub use model::{CreateDriveFile, DriveFile};
