//! Note visibility status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tri-state visibility of a note.
///
/// `Personal -> Shared` happens on the first share. `Personal | Shared ->
/// Public` happens on publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "note_status")]
pub enum NoteStatus {
    /// Only visible to the owner.
    #[default]
    Personal,
    /// Visible to the owner and explicit collaborators.
    Shared,
    /// Visible to every authenticated user.
    Public,
}

impl NoteStatus {
    /// Return the status as its display string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "Personal",
            Self::Shared => "Shared",
            Self::Public => "Public",
        }
    }

    /// The `is_public` flag that must accompany this status.
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Public)
    }

    /// Status after a collaborator is added. Public notes stay public.
    pub fn after_share(self) -> Self {
        match self {
            Self::Public => Self::Public,
            _ => Self::Shared,
        }
    }
}

impl fmt::Display for NoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "personal" => Ok(Self::Personal),
            "shared" => Ok(Self::Shared),
            "public" => Ok(Self::Public),
            other => Err(format!("Unknown note status: {other}")),
        }
    }
}
