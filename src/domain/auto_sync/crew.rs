//! Crew read model.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CorrespondentId, CrewId};

/// A named, user-owned group of correspondents eligible for invitations.
///
/// Resolved once by the crew directory; the engine treats it as an opaque
/// handle afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crew {
    /// Unique identifier.
    pub id: CrewId,
    /// Display name, matched case-insensitively during resolution.
    pub name: String,
    /// Members who would receive invitations.
    pub members: Vec<CorrespondentId>,
}

impl Crew {
    /// Creates a crew with the given name and members.
    pub fn new(name: impl Into<String>, members: Vec<CorrespondentId>) -> Self {
        Self {
            id: CrewId::new(),
            name: name.into(),
            members,
        }
    }

    /// Case-insensitive name comparison used for crew resolution.
    pub fn name_matches(&self, candidate: &str) -> bool {
        self.name.eq_ignore_ascii_case(candidate.trim())
    }
}
