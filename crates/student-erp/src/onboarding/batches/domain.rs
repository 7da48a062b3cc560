use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::naming::batch_name;
use crate::onboarding::profile::SectionVisibility;

/// Identifier wrapper for batch records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(pub Uuid);

impl BatchId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Degree tracks offered to applicants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Program {
    Bs,
    Bba,
    Ms,
    Mba,
    Btech,
    Mtech,
}

impl Program {
    pub const ALL: [Program; 6] = [
        Program::Bs,
        Program::Bba,
        Program::Ms,
        Program::Mba,
        Program::Btech,
        Program::Mtech,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            Program::Bs => "BS",
            Program::Bba => "BBA",
            Program::Ms => "MS",
            Program::Mba => "MBA",
            Program::Btech => "BTECH",
            Program::Mtech => "MTECH",
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Program {
    type Err = UnknownProgram;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Program::ALL
            .into_iter()
            .find(|program| program.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownProgram(trimmed.to_string()))
    }
}

impl TryFrom<String> for Program {
    type Error = UnknownProgram;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Program> for String {
    fn from(program: Program) -> Self {
        program.code().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown program '{0}'")]
pub struct UnknownProgram(pub String);

/// Unique key of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BatchKey {
    pub program: Program,
    pub intake_year: u16,
}

impl BatchKey {
    pub fn new(program: Program, intake_year: u16) -> Self {
        Self {
            program,
            intake_year,
        }
    }

    pub fn display_name(&self) -> String {
        batch_name(self.program, self.intake_year)
    }
}

impl fmt::Display for BatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// Persisted batch row together with its optional one-to-one visibility record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub id: BatchId,
    pub key: BatchKey,
    pub name: String,
    pub is_active: bool,
    pub visibility: Option<SectionVisibility>,
    pub created_at: DateTime<Utc>,
}

impl BatchRecord {
    /// Fresh active batch for `key`, not yet persisted.
    pub fn new(key: BatchKey) -> Self {
        Self {
            id: BatchId::generate(),
            name: key.display_name(),
            key,
            is_active: true,
            visibility: None,
            created_at: Utc::now(),
        }
    }

    /// Visibility in force for the batch's students; all sections when no record exists.
    pub fn effective_visibility(&self) -> SectionVisibility {
        self.visibility.clone().unwrap_or_default()
    }

    pub fn view(&self) -> BatchView {
        BatchView {
            batch_id: self.id,
            program: self.key.program,
            intake_year: self.key.intake_year,
            name: self.name.clone(),
            is_active: self.is_active,
            visibility: self.effective_visibility(),
        }
    }
}

/// Public representation of a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchView {
    pub batch_id: BatchId,
    pub program: Program,
    pub intake_year: u16,
    pub name: String,
    pub is_active: bool,
    pub visibility: SectionVisibility,
}
