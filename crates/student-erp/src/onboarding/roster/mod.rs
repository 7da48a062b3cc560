//! Bulk registration of students from a CSV roster.
//!
//! Expected header: `Email,First Name,Last Name,Program,Intake Year`.

mod parser;

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::onboarding::batches::BatchRepository;
use crate::onboarding::profile::{
    ProfileIntake, StudentProfileService, StudentRegistration, StudentRepository,
    StudentServiceError,
};

/// One parsed roster row with its source line for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub line: u64,
    pub registration: StudentRegistration,
}

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow {
        line: u64,
        reason: String,
    },
    Registration {
        line: u64,
        source: StudentServiceError,
    },
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::InvalidRow { line, reason } => {
                write!(f, "roster line {}: {}", line, reason)
            }
            RosterImportError::Registration { line, source } => {
                write!(f, "roster line {} could not be registered: {}", line, source)
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::InvalidRow { .. } => None,
            RosterImportError::Registration { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Counts produced by a roster import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RosterImportSummary {
    pub registered: usize,
    /// E-mails skipped because a student already holds them.
    pub duplicates: Vec<String>,
    /// Registered students per batch name.
    pub batches: BTreeMap<String, usize>,
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<RosterEntry>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<RosterEntry>, RosterImportError> {
        parser::parse_entries(reader)
    }

    /// Check every entry against the registration rules; the first offending row fails the roster.
    pub fn validate(entries: &[RosterEntry]) -> Result<(), RosterImportError> {
        for entry in entries {
            ProfileIntake
                .registration(entry.registration.clone())
                .map_err(|violation| RosterImportError::InvalidRow {
                    line: entry.line,
                    reason: violation.to_string(),
                })?;
        }
        Ok(())
    }

    /// Register every entry, skipping e-mails that are already taken.
    ///
    /// The roster is validated as a whole first, so a malformed row leaves no students behind.
    pub fn register<S, B>(
        service: &StudentProfileService<S, B>,
        entries: Vec<RosterEntry>,
    ) -> Result<RosterImportSummary, RosterImportError>
    where
        S: StudentRepository + 'static,
        B: BatchRepository + 'static,
    {
        Self::validate(&entries)?;
        let mut summary = RosterImportSummary::default();

        for entry in entries {
            match service.register(entry.registration) {
                Ok(view) => {
                    summary.registered += 1;
                    *summary.batches.entry(view.batch_name).or_insert(0) += 1;
                }
                Err(StudentServiceError::DuplicateEmail(email)) => summary.duplicates.push(email),
                Err(source) => {
                    return Err(RosterImportError::Registration {
                        line: entry.line,
                        source,
                    })
                }
            }
        }

        info!(
            registered = summary.registered,
            duplicates = summary.duplicates.len(),
            batches = summary.batches.len(),
            "roster imported"
        );
        Ok(summary)
    }
}
