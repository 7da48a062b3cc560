use serde::Deserialize;
use std::io::Read;

use super::{RosterEntry, RosterImportError};
use crate::onboarding::batches::Program;
use crate::onboarding::profile::StudentRegistration;

pub(crate) fn parse_entries<R: Read>(reader: R) -> Result<Vec<RosterEntry>, RosterImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut entries = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|position| position.line()).unwrap_or(0);
        let row: RosterRow = record
            .deserialize(Some(&headers))
            .map_err(|err| RosterImportError::InvalidRow {
                line,
                reason: err.to_string(),
            })?;

        let program = row
            .program
            .parse::<Program>()
            .map_err(|err| RosterImportError::InvalidRow {
                line,
                reason: err.to_string(),
            })?;

        entries.push(RosterEntry {
            line,
            registration: StudentRegistration {
                email: row.email,
                first_name: row.first_name,
                last_name: row.last_name,
                program,
                intake_year: row.intake_year,
            },
        });
    }

    Ok(entries)
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Email")]
    email: String,
    #[serde(rename = "First Name")]
    first_name: String,
    #[serde(rename = "Last Name")]
    last_name: String,
    #[serde(rename = "Program")]
    program: String,
    #[serde(rename = "Intake Year")]
    intake_year: u16,
}
