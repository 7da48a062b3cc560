use super::domain::Program;

/// Canonical display name for a batch, e.g. `BS-2025`.
pub fn batch_name(program: Program, intake_year: u16) -> String {
    format!("{}-{:04}", program.code(), intake_year)
}
