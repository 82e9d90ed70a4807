use thiserror::Error;

use crate::validate::Field;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LossError {
    /// One or more required inputs are absent. Never silently defaulted.
    #[error("missing input: {}", join_fields(.0))]
    MissingInput(Vec<Field>),
    /// The fiber parameters describe a link that cannot exist,
    /// such as singlemode fiber at 850 nm.
    #[error("invalid configuration: {}", .0.join(" "))]
    InvalidConfiguration(Vec<String>),
    /// Both of the above found in the same pass, such as singlemode at
    /// 850 nm with no fiber length.
    #[error("missing input: {}; invalid configuration: {}", join_fields(.missing), .invalid.join(" "))]
    Rejected {
        missing: Vec<Field>,
        invalid: Vec<String>,
    },
    /// A numeric precondition failed, e.g. a logarithm of a non-positive power.
    #[error("domain error: {0}")]
    Domain(String),
}

impl LossError {
    /// Inputs reported absent, whether alone or alongside invalid ones.
    pub fn missing_fields(&self) -> &[Field] {
        match self {
            LossError::MissingInput(missing) | LossError::Rejected { missing, .. } => missing.as_slice(),
            _ => &[],
        }
    }

    /// Configuration problems reported, whether alone or alongside missing inputs.
    pub fn invalid_messages(&self) -> &[String] {
        match self {
            LossError::InvalidConfiguration(invalid) | LossError::Rejected { invalid, .. } => {
                invalid.as_slice()
            }
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, LossError>;

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|field| field.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
