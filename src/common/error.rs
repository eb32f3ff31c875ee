use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid command: {reason}")]
    InvalidCommand { reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
}

/// Outcome taxonomy of the planning core.
///
/// `NoSolution` is an ordinary planning result (no path, no formation fit) that
/// callers are expected to handle. `ContractViolation` signals a programming
/// error in a collaborator, e.g. a template generator returning the wrong
/// number of positions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanningError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("No solution: {reason}")]
    NoSolution { reason: String },

    #[error("Degenerate geometry: {reason}")]
    DegenerateGeometry { reason: String },

    #[error("Contract violation: {reason}")]
    ContractViolation { reason: String },
}

impl PlanningError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        PlanningError::InvalidInput { reason: reason.into() }
    }

    pub fn no_solution(reason: impl Into<String>) -> Self {
        PlanningError::NoSolution { reason: reason.into() }
    }

    pub fn degenerate(reason: impl Into<String>) -> Self {
        PlanningError::DegenerateGeometry { reason: reason.into() }
    }

    pub fn contract_violation(reason: impl Into<String>) -> Self {
        PlanningError::ContractViolation { reason: reason.into() }
    }

    pub fn is_no_solution(&self) -> bool {
        matches!(self, PlanningError::NoSolution { .. })
    }

    pub fn is_contract_violation(&self) -> bool {
        matches!(self, PlanningError::ContractViolation { .. })
    }
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Planning error: {0}")]
    Planning(#[from] PlanningError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type PlanningResult<T> = Result<T, PlanningError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
