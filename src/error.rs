use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Non-finite amount in {entity} '{id}', field '{field}'")]
    NonFiniteAmount {
        entity: &'static str,
        id: String,
        field: &'static str,
    },

    #[error(
        "Transaction '{id}' does not reconcile: {amount_ex_vat} + {vat_amount} != {total_amount}"
    )]
    AmountMismatch {
        id: String,
        amount_ex_vat: f64,
        vat_amount: f64,
        total_amount: f64,
    },

    #[error("Invalid quarter {0}: must be between 1 and 4")]
    InvalidQuarter(u32),

    #[error("Date calculation error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
