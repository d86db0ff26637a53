use thiserror::Error;

#[derive(Error, Debug)]
pub enum LegacyError {
    #[error("Invalid legacy step data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Document has no page that maps onto a legacy step")]
    NoClassifiableSteps,
}
