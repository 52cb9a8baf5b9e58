use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: no observations were supplied")]
    NoObservations,

    #[error("No section scores computed (no data matched config indicator ids)")]
    NoSectionScores,

    #[error("Headline composite is undefined in every month; sections {0:?} produced no scores")]
    EmptyHeadline(Vec<String>),

    #[error("Calendar error: {0}")]
    Calendar(#[from] core_types::CoreError),
}
