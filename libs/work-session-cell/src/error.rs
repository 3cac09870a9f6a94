use thiserror::Error;

use shared_models::AppError;

use crate::models::MonthKey;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Failed to load work sessions for {month}: {source}")]
    Load {
        month: MonthKey,
        #[source]
        source: AppError,
    },

    #[error("Failed to load specialties: {0}")]
    Specialties(#[source] AppError),
}

impl CalendarError {
    pub fn api_error(&self) -> &AppError {
        match self {
            CalendarError::Load { source, .. } => source,
            CalendarError::Specialties(source) => source,
        }
    }
}
