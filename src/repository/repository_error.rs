use crate::error::*;

#[derive(Debug)]
pub enum RepositoryError {
    RecordNotFound,
    DuplicateRecord,
}

impl IServiceError for RepositoryError {
    fn error_type(&self) -> String {
        use RepositoryError::*;

        match self {
            RecordNotFound => "record_not_found",
            DuplicateRecord => "duplicate_record",
        }
        .to_string()
    }

    fn status_code(&self) -> http::StatusCode {
        use RepositoryError::*;

        match self {
            RecordNotFound => http::StatusCode::NOT_FOUND,
            DuplicateRecord => http::StatusCode::CONFLICT,
        }
    }
}
