use custom_error::custom_error;

custom_error! {
    /// Conditions reported by the remote service that callers branch on.
    pub ApiError
    NotFound{path: String} = "Resource not found: {path}",
    Conflict{path: String} = "Resource already exists: {path}",
    Status{status: u16, message: String} = "Request failed with HTTP {status}: {message}",
}

impl ApiError {
    /// True when `err` carries an [`ApiError::NotFound`].
    pub fn is_not_found(err: &anyhow::Error) -> bool {
        matches!(err.downcast_ref::<ApiError>(), Some(ApiError::NotFound { .. }))
    }

    /// True when `err` carries an [`ApiError::Conflict`].
    pub fn is_conflict(err: &anyhow::Error) -> bool {
        matches!(err.downcast_ref::<ApiError>(), Some(ApiError::Conflict { .. }))
    }
}

custom_error! {
    /// Local failures raised by configs and variables before or after a request.
    pub ResourceError
    ConflictingFields = "Value and text are mutually exclusive.",
    MissingPayload = "No text or value set.",
    InvalidState{reason: String} = "{reason}",
    InvalidName{full_name: String} = "Unexpected format of resource name '{full_name}'",
    InvalidValue{source: base64::DecodeError} = "Variable value is not valid base64: {source}",
    Timestamp{source: time::error::Parse} = "Invalid RFC3339 timestamp: {source}",
}
