use std::fmt;

/// A failed backend call: transport failure, non-2xx status, or an undecodable body.
///
/// Returned inside `anyhow::Error`; callers that care can `downcast_ref::<ApiError>()`.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub method: &'static str,
    pub path: String,
    pub status: Option<u16>,
    pub detail: String,
}

impl ApiError {
    pub fn transport(method: &'static str, path: &str, err: &reqwest::Error) -> Self {
        Self {
            method,
            path: path.to_string(),
            status: err.status().map(|s| s.as_u16()),
            detail: err.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(
                f,
                "backend error ({} {}, status={status}): {}",
                self.method, self.path, self.detail
            ),
            None => write!(
                f,
                "backend unreachable ({} {}): {}",
                self.method, self.path, self.detail
            ),
        }
    }
}

impl std::error::Error for ApiError {}
