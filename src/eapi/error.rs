use thiserror::Error;

/// The ways an eAPI call can fail. Remote text is always embedded.
#[derive(Debug, Error)]
pub enum EapiError {
    #[error("eAPI request to {host} failed: {message}")]
    Transport { host: String, message: String },
    #[error("eAPI on {host} returned HTTP {status}: {body}")]
    Http { host: String, status: u16, body: String },
    #[error("eAPI error from {host} ({code}): {message}{}", format_details(.details))]
    Rpc {
        host: String,
        code: i64,
        message: String,
        details: Vec<String>,
    },
    #[error("Malformed eAPI response from {host}: {message}")]
    Malformed { host: String, message: String },
}

fn format_details(details: &[String]) -> String {
    if details.is_empty() {
        String::new()
    } else {
        format!(" [{}]", details.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_display_includes_details() {
        let err = EapiError::Rpc {
            host: "10.0.0.1".to_string(),
            code: 1002,
            message: "CLI command 3 of 4 failed".to_string(),
            details: vec!["Invalid input".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "eAPI error from 10.0.0.1 (1002): CLI command 3 of 4 failed [Invalid input]"
        );
    }

    #[test]
    fn test_rpc_display_without_details() {
        let err = EapiError::Rpc {
            host: "10.0.0.1".to_string(),
            code: -32600,
            message: "Invalid request".to_string(),
            details: vec![],
        };
        assert_eq!(err.to_string(), "eAPI error from 10.0.0.1 (-32600): Invalid request");
    }
}
