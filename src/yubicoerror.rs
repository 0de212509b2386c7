use thiserror::Error;

#[derive(Debug, Error)]
pub enum YubicoError {
    #[error("Connectivity error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("The OTP must be between 32 and 48 characters long")]
    InvalidLength,
    #[error("The OTP has invalid format or contains invalid characters")]
    InvalidFormat,
    #[error("OTP mismatch, it may be an attack attempt")]
    MismatchedOtp,
    #[error("Nonce mismatch, it may be an attack attempt")]
    MismatchedNonce,
    #[error("Non-OK status sent by the OTP validation server: {0}")]
    RejectedStatus(String),
    #[error("No validation server produced a usable response")]
    NoResponse,
    #[error("No validation server answered before the deadline")]
    Timeout,
    #[error("At least one validation server must be configured")]
    NoApiHosts,
}

impl YubicoError {
    /// The status string reported by the winning server, if the error came from one.
    pub fn status(&self) -> Option<&str> {
        match self {
            YubicoError::RejectedStatus(status) => Some(status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_status_carries_the_server_status() {
        let err = YubicoError::RejectedStatus("BAD_OTP".into());
        assert_eq!(err.status(), Some("BAD_OTP"));
        assert!(err.to_string().ends_with("BAD_OTP"));
        assert_eq!(YubicoError::MismatchedNonce.status(), None);
    }
}
