use crate::toast::ToastKind;

/// Errors surfaced by the interview workflows
///
/// None of these are fatal: every workflow recovers at its boundary and turns
/// the error into a toast.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("Camera access was denied")]
    PermissionDenied,

    #[error("No camera device is available")]
    DeviceUnavailable,

    #[error("Speech recognition is not supported in this environment")]
    EngineUnavailable,

    #[error("{0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("{0}")]
    ServerRejection(String),
}

impl SessionError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Which toast style this error is reported with
    pub fn toast_kind(&self) -> ToastKind {
        match self {
            Self::Validation(_) | Self::EngineUnavailable => ToastKind::Warning,
            _ => ToastKind::Error,
        }
    }

    pub fn is_camera_error(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::DeviceUnavailable)
    }
}

impl From<reqwest::Error> for SessionError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_warnings() {
        assert_eq!(
            SessionError::validation("too short").toast_kind(),
            ToastKind::Warning
        );
        assert_eq!(
            SessionError::Network("timeout".into()).toast_kind(),
            ToastKind::Error
        );
    }

    #[test]
    fn test_server_rejection_displays_message_verbatim() {
        let err = SessionError::ServerRejection("No file selected".into());
        assert_eq!(err.to_string(), "No file selected");
    }

    #[test]
    fn test_camera_errors() {
        assert!(SessionError::PermissionDenied.is_camera_error());
        assert!(SessionError::DeviceUnavailable.is_camera_error());
        assert!(!SessionError::EngineUnavailable.is_camera_error());
    }
}
