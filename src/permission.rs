//! Sensor permission gate
//!
//! Some mobile browsers only deliver orientation/motion events after the
//! page asks for permission from inside a user gesture. The gate tracks that
//! one-shot request; the scene is only built once it reports `Granted`.

/// Where the permission request stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    /// Waiting for the user to press the permission button
    Idle,
    /// Request in flight
    Requesting,
    /// Sensors available, scene may be built
    Granted,
    /// Refused or failed; the button stays up for another try
    Denied,
}

/// Why the gate did not open
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    /// The browser answered with something other than "granted"
    #[error("permission denied ({0})")]
    Denied(String),
    /// The request itself rejected
    #[error("permission request failed: {0}")]
    RequestFailed(String),
}

#[derive(Debug, Clone)]
pub struct PermissionGate {
    state: PermissionState,
}

impl PermissionGate {
    /// Platforms without a permission requirement start out granted
    pub fn new(required: bool) -> Self {
        let state = if required {
            PermissionState::Idle
        } else {
            PermissionState::Granted
        };
        Self { state }
    }

    pub fn state(&self) -> PermissionState {
        self.state
    }

    pub fn is_granted(&self) -> bool {
        self.state == PermissionState::Granted
    }

    /// Start a request. Only valid from `Idle` or after a denial (re-click).
    pub fn begin_request(&mut self) -> bool {
        match self.state {
            PermissionState::Idle | PermissionState::Denied => {
                self.state = PermissionState::Requesting;
                true
            }
            PermissionState::Requesting | PermissionState::Granted => false,
        }
    }

    /// Record the browser's answer
    ///
    /// `Ok` carries the permission string the browser resolved with,
    /// `Err` the rejection message.
    pub fn resolve(&mut self, outcome: Result<&str, String>) -> Result<(), PermissionError> {
        match outcome {
            Ok("granted") => {
                self.state = PermissionState::Granted;
                Ok(())
            }
            Ok(other) => {
                self.state = PermissionState::Denied;
                Err(PermissionError::Denied(other.to_string()))
            }
            Err(msg) => {
                self.state = PermissionState::Denied;
                Err(PermissionError::RequestFailed(msg))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_required_grants_immediately() {
        let gate = PermissionGate::new(false);
        assert!(gate.is_granted());
    }

    #[test]
    fn test_granted_flow() {
        let mut gate = PermissionGate::new(true);
        assert_eq!(gate.state(), PermissionState::Idle);
        assert!(gate.begin_request());
        assert_eq!(gate.state(), PermissionState::Requesting);

        // A second click while in flight is ignored
        assert!(!gate.begin_request());

        assert_eq!(gate.resolve(Ok("granted")), Ok(()));
        assert!(gate.is_granted());
        assert!(!gate.begin_request());
    }

    #[test]
    fn test_denied_allows_retry() {
        let mut gate = PermissionGate::new(true);
        gate.begin_request();
        let err = gate.resolve(Ok("denied")).unwrap_err();
        assert_eq!(err, PermissionError::Denied("denied".into()));
        assert_eq!(gate.state(), PermissionState::Denied);

        assert!(gate.begin_request());
        assert_eq!(gate.resolve(Ok("granted")), Ok(()));
    }

    #[test]
    fn test_request_failure() {
        let mut gate = PermissionGate::new(true);
        gate.begin_request();
        let err = gate
            .resolve(Err("NotAllowedError".into()))
            .unwrap_err();
        assert!(matches!(err, PermissionError::RequestFailed(_)));
        assert!(!gate.is_granted());
    }
}
