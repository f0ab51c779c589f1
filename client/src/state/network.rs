//! Network-authorization status shown in the banner under the navbar.

/// Result of testing the client address against one allow-list prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixCheck {
    pub prefix: &'static str,
    pub matches: bool,
}

/// Outcome of the one-shot client IP check. Informational only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkStatus {
    pub ip: String,
    pub network: String,
    pub is_allowed: bool,
    pub message: String,
    pub checked: bool,
    pub checks: Vec<PrefixCheck>,
}

impl NetworkStatus {
    /// Placeholder while the check is in flight.
    #[must_use]
    pub fn checking() -> Self {
        Self {
            ip: "checking...".to_owned(),
            network: "Detecting...".to_owned(),
            is_allowed: false,
            message: "Checking network authorization...".to_owned(),
            checked: false,
            checks: Vec::new(),
        }
    }

    /// Every lookup failed.
    #[must_use]
    pub fn error() -> Self {
        Self {
            ip: "error".to_owned(),
            network: "Error".to_owned(),
            is_allowed: false,
            message: "Error checking network authorization".to_owned(),
            checked: true,
            checks: Vec::new(),
        }
    }
}

impl Default for NetworkStatus {
    fn default() -> Self {
        Self::checking()
    }
}
