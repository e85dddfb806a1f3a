//! Admin access: verbatim comparison against configured credentials and a session token.

use crate::config::FolioConfig;

pub const ADMIN_USERNAME: &str = "Admin";

#[derive(Debug, Clone)]
pub struct AdminAuth {
    email: Option<String>,
    password: Option<String>,
    token: String,
}

impl AdminAuth {
    /// Uses the configured token, or a random one that lives as long as the process.
    pub fn from_config(cfg: &FolioConfig) -> Self {
        let token = cfg
            .admin_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());
        Self::new(cfg.admin_email.clone(), cfg.admin_password.clone(), token)
    }

    pub fn new(email: Option<String>, password: Option<String>, token: impl Into<String>) -> Self {
        Self {
            email: email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty()),
            password: password.filter(|p| !p.is_empty()),
            token: token.into(),
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the session token when both values match. Always fails if no credentials are set.
    pub fn login(&self, email: &str, password: &str) -> Option<&str> {
        match (&self.email, &self.password) {
            (Some(e), Some(p)) if e.eq_ignore_ascii_case(email.trim()) && p == password => {
                Some(self.token.as_str())
            }
            _ => None,
        }
    }

    pub fn verify_token(&self, presented: &str) -> bool {
        !presented.is_empty() && presented.trim() == self.token
    }
}
