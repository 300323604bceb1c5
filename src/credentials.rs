use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Credential bundle used to reach the remote service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Bearer token for API requests
    pub access_token: String,

    /// Organization owning the stored records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,

    /// Legacy name for `organization_id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

impl Credentials {
    /// Create new Credentials
    pub fn new(access_token: String, organization_id: String) -> Self {
        Credentials {
            access_token,
            organization_id: Some(organization_id),
            account_id: None,
        }
    }

    /// Create Credentials that still use the legacy `account_id` key
    pub fn with_account_id(access_token: String, account_id: String) -> Self {
        Credentials {
            access_token,
            organization_id: None,
            account_id: Some(account_id),
        }
    }

    /// Migrate a legacy `account_id` into `organization_id`.
    ///
    /// `account_id` never survives normalization. When both are present the
    /// organization id wins. Fails if no organization id is left afterwards.
    pub fn normalized(mut self) -> Result<Self> {
        if let Some(account_id) = self.account_id.take().filter(|id| !id.is_empty()) {
            tracing::warn!(
                "The \"account_id\" credentials key has been renamed to \"organization_id\" \
                 and will be removed in the next major release"
            );
            if !self.has_organization_id() {
                self.organization_id = Some(account_id);
            }
        }

        if !self.has_organization_id() {
            return Err(StoreError::configuration(
                "credentials must include an organization_id",
            ));
        }
        Ok(self)
    }

    /// Check if we have a usable organization id
    pub fn has_organization_id(&self) -> bool {
        self.organization_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    pub fn organization_id(&self) -> &str {
        self.organization_id.as_deref().unwrap_or_default()
    }
}

// Implement Debug manually to avoid exposing the access token
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field("organization_id", &self.organization_id)
            .field("account_id", &self.account_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_account_id_is_promoted() {
        let credentials: Credentials = serde_json::from_value(serde_json::json!({
            "access_token": "token",
            "account_id": "A"
        }))
        .unwrap();

        let normalized = credentials.normalized().unwrap();
        assert_eq!(normalized.organization_id(), "A");
        assert_eq!(normalized.account_id, None);

        let json = serde_json::to_value(&normalized).unwrap();
        assert_eq!(json["organization_id"], "A");
        assert!(json.get("account_id").is_none());
    }

    #[test]
    fn test_organization_id_wins_over_account_id() {
        let credentials = Credentials {
            access_token: "token".to_string(),
            organization_id: Some("org".to_string()),
            account_id: Some("legacy".to_string()),
        };

        let normalized = credentials.normalized().unwrap();
        assert_eq!(normalized.organization_id(), "org");
        assert_eq!(normalized.account_id, None);
    }

    #[test]
    fn test_missing_organization_id_is_rejected() {
        let credentials = Credentials {
            access_token: "token".to_string(),
            organization_id: Some(String::new()),
            account_id: None,
        };

        let error = credentials.normalized().unwrap_err();
        assert!(matches!(error, StoreError::Configuration(_)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let credentials = Credentials::new("secret-token".to_string(), "org".to_string());
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }
}
