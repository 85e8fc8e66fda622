use crate::error::{ArmError, ArmResult};
use secrecy::{ExposeSecret, SecretString};

/// Credential types accepted by the ARM clients.
///
/// Token acquisition and refresh are deliberately not handled here: the
/// caller (or a sidecar refresher) obtains a control-plane access token and
/// hands it to the client, either directly or through the environment.
#[derive(Clone)]
pub enum ArmCredential {
    /// A pre-acquired service-principal bearer token.
    BearerToken(SecretString),

    /// Read the token from `AZURE_ARM_TOKEN` on every call, so an external
    /// refresher can rotate it without rebuilding the clients.
    EnvToken,
}

impl ArmCredential {
    /// Create a credential from the `AZURE_ARM_TOKEN` environment variable.
    /// Falls back to per-call environment lookup if the variable is not set
    /// at construction time.
    pub fn from_env() -> ArmResult<Self> {
        match std::env::var("AZURE_ARM_TOKEN") {
            Ok(token) if !token.is_empty() => Ok(Self::BearerToken(SecretString::from(token))),
            _ => Ok(Self::EnvToken),
        }
    }

    /// Create a credential from an already-issued bearer token.
    pub fn bearer_token(token: impl Into<String>) -> Self {
        Self::BearerToken(SecretString::from(token.into()))
    }

    /// Resolve the credential to an `Authorization` header value.
    pub fn resolve(&self) -> ArmResult<String> {
        match self {
            Self::BearerToken(token) => Ok(format!("Bearer {}", token.expose_secret())),
            Self::EnvToken => {
                let token = std::env::var("AZURE_ARM_TOKEN").map_err(|_| {
                    ArmError::Auth(
                        "no access token available. Set AZURE_ARM_TOKEN or supply \
                         ArmCredential::bearer_token."
                            .into(),
                    )
                })?;
                Ok(format!("Bearer {}", token))
            }
        }
    }
}

impl std::fmt::Debug for ArmCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BearerToken(_) => write!(f, "ArmCredential::BearerToken(****)"),
            Self::EnvToken => write!(f, "ArmCredential::EnvToken"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn bearer_token_resolves_to_authorization_header() {
        let credential = ArmCredential::bearer_token("abc123");
        let header = credential.resolve().expect("should resolve");
        assert_eq!(header, "Bearer abc123");
    }

    #[test]
    fn debug_output_redacts_token() {
        let credential = ArmCredential::bearer_token("super-secret");
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("****"));
    }

    #[test]
    #[serial]
    fn env_token_resolves_from_environment() {
        std::env::set_var("AZURE_ARM_TOKEN", "env-token");

        let header = ArmCredential::EnvToken.resolve().expect("should resolve");
        assert_eq!(header, "Bearer env-token");

        std::env::remove_var("AZURE_ARM_TOKEN");
    }

    #[test]
    #[serial]
    fn env_token_errors_when_unset() {
        std::env::remove_var("AZURE_ARM_TOKEN");

        let result = ArmCredential::EnvToken.resolve();
        assert!(matches!(result, Err(ArmError::Auth(_))));
    }

    #[test]
    #[serial]
    fn from_env_prefers_captured_token() {
        std::env::set_var("AZURE_ARM_TOKEN", "captured");

        let credential = ArmCredential::from_env().expect("should build");
        assert!(matches!(credential, ArmCredential::BearerToken(_)));

        std::env::remove_var("AZURE_ARM_TOKEN");
    }
}
