use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError, RegisterRequest, Role, UserProfile};

use super::jwt;
use super::token_store::{TokenStore, TokenStoreError};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Credential storage failed: {0}")]
    Store(#[from] TokenStoreError),
    #[error("Not logged in")]
    NotAuthenticated,
}

/// The signed-in user and the credential behind it.
///
/// Built once at startup and handed to whatever needs identity; `init`
/// restores a previous login, `logout` tears it down in both the store and
/// memory.
#[derive(Debug)]
pub struct AuthSession {
    api: ApiClient,
    store: TokenStore,
    identity: Option<UserProfile>,
}

impl AuthSession {
    pub fn new(api: ApiClient, store: TokenStore) -> Self {
        Self {
            api,
            store,
            identity: None,
        }
    }

    /// Restore identity from the stored credential.
    ///
    /// A missing token leaves the session anonymous. An undecodable or
    /// expired token, or any failure fetching `/users/me`, logs out.
    pub fn init(&mut self) -> Option<&UserProfile> {
        let token = match self.store.get() {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("No stored credential");
                return None;
            }
            Err(err) => {
                warn!("Stored credential unreadable: {err}");
                self.logout_quietly();
                return None;
            }
        };
        match jwt::decode_claims(&token) {
            Ok(claims) if claims.is_expired(jwt::unix_now()) => {
                info!("Stored credential expired");
                self.logout_quietly();
                return None;
            }
            Ok(_) => {}
            Err(err) => {
                warn!("Stored credential invalid: {err}");
                self.logout_quietly();
                return None;
            }
        }
        self.api.set_credential(Some(token));
        match self.api.me() {
            Ok(profile) => {
                debug!(user_id = profile.id, role = profile.role.as_str(), "Identity restored");
                self.identity = Some(profile);
            }
            Err(err) => {
                if err.is_unauthorized() {
                    info!("Stored credential rejected by server");
                } else {
                    warn!("Identity check failed: {err}");
                }
                self.logout_quietly();
            }
        }
        self.identity.as_ref()
    }

    /// Exchange credentials for a token, persist it and load the profile.
    pub fn login(&mut self, username: &str, password: &str) -> Result<&UserProfile, AuthError> {
        let token = self.api.login_access_token(username.trim(), password)?;
        self.store.set(&token)?;
        self.api.set_credential(Some(token));
        match self.api.me() {
            Ok(profile) => {
                info!(user_id = profile.id, "Logged in");
                Ok(self.identity.insert(profile))
            }
            Err(err) => {
                self.logout_quietly();
                Err(err.into())
            }
        }
    }

    /// Forget the credential everywhere.
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.identity = None;
        self.api.set_credential(None);
        self.store.delete()?;
        Ok(())
    }

    /// Create an account. The caller stays logged out and signs in afterwards.
    pub fn register(&self, request: &RegisterRequest) -> Result<UserProfile, AuthError> {
        let profile = self.api.register(request)?;
        info!(user_id = profile.id, role = profile.role.as_str(), "Account registered");
        Ok(profile)
    }

    pub fn identity(&self) -> Option<&UserProfile> {
        self.identity.as_ref()
    }

    /// Identity or [`AuthError::NotAuthenticated`].
    pub fn require_identity(&self) -> Result<&UserProfile, AuthError> {
        self.identity.as_ref().ok_or(AuthError::NotAuthenticated)
    }

    /// Role of the current user; anonymous sessions read as athlete.
    pub fn role(&self) -> Role {
        self.identity
            .as_ref()
            .map(|profile| profile.role)
            .unwrap_or_default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Replace the cached profile after a successful `/users/me` update.
    pub fn replace_identity(&mut self, profile: UserProfile) {
        self.identity = Some(profile);
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn logout_quietly(&mut self) {
        if let Err(err) = self.logout() {
            warn!("Failed to clear stored credential: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerSettings;
    use tempfile::tempdir;

    // Port 9 (discard) is never listening; tests below must not reach the network.
    fn offline_api() -> ApiClient {
        ApiClient::new(&ServerSettings {
            origin: "http://127.0.0.1:9".into(),
            api_prefix: "/api/v1".into(),
        })
    }

    #[test]
    fn init_without_token_stays_anonymous() {
        let dir = tempdir().unwrap();
        let store = TokenStore::file_only(dir.path()).unwrap();
        let mut session = AuthSession::new(offline_api(), store);
        assert!(session.init().is_none());
        assert!(!session.is_authenticated());
        assert_eq!(session.role(), Role::Athlete);
        assert!(matches!(
            session.require_identity(),
            Err(AuthError::NotAuthenticated)
        ));
    }

    #[test]
    fn expired_token_is_cleared_without_a_request() {
        let dir = tempdir().unwrap();
        let store = TokenStore::file_only(dir.path()).unwrap();
        store
            .set(&jwt::encode_for_test(r#"{"exp": 1000, "sub": "1"}"#))
            .unwrap();
        let mut session = AuthSession::new(offline_api(), store.clone());
        assert!(session.init().is_none());
        assert_eq!(store.get().unwrap(), None);
        assert!(!session.api().has_credential());
    }

    #[test]
    fn garbage_token_is_cleared() {
        let dir = tempdir().unwrap();
        let store = TokenStore::file_only(dir.path()).unwrap();
        store.set("definitely-not-a-jwt").unwrap();
        let mut session = AuthSession::new(offline_api(), store.clone());
        assert!(session.init().is_none());
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn logout_clears_memory_and_store() {
        let dir = tempdir().unwrap();
        let store = TokenStore::file_only(dir.path()).unwrap();
        store.set("a.b.c").unwrap();
        let mut session = AuthSession::new(offline_api(), store.clone());
        session.api().set_credential(Some("a.b.c".into()));
        session.replace_identity(UserProfile {
            id: 4,
            email: "coach@ssts.dev".into(),
            full_name: None,
            role: Role::Coach,
            is_active: true,
            height: None,
            weight: None,
            personal_best: None,
        });
        assert_eq!(session.role(), Role::Coach);
        session.logout().unwrap();
        assert!(session.identity().is_none());
        assert!(!session.api().has_credential());
        assert_eq!(store.get().unwrap(), None);
    }
}
