//! User registry operations on the [`Store`].

use crate::config::{DEFAULT_PROFILE, HOME_PREFIX};
use crate::core::error::AuthError;
use crate::core::store::{Store, UserRecord, profile_path};
use crate::models::NodeKind;

impl Store {
    /// Plaintext password check. Unknown users never authenticate.
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .is_some_and(|user| user.password == password)
    }

    /// Make `username` the current user.
    pub fn switch_user(&mut self, username: &str) -> Result<(), AuthError> {
        if !self.users.contains_key(username) {
            return Err(AuthError::UserNotFound(username.to_string()));
        }
        log::info!("switching user {} -> {}", self.current_user, username);
        self.current_user = username.to_string();
        Ok(())
    }

    /// Register a new account with home directory `/home/<username>`.
    ///
    /// The home directory (and `/home` if it was removed) is created first,
    /// owned by the new user and seeded with a profile file. The account is
    /// only registered once its home directory exists.
    pub fn add_user(
        &mut self,
        username: &str,
        password: &str,
        is_admin: bool,
        now: u64,
    ) -> Result<(), AuthError> {
        if self.users.contains_key(username) {
            return Err(AuthError::UserExists(username.to_string()));
        }

        let home_dir = format!("{}/{}", HOME_PREFIX, username);
        let home_error = |source| AuthError::HomeDirectory {
            path: home_dir.clone(),
            source,
        };

        self.root
            .create_dir_all(&home_dir, &self.current_user, now)
            .map_err(home_error)?;
        self.root
            .set_owner(&home_dir, username)
            .map_err(home_error)?;

        let profile = profile_path(&home_dir);
        if self.root.get_node(&profile).is_none() {
            self.root
                .create_node(&profile, NodeKind::File, DEFAULT_PROFILE, username, now)
                .map_err(home_error)?;
        }

        self.users.insert(
            username.to_string(),
            UserRecord {
                password: password.to_string(),
                is_admin,
                home_dir: home_dir.clone(),
            },
        );
        log::info!("added user {} (home {})", username, home_dir);
        Ok(())
    }

    /// Replace the password of an existing account.
    pub fn set_password(&mut self, username: &str, password: &str) -> Result<(), AuthError> {
        let user = self
            .users
            .get_mut(username)
            .ok_or_else(|| AuthError::UserNotFound(username.to_string()))?;
        user.password = password.to_string();
        Ok(())
    }
}
