use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use quiz_core::model::{UserId, UserProfile};
use storage::repository::{AccountRepository, NewAccount, StorageError};

use crate::error::{AccountError, ValidationError};

/// Shortest password accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Registration and login against the account repository.
///
/// Input validation happens before any storage call; validation failures
/// never touch the backend.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
}

impl AccountService {
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    /// Creates an account and returns its fresh profile.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Validation` for bad input,
    /// `AccountError::EmailTaken` for a duplicate email, and storage or
    /// hashing errors otherwise.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<UserProfile, AccountError> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() {
            return Err(ValidationError::EmptyUsername.into());
        }
        if email.is_empty() {
            return Err(ValidationError::EmptyEmail.into());
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            }
            .into());
        }
        if password != password_confirm {
            return Err(ValidationError::PasswordMismatch.into());
        }

        let account = NewAccount {
            user_id: UserId::random(),
            email: email.to_string(),
            username: username.to_string(),
            password_hash: hash_password(password)?,
        };

        self.accounts
            .create_account(&account)
            .await
            .map_err(|err| match err {
                StorageError::Conflict => AccountError::EmailTaken,
                other => AccountError::Storage(other),
            })
    }

    /// Verifies credentials and returns the stored profile.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Validation` for blank input,
    /// `AccountError::InvalidCredentials` on mismatch, and storage errors.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, AccountError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationError::EmptyEmail.into());
        }
        if password.is_empty() {
            return Err(ValidationError::EmptyPassword.into());
        }

        let record = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !verify_password(password, &record.password_hash) {
            return Err(AccountError::InvalidCredentials);
        }
        Ok(record.profile)
    }
}

fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AccountError::Hash(e.to_string()))
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;

    fn service() -> AccountService {
        AccountService::new(Arc::new(InMemoryRepository::new()))
    }

    #[tokio::test]
    async fn register_validates_before_storage() {
        let service = service();

        let err = service
            .register("", "a@example.com", "secret1", "secret1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AccountError::Validation(ValidationError::EmptyUsername)
        ));

        let err = service
            .register("alice", "a@example.com", "short", "short")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AccountError::Validation(ValidationError::PasswordTooShort { min: 6 })
        ));

        let err = service
            .register("alice", "a@example.com", "secret1", "secret2")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AccountError::Validation(ValidationError::PasswordMismatch)
        ));
    }

    #[tokio::test]
    async fn register_then_login_round_trip() {
        let service = service();
        let registered = service
            .register("alice", "a@example.com", "secret1", "secret1")
            .await
            .unwrap();
        assert_eq!(registered.username(), "alice");
        assert_eq!(registered.total_score(), 0);

        let logged_in = service.login("a@example.com", "secret1").await.unwrap();
        assert_eq!(logged_in.id(), registered.id());
    }

    #[tokio::test]
    async fn login_rejects_wrong_password_and_unknown_email_alike() {
        let service = service();
        service
            .register("alice", "a@example.com", "secret1", "secret1")
            .await
            .unwrap();

        let wrong_password = service
            .login("a@example.com", "not-it")
            .await
            .unwrap_err();
        assert!(matches!(wrong_password, AccountError::InvalidCredentials));

        let unknown_email = service.login("b@example.com", "secret1").await.unwrap_err();
        assert!(matches!(unknown_email, AccountError::InvalidCredentials));
    }

    #[tokio::test]
    async fn duplicate_email_is_reported_as_taken() {
        let service = service();
        service
            .register("alice", "a@example.com", "secret1", "secret1")
            .await
            .unwrap();

        let err = service
            .register("bob", "a@example.com", "secret1", "secret1")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::EmailTaken));
    }

    #[test]
    fn password_hashes_verify_and_do_not_repeat() {
        let first = hash_password("secret1").unwrap();
        let second = hash_password("secret1").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("secret1", &first));
        assert!(!verify_password("wrong", &first));
        assert!(!verify_password("secret1", "not-a-hash"));
    }
}
