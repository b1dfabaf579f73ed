use std::sync::Arc;

use tracing::info;

use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{LoginRequest, RegisterRequest, User};
use crate::infrastructure::jwt::JwtService;

/// A user together with a freshly issued bearer token.
#[derive(Debug, Clone)]
pub(crate) struct AuthResult {
    pub(crate) user: User,
    pub(crate) access_token: String,
}

pub(crate) struct AuthService {
    repo: Arc<dyn UserRepository>,
    jwt: Arc<JwtService>,
}

impl AuthService {
    pub(crate) fn new(repo: Arc<dyn UserRepository>, jwt: Arc<JwtService>) -> Self {
        Self { repo, jwt }
    }

    pub(crate) async fn register(&self, req: RegisterRequest) -> Result<AuthResult, DomainError> {
        let RegisterRequest {
            username,
            email,
            password,
        } = req.validate()?;

        let user = self
            .repo
            .create_user(NewUser {
                username,
                email: email.unwrap_or_default(),
                password_hash: password::hash(&password)?,
            })
            .await?;
        info!(user_id = user.id, "user registered");

        self.session_for(user)
    }

    /// Unknown usernames and wrong passwords are indistinguishable to the caller.
    pub(crate) async fn login(&self, req: LoginRequest) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;

        let account = self.repo.find_by_username(&req.username).await?;
        // an unknown user still pays for one verification
        let stored_hash = account
            .as_ref()
            .map_or(password::UNKNOWN_USER_HASH, |creds| creds.password_hash.as_str());
        let accepted = password::matches(&req.password, stored_hash)?;

        match account {
            Some(creds) if accepted => self.session_for(creds.user),
            _ => Err(DomainError::InvalidCredentials),
        }
    }

    fn session_for(&self, user: User) -> Result<AuthResult, DomainError> {
        let access_token = self
            .jwt
            .generate_token(user.id, &user.username)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(AuthResult { user, access_token })
    }
}

/// Argon2id with 19 MiB of memory, two passes, one lane.
mod password {
    use argon2::{
        Algorithm, Argon2, Params, Version,
        password_hash::{
            Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
            rand_core::OsRng,
        },
    };

    use crate::domain::error::DomainError;

    pub(super) const UNKNOWN_USER_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$gwN6hT1sNdk9kI95f7n2Gl3fL0qRmBf2Ffkj2r90/0M";

    fn hasher() -> Result<Argon2<'static>, DomainError> {
        let params = Params::new(19 * 1024, 2, 1, None).map_err(unexpected)?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    fn unexpected(err: impl std::fmt::Display) -> DomainError {
        DomainError::Unexpected(err.to_string())
    }

    pub(super) fn hash(raw: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let encoded = hasher()?
            .hash_password(raw.as_bytes(), &salt)
            .map_err(unexpected)?;
        Ok(encoded.to_string())
    }

    /// `Ok(false)` on a mismatch; a malformed stored hash is an error.
    pub(super) fn matches(raw: &str, encoded: &str) -> Result<bool, DomainError> {
        let parsed = PasswordHash::new(encoded).map_err(unexpected)?;
        match hasher()?.verify_password(raw.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(err) => Err(unexpected(err)),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::{UNKNOWN_USER_HASH, hash, matches};

        #[test]
        fn hashes_are_salted_argon2id() {
            let first = hash("correct horse").unwrap();
            let second = hash("correct horse").unwrap();
            assert!(first.starts_with("$argon2id$"));
            assert_ne!(first, second);
            assert!(matches("correct horse", &first).unwrap());
            assert!(!matches("battery staple", &first).unwrap());
        }

        #[test]
        fn unknown_user_hash_is_well_formed() {
            assert!(!matches("anything", UNKNOWN_USER_HASH).unwrap());
        }

        #[test]
        fn malformed_stored_hash_is_unexpected() {
            assert!(matches("anything", "not-a-hash").is_err());
        }
    }
}
