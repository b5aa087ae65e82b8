//! Registration, login and account maintenance.
//!
//! The email uniqueness check runs before the write and is not atomic with
//! it. Two concurrent registrations for one address can both pass the check;
//! the loser is then rejected by the store's unique index, which surfaces as
//! the same `EmailExists` error.

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    error::UserError,
    repo::UserRepository,
    repo_types::{NewUser, User},
};
use crate::{
    auth::{
        jwt::JwtKeys,
        password::{hash_password, verify_password},
    },
    validate::{is_valid_email, is_valid_password},
};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    keys: JwtKeys,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, keys: JwtKeys) -> Self {
        Self { repo, keys }
    }

    /// Creates the account and returns it together with a session token.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<(User, String), UserError> {
        if !is_valid_email(email) {
            warn!(email = %email, "register: invalid email");
            return Err(UserError::InvalidEmail);
        }
        if !is_valid_password(password) {
            warn!("register: password too short");
            return Err(UserError::InvalidPassword);
        }
        if name.trim().is_empty() {
            return Err(UserError::InvalidName);
        }

        if self.repo.find_by_email(email).await?.is_some() {
            warn!(email = %email, "register: email already registered");
            return Err(UserError::EmailExists);
        }

        let password_hash = hash_password(password)?;
        let now = OffsetDateTime::now_utc();
        let new_user = NewUser {
            email: email.to_string(),
            password_hash,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        let id = self.repo.insert(&new_user).await?;

        let user = User {
            id,
            email: new_user.email,
            password_hash: new_user.password_hash,
            name: new_user.name,
            created_at: new_user.created_at,
            updated_at: new_user.updated_at,
        };
        let token = self.keys.issue(user.id, &user.email)?;

        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok((user, token))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), UserError> {
        let Some(user) = self.repo.find_by_email(email).await? else {
            warn!(email = %email, "login: unknown email");
            return Err(UserError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash) {
            warn!(user_id = %user.id, "login: password mismatch");
            return Err(UserError::InvalidCredentials);
        }

        let token = self.keys.issue(user.id, &user.email)?;
        info!(user_id = %user.id, "user logged in");
        Ok((user, token))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<User, UserError> {
        let id = parse_id(id)?;
        self.find_existing(id).await
    }

    /// Replaces email and name. The email is only re-checked when it changes.
    pub async fn update(&self, id: &str, email: &str, name: &str) -> Result<User, UserError> {
        let id = parse_id(id)?;
        if name.trim().is_empty() {
            return Err(UserError::InvalidName);
        }

        let mut user = self.find_existing(id).await?;

        if email != user.email {
            if !is_valid_email(email) {
                warn!(user_id = %id, email = %email, "update: invalid email");
                return Err(UserError::InvalidEmail);
            }
            if self.repo.find_by_email(email).await?.is_some() {
                warn!(user_id = %id, email = %email, "update: email already taken");
                return Err(UserError::EmailExists);
            }
        }

        user.email = email.to_string();
        user.name = name.to_string();
        user.updated_at = OffsetDateTime::now_utc();
        self.repo.update(&user).await?;

        info!(user_id = %user.id, "user updated");
        Ok(user)
    }

    pub async fn delete(&self, id: &str) -> Result<(), UserError> {
        let id = parse_id(id)?;
        self.find_existing(id).await?;
        self.repo.delete(id).await?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }

    /// Resolves the subject of an already verified token.
    pub async fn current(&self, id: Uuid) -> Result<User, UserError> {
        self.find_existing(id).await
    }

    async fn find_existing(&self, id: Uuid) -> Result<User, UserError> {
        self.repo.find_by_id(id).await?.ok_or(UserError::NotFound)
    }
}

fn parse_id(raw: &str) -> Result<Uuid, UserError> {
    Uuid::parse_str(raw).map_err(|_| UserError::InvalidId)
}
