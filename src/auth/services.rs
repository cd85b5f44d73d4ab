use tracing::{info, instrument, warn};

use super::dto::{LoginRequest, RegisterRequest};
use super::jwt::JwtKeys;
use super::password::{hash_password, verify_credentials};
use super::repo_types::NewUser;
use crate::error::{AppError, AppResult};
use crate::store::UserStore;
use crate::validate::{missing_fields, non_blank};

/// Creates a user. Does not log the user in.
///
/// The existence check and the insert are two separate store calls, so two
/// concurrent registrations of the same email can both succeed.
#[instrument(skip(store, input))]
pub async fn register<S>(store: &S, input: RegisterRequest) -> AppResult<()>
where
    S: UserStore + ?Sized,
{
    let password = input.password.filter(|p| !p.is_empty());
    let (name, email, password) = match (non_blank(input.name), non_blank(input.email), password) {
        (Some(n), Some(e), Some(p)) => (n, e, p),
        (n, e, p) => {
            return Err(missing_fields(&[
                ("name", n.is_some()),
                ("email", e.is_some()),
                ("password", p.is_some()),
            ]))
        }
    };

    if store
        .find_user_by_email(&email)
        .await
        .map_err(AppError::Store)?
        .is_some()
    {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_password(&password).map_err(AppError::Internal)?;
    let user = store
        .insert_user(NewUser {
            name,
            email,
            password_hash,
        })
        .await
        .map_err(AppError::Store)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(())
}

/// Returns a signed bearer token for valid credentials. Unknown email and
/// wrong password produce the same error.
#[instrument(skip(store, keys, input))]
pub async fn login<S>(store: &S, keys: &JwtKeys, input: LoginRequest) -> AppResult<String>
where
    S: UserStore + ?Sized,
{
    let password = input.password.filter(|p| !p.is_empty());
    let (email, password) = match (non_blank(input.email), password) {
        (Some(e), Some(p)) => (e, p),
        (e, p) => {
            return Err(missing_fields(&[
                ("email", e.is_some()),
                ("password", p.is_some()),
            ]))
        }
    };

    let user = store
        .find_user_by_email(&email)
        .await
        .map_err(AppError::Store)?;

    // Unknown emails still pay for one argon2 verify.
    let verified = verify_credentials(&password, user.as_ref().map(|u| u.password_hash.as_str()))
        .map_err(AppError::Internal)?;

    let user = match user {
        Some(user) if verified => user,
        Some(user) => {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AppError::invalid_credentials());
        }
        None => {
            warn!(email = %email, "login unknown email");
            return Err(AppError::invalid_credentials());
        }
    };

    let token = keys.issue(user.id, &user.email).map_err(AppError::Internal)?;
    info!(user_id = %user.id, "user logged in");
    Ok(token)
}
