//! Staff account provisioning.
//!
//! The web registration form only creates employees. Logists are created
//! here.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string
//! - `HROM_USER_PASSWORD` - Password for the new account. When unset a random
//!   one is generated and printed once.

use rand::Rng;
use rand::distr::Alphanumeric;

use hrom_core::UserRole;
use hrom_web::forms::RegisterForm;
use hrom_web::services::auth::AuthService;

use super::{CommandError, connect};

const GENERATED_PASSWORD_LENGTH: usize = 20;

fn generate_password() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}

/// Create a staff account with the given role.
///
/// Input goes through the registration form rules, so the CLI cannot create
/// an account the web form would reject.
pub async fn create_user(
    username: &str,
    email: &str,
    full_name: &str,
    phone: &str,
    role: &str,
) -> Result<i32, CommandError> {
    let role: UserRole = role
        .parse()
        .map_err(|_| CommandError::InvalidRole(role.to_owned()))?;

    let (password, generated) = match std::env::var("HROM_USER_PASSWORD") {
        Ok(password) if !password.is_empty() => (password, false),
        _ => (generate_password(), true),
    };

    let registration = RegisterForm {
        username: username.to_owned(),
        email: email.to_owned(),
        full_name: full_name.to_owned(),
        phone: phone.to_owned(),
        password: password.clone(),
    }
    .validate()
    .map_err(|errors| CommandError::InvalidInput(errors.to_string()))?;

    let pool = connect().await?;
    let user = AuthService::new(&pool)
        .create_user(registration, role)
        .await?;

    tracing::info!(
        "User created successfully! ID: {}, Username: {}, Role: {}",
        user.id,
        user.username,
        user.role
    );

    if generated {
        #[allow(clippy::print_stdout)]
        {
            println!("Generated password for {}: {password}", user.username);
        }
        tracing::warn!("Store the generated password now, it is not shown again");
    }

    Ok(user.id.as_i32())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_password_is_alphanumeric() {
        let password = generate_password();
        assert_eq!(password.len(), GENERATED_PASSWORD_LENGTH);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
