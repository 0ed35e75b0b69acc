use crate::config::{AppConfig, Argon2Config};
use crate::errors::{EduAdminError, Result};
use crate::models::users::requests::AccountRequest;
use crate::utils::password::hash_password_with;
use crate::utils::validate::{validate_email, validate_password_simple, validate_username};

/// 校验随档案一起开通的登录账号，并把密码替换为哈希值
pub fn prepare_account(account: AccountRequest) -> Result<AccountRequest> {
    prepare_account_with(account, &AppConfig::get().argon2)
}

pub fn prepare_account_with(account: AccountRequest, argon2: &Argon2Config) -> Result<AccountRequest> {
    validate_username(&account.username).map_err(EduAdminError::validation)?;
    validate_email(&account.email).map_err(EduAdminError::validation)?;
    validate_password_simple(&account.password).map_err(EduAdminError::validation)?;

    let password = hash_password_with(&account.password, argon2)?;
    Ok(AccountRequest {
        username: account.username,
        email: account.email.to_lowercase(),
        password,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::password::verify_password;

    const FAST: Argon2Config = Argon2Config {
        memory_cost: 1024,
        time_cost: 1,
        parallelism: 1,
    };

    fn account(username: &str, email: &str, password: &str) -> AccountRequest {
        AccountRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn test_password_is_hashed() {
        let prepared =
            prepare_account_with(account("alice", "Alice@Example.com", "Passw0rd!"), &FAST)
                .unwrap();
        assert_ne!(prepared.password, "Passw0rd!");
        assert!(verify_password("Passw0rd!", &prepared.password));
        assert_eq!(prepared.email, "alice@example.com");
    }

    #[test]
    fn test_invalid_fields_rejected() {
        for bad in [
            account("a", "alice@example.com", "Passw0rd!"),
            account("alice", "not-an-email", "Passw0rd!"),
            account("alice", "alice@example.com", "x"),
        ] {
            let err = prepare_account_with(bad, &FAST).unwrap_err();
            assert!(matches!(err, EduAdminError::Validation(_)));
        }
    }
}
