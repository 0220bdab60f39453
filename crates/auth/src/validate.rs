//! Input validation for login and registration.

use pizzeria_core::{DomainError, DomainResult};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Structural email check: one `@` with non-empty local part and a domain
/// containing a dot. Deliverability is not our problem.
pub fn validate_email(email: &str) -> DomainResult<()> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(DomainError::invalid_input("invalid email address"));
    };
    let valid = !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty());
    if !valid {
        return Err(DomainError::invalid_input("invalid email address"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> DomainResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(DomainError::invalid_input(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(validate_email("mario@pizzeria.se").is_ok());
        assert!(validate_email("a@b.c").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", "no-at-sign", "@pizzeria.se", "mario@", "mario@nodot", "a@@b.c"] {
            assert!(validate_email(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn password_length_rule() {
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password("1234567").is_err());
    }
}
