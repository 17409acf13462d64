//! Validations côté serveur des formulaires

use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("motif d'email valide"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

pub fn require_fields(fields: &[&str], message: &str) -> Result<(), AppError> {
    if fields.iter().any(|field| field.trim().is_empty()) {
        return Err(AppError::validation(message));
    }
    Ok(())
}

pub fn check_email(email: &str) -> Result<(), AppError> {
    if !is_valid_email(email) {
        return Err(AppError::validation("Format d'email invalide"));
    }
    Ok(())
}

pub fn check_password(password: &str) -> Result<(), AppError> {
    if !is_valid_password(password) {
        return Err(AppError::validation(format!(
            "Le mot de passe doit contenir au moins {MIN_PASSWORD_LEN} caractères"
        )));
    }
    Ok(())
}

/// Analyse un identifiant entier passé dans le chemin
pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim().parse().map_err(|_| AppError::validation("ID invalide"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_format() {
        assert!(is_valid_email("jean@exemple.fr"));
        assert!(is_valid_email("a.b@c.d.e"));
        assert!(!is_valid_email("jean@exemple"));
        assert!(!is_valid_email("jean exemple@x.fr"));
        assert!(!is_valid_email("@exemple.fr"));
        assert!(!is_valid_email("jean@.fr"));
        assert!(!is_valid_email("jean@exemple."));
        assert!(!is_valid_email("a@b@c.fr"));
        assert!(is_valid_email("jean@a.b."));
    }

    #[test]
    fn password_length() {
        assert!(!is_valid_password("12345"));
        assert!(is_valid_password("123456"));
    }

    #[test]
    fn blank_fields_are_missing() {
        assert!(require_fields(&["a", "  "], "requis").is_err());
        assert!(require_fields(&["a", "b"], "requis").is_ok());
    }

    #[test]
    fn path_ids() {
        assert_eq!(parse_id("12").unwrap(), 12);
        assert!(parse_id("abc").is_err());
    }
}
