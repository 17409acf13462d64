use bcrypt::{hash, verify};

/// Hache un mot de passe en utilisant bcrypt
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, 4) // Utilise un coût de 4 pour un équilibre entre sécurité et performance
}

/// Vrai si la valeur stockée est un hachage bcrypt
pub fn is_hashed(stored: &str) -> bool {
    stored.starts_with("$2")
}

/// Vérifie si un mot de passe correspond à la valeur stockée.
/// Les anciens comptes de users.json ont un mot de passe en clair.
pub fn verify_password(password: &str, stored: &str) -> bool {
    if !is_hashed(stored) {
        return password == stored;
    }
    verify(password, stored).unwrap_or(false)
}
