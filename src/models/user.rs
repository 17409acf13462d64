use serde::{Deserialize, Serialize};

use super::role::Role;

/// Représente un utilisateur dans users.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password: String, // Hachage bcrypt (ou ancien mot de passe en clair)
    pub nom: String,
    pub role: Role,
}

/// Utilisateur tel qu'exposé par l'API, sans le mot de passe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub nom: String,
    pub role: Role,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            nom: user.nom.clone(),
            role: user.role,
        }
    }
}

/// Structure pour les requêtes d'inscription d'utilisateur
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    #[serde(default)]
    pub nom: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub access_code: Option<String>, // Champ optionnel pour le code d'accès admin
}

/// Structure pour la création d'un utilisateur par un administrateur
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserForm {
    #[serde(default)]
    pub nom: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

/// Mise à jour d'un utilisateur par un administrateur
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserForm {
    #[serde(default)]
    pub nom: String,
    #[serde(default)]
    pub email: String,
    pub role: Option<Role>,
    pub password: Option<String>,
}

/// Mise à jour du profil par l'utilisateur connecté
#[derive(Debug, Default, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub nom: String,
    #[serde(default)]
    pub email: String,
    pub password: Option<String>,
}

/// Structure pour les requêtes de connexion d'utilisateur
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}
