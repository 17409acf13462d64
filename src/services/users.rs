//! Comptes utilisateurs : authentification, inscription, administration, profil.

use tracing::{info, warn};

use crate::error::AppError;
use crate::models::{CreateUserForm, LoginForm, ProfileForm, PublicUser, RegisterForm, Role, UpdateUserForm, User};
use crate::store::{next_id, Store};
use crate::utils::hash;
use crate::utils::validation::{check_email, check_password, require_fields};

fn hash_password(password: &str) -> Result<String, AppError> {
    hash::hash_password(password).map_err(|err| AppError::Internal(format!("hachage du mot de passe : {err}")))
}

fn email_taken(users: &[User], email: &str, except: Option<i64>) -> bool {
    users
        .iter()
        .any(|user| user.email.eq_ignore_ascii_case(email) && Some(user.id) != except)
}

fn user_not_found() -> AppError {
    AppError::not_found("Utilisateur non trouvé")
}

/// Vérifie les identifiants ; un ancien mot de passe en clair est haché au passage
pub fn authenticate(store: &Store, form: &LoginForm) -> Result<PublicUser, AppError> {
    if form.email.trim().is_empty() || form.password.is_empty() {
        return Err(AppError::validation("Email et mot de passe requis"));
    }

    let _guard = store.lock();
    let mut users = store.users()?;
    let email = form.email.trim();
    let user = users
        .iter_mut()
        .find(|user| user.email.eq_ignore_ascii_case(email) && hash::verify_password(&form.password, &user.password))
        .ok_or_else(|| AppError::unauthorized("Email ou mot de passe incorrect"))?;

    let public = PublicUser::from(&*user);
    if !hash::is_hashed(&user.password) {
        user.password = hash_password(&form.password)?;
        store.save_users(&users)?;
        info!(user_id = public.id, "Mot de passe en clair remplacé par un hachage");
    }

    info!(user_id = public.id, role = %public.role, "Connexion réussie");
    Ok(public)
}

pub fn list_users(store: &Store) -> Result<Vec<PublicUser>, AppError> {
    Ok(store.users()?.iter().map(PublicUser::from).collect())
}

/// Inscription publique ; le code d'accès admin donne le rôle admin
pub fn register(store: &Store, form: RegisterForm, admin_code: Option<&str>) -> Result<PublicUser, AppError> {
    let role = match (form.access_code.as_deref().map(str::trim), admin_code) {
        (Some(code), Some(expected)) if code == expected => Role::Admin,
        (Some(code), _) if !code.is_empty() => {
            warn!(email = %form.email, "Code d'accès admin refusé");
            Role::User
        }
        _ => Role::User,
    };

    insert_user(store, form.nom, form.email, form.password, role)
}

pub fn create_user(store: &Store, form: CreateUserForm) -> Result<PublicUser, AppError> {
    insert_user(store, form.nom, form.email, form.password, form.role)
}

fn insert_user(store: &Store, nom: String, email: String, password: String, role: Role) -> Result<PublicUser, AppError> {
    require_fields(&[&nom, &email, &password], "Tous les champs sont obligatoires")?;
    check_password(&password)?;
    let email = email.trim().to_lowercase();
    check_email(&email)?;

    let _guard = store.lock();
    let mut users = store.users()?;
    if email_taken(&users, &email, None) {
        return Err(AppError::validation("Cet email est déjà utilisé"));
    }

    let user = User {
        id: next_id(users.iter().map(|user| user.id)),
        email,
        password: hash_password(&password)?,
        nom: nom.trim().to_string(),
        role,
    };
    users.push(user.clone());
    store.save_users(&users)?;

    info!(user_id = user.id, role = %user.role, "Utilisateur créé");
    Ok(PublicUser::from(&user))
}

/// Modification par un administrateur ; le mot de passe n'est changé que s'il est fourni
pub fn update_user(store: &Store, id: i64, form: UpdateUserForm) -> Result<PublicUser, AppError> {
    let role = match form.role {
        Some(role) if !form.nom.trim().is_empty() && !form.email.trim().is_empty() => role,
        _ => return Err(AppError::validation("Nom, email et rôle sont obligatoires")),
    };
    let email = form.email.trim().to_lowercase();
    check_email(&email)?;
    let password = form.password.filter(|password| !password.is_empty());
    if let Some(password) = &password {
        check_password(password)?;
    }

    let _guard = store.lock();
    let mut users = store.users()?;
    if !users.iter().any(|user| user.id == id) {
        return Err(user_not_found());
    }
    if email_taken(&users, &email, Some(id)) {
        return Err(AppError::validation("Cet email est déjà utilisé"));
    }

    let password = password.map(|password| hash_password(&password)).transpose()?;
    let user = users.iter_mut().find(|user| user.id == id).ok_or_else(user_not_found)?;
    user.nom = form.nom.trim().to_string();
    user.email = email;
    user.role = role;
    if let Some(password) = password {
        user.password = password;
    }

    let public = PublicUser::from(&*user);
    store.save_users(&users)?;

    info!(user_id = id, role = %role, "Utilisateur mis à jour");
    Ok(public)
}

pub fn delete_user(store: &Store, id: i64) -> Result<(), AppError> {
    let _guard = store.lock();
    let mut users = store.users()?;
    let before = users.len();
    users.retain(|user| user.id != id);
    if users.len() == before {
        return Err(user_not_found());
    }
    store.save_users(&users)?;

    info!(user_id = id, "Utilisateur supprimé");
    Ok(())
}

/// Profil de l'utilisateur connecté : nom et email nettoyés, mot de passe optionnel
pub fn update_profile(store: &Store, id: i64, form: ProfileForm) -> Result<PublicUser, AppError> {
    require_fields(&[&form.nom, &form.email], "Nom et email sont obligatoires")?;
    let email = form.email.trim().to_lowercase();
    check_email(&email)?;
    let password = form
        .password
        .map(|password| password.trim().to_string())
        .filter(|password| !password.is_empty());
    if let Some(password) = &password {
        check_password(password)?;
    }

    let _guard = store.lock();
    let mut users = store.users()?;
    if !users.iter().any(|user| user.id == id) {
        return Err(user_not_found());
    }
    if email_taken(&users, &email, Some(id)) {
        return Err(AppError::validation("Cet email est déjà utilisé par un autre utilisateur"));
    }

    let password = password.map(|password| hash_password(&password)).transpose()?;
    let user = users.iter_mut().find(|user| user.id == id).ok_or_else(user_not_found)?;
    user.nom = form.nom.trim().to_string();
    user.email = email;
    if let Some(password) = password {
        user.password = password;
    }

    let public = PublicUser::from(&*user);
    store.save_users(&users)?;

    info!(user_id = id, "Profil mis à jour");
    Ok(public)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        (dir, store)
    }

    fn login(email: &str, password: &str) -> LoginForm {
        LoginForm { email: email.into(), password: password.into() }
    }

    fn new_user(nom: &str, email: &str) -> CreateUserForm {
        CreateUserForm { nom: nom.into(), email: email.into(), password: "secret1".into(), role: Role::User }
    }

    #[test]
    fn created_password_is_hashed() {
        let (_dir, store) = store();
        let user = create_user(&store, new_user("Jean", "Jean@Exemple.fr")).unwrap();

        assert_eq!(user.email, "jean@exemple.fr");
        let stored = &store.users().unwrap()[0];
        assert!(hash::is_hashed(&stored.password));
        assert_eq!(authenticate(&store, &login("jean@exemple.fr", "secret1")).unwrap(), user);
    }

    #[test]
    fn legacy_plaintext_is_upgraded_on_login() {
        let (_dir, store) = store();
        store
            .save_users(&[User {
                id: 1,
                email: "admin@perse.fr".into(),
                password: "admin123".into(),
                nom: "Admin".into(),
                role: Role::Admin,
            }])
            .unwrap();

        let user = authenticate(&store, &login("admin@perse.fr", "admin123")).unwrap();
        assert_eq!(user.role, Role::Admin);
        assert!(hash::is_hashed(&store.users().unwrap()[0].password));
        assert!(authenticate(&store, &login("admin@perse.fr", "admin123")).is_ok());
    }

    #[test]
    fn bad_credentials() {
        let (_dir, store) = store();
        create_user(&store, new_user("Jean", "jean@exemple.fr")).unwrap();

        assert!(matches!(authenticate(&store, &login("jean@exemple.fr", "faux")), Err(AppError::Unauthorized(_))));
        assert!(matches!(authenticate(&store, &login("", "x")), Err(AppError::Validation(_))));
    }

    #[test]
    fn creation_rules() {
        let (_dir, store) = store();
        create_user(&store, new_user("Jean", "jean@exemple.fr")).unwrap();

        let dup = create_user(&store, new_user("Autre", "JEAN@exemple.fr")).unwrap_err();
        assert_eq!(dup.to_string(), "Cet email est déjà utilisé");

        let short = CreateUserForm { password: "123".into(), ..new_user("A", "a@b.fr") };
        assert!(matches!(create_user(&store, short), Err(AppError::Validation(_))));

        let missing = CreateUserForm { nom: "".into(), ..new_user("A", "a@b.fr") };
        assert!(matches!(create_user(&store, missing), Err(AppError::Validation(_))));
    }

    #[test]
    fn register_with_admin_code() {
        let (_dir, store) = store();
        let form = |email: &str, code: Option<&str>| RegisterForm {
            nom: "N".into(),
            email: email.into(),
            password: "secret1".into(),
            access_code: code.map(Into::into),
        };

        assert_eq!(register(&store, form("a@b.fr", Some(" CODE ")), Some("CODE")).unwrap().role, Role::Admin);
        assert_eq!(register(&store, form("c@d.fr", Some("faux")), Some("CODE")).unwrap().role, Role::User);
        assert_eq!(register(&store, form("e@f.fr", Some("CODE")), None).unwrap().role, Role::User);
    }

    #[test]
    fn admin_update_keeps_password_when_absent() {
        let (_dir, store) = store();
        let user = create_user(&store, new_user("Jean", "jean@exemple.fr")).unwrap();

        let updated = update_user(
            &store,
            user.id,
            UpdateUserForm { nom: "Jean D".into(), email: "jean@exemple.fr".into(), role: Some(Role::Admin), password: None },
        )
        .unwrap();

        assert_eq!(updated.role, Role::Admin);
        assert!(authenticate(&store, &login("jean@exemple.fr", "secret1")).is_ok());

        let missing_role = UpdateUserForm { nom: "J".into(), email: "jean@exemple.fr".into(), role: None, password: None };
        assert!(matches!(update_user(&store, user.id, missing_role), Err(AppError::Validation(_))));
    }

    #[test]
    fn profile_update_cleans_input() {
        let (_dir, store) = store();
        let user = create_user(&store, new_user("Jean", "jean@exemple.fr")).unwrap();
        create_user(&store, new_user("Paul", "paul@exemple.fr")).unwrap();

        let updated = update_profile(
            &store,
            user.id,
            ProfileForm { nom: "  Jean Dupont ".into(), email: " JD@Exemple.FR ".into(), password: Some("  nouveau1 ".into()) },
        )
        .unwrap();
        assert_eq!(updated.nom, "Jean Dupont");
        assert_eq!(updated.email, "jd@exemple.fr");
        assert!(authenticate(&store, &login("jd@exemple.fr", "nouveau1")).is_ok());

        let taken = ProfileForm { nom: "J".into(), email: "paul@exemple.fr".into(), password: None };
        assert!(matches!(update_profile(&store, user.id, taken), Err(AppError::Validation(_))));
    }

    #[test]
    fn delete_removes_user() {
        let (_dir, store) = store();
        let user = create_user(&store, new_user("Jean", "jean@exemple.fr")).unwrap();
        delete_user(&store, user.id).unwrap();
        assert!(list_users(&store).unwrap().is_empty());
        assert!(matches!(delete_user(&store, user.id), Err(AppError::NotFound(_))));
    }
}
