//! Stockage des collections sous forme de tableaux JSON, un fichier par entité.
//!
//! Chaque écriture remplace le fichier entier via un fichier temporaire
//! renommé. Les séquences lecture-modification-écriture doivent être faites
//! sous [`Store::lock`].

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::models::{Article, Cart, Order, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Erreur d'E/S sur {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON invalide dans {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Les collections persistées
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    Articles,
    Orders,
    Carts,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Users,
        Collection::Articles,
        Collection::Orders,
        Collection::Carts,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Collection::Users => "users.json",
            Collection::Articles => "articles.json",
            Collection::Orders => "orders.json",
            Collection::Carts => "carts.json",
        }
    }
}

pub struct Store {
    data_dir: PathBuf,
    lock: Mutex<()>,
}

impl Store {
    /// Ouvre le répertoire de données et crée les fichiers manquants (`[]`)
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(|source| StoreError::Io {
            path: data_dir.clone(),
            source,
        })?;

        let store = Self { data_dir, lock: Mutex::new(()) };
        for collection in Collection::ALL {
            let path = store.path(collection);
            if !path.exists() {
                info!(path = %path.display(), "Création d'une collection vide");
                write_atomic(&path, b"[]")?;
            }
        }
        Ok(store)
    }

    pub fn path(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }

    /// Verrou exclusif sur l'ensemble des collections
    pub fn lock(&self) -> MutexGuard<'_, ()> {
        // Un panic pendant une écriture n'a pas pu laisser de fichier partiel
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Lit toute une collection ; un fichier absent vaut un tableau vide
    pub fn read<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>, StoreError> {
        let path = self.path(collection);
        let content = match fs::read(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_json::from_slice(&content).map_err(|source| StoreError::Json { path, source })
    }

    /// Réécrit toute une collection
    pub fn write<T: Serialize>(&self, collection: Collection, items: &[T]) -> Result<(), StoreError> {
        let path = self.path(collection);
        let content = serde_json::to_vec_pretty(items).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        write_atomic(&path, &content)?;
        debug!(file = collection.file_name(), count = items.len(), "Collection sauvegardée");
        Ok(())
    }

    pub fn users(&self) -> Result<Vec<User>, StoreError> {
        self.read(Collection::Users)
    }

    pub fn save_users(&self, users: &[User]) -> Result<(), StoreError> {
        self.write(Collection::Users, users)
    }

    pub fn articles(&self) -> Result<Vec<Article>, StoreError> {
        self.read(Collection::Articles)
    }

    pub fn save_articles(&self, articles: &[Article]) -> Result<(), StoreError> {
        self.write(Collection::Articles, articles)
    }

    pub fn orders(&self) -> Result<Vec<Order>, StoreError> {
        self.read(Collection::Orders)
    }

    pub fn save_orders(&self, orders: &[Order]) -> Result<(), StoreError> {
        self.write(Collection::Orders, orders)
    }

    pub fn carts(&self) -> Result<Vec<Cart>, StoreError> {
        self.read(Collection::Carts)
    }

    pub fn save_carts(&self, carts: &[Cart]) -> Result<(), StoreError> {
        self.write(Collection::Carts, carts)
    }
}

fn write_atomic(path: &Path, content: &[u8]) -> Result<(), StoreError> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content)
        .and_then(|_| fs::rename(&tmp, path))
        .map_err(|source| StoreError::Io { path: path.to_path_buf(), source })
}

/// Prochain identifiant entier : max + 1, ou 1 si la collection est vide
pub fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().map_or(1, |max| max + 1)
}
