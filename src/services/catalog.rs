//! Catalogue des articles.

use std::collections::BTreeSet;

use tracing::info;

use crate::error::AppError;
use crate::models::{Article, ArticleForm, ArticleSort, ArticleUpdate};
use crate::store::{next_id, Store};
use crate::utils::validation::require_fields;

/// Filtre par type puis trie
pub fn list_articles(
    store: &Store,
    kind: Option<&str>,
    sort: Option<ArticleSort>,
) -> Result<Vec<Article>, AppError> {
    let mut articles = store.articles()?;

    if let Some(kind) = kind.filter(|kind| !kind.is_empty() && *kind != "all") {
        articles.retain(|article| article.kind == kind);
    }

    // Sans paramètre `sort`, l'ordre du fichier est conservé
    if let Some(sort) = sort {
        sort_articles(&mut articles, sort);
    }
    Ok(articles)
}

pub fn sort_articles(articles: &mut [Article], sort: ArticleSort) {
    match sort {
        ArticleSort::NameAsc => articles.sort_by_key(|a| a.nom.to_lowercase()),
        ArticleSort::NameDesc => articles.sort_by(|a, b| b.nom.to_lowercase().cmp(&a.nom.to_lowercase())),
        ArticleSort::StockAsc => articles.sort_by_key(|a| a.stock),
        ArticleSort::StockDesc => articles.sort_by(|a, b| b.stock.cmp(&a.stock)),
        ArticleSort::PriceAsc => articles.sort_by(|a, b| a.prix.total_cmp(&b.prix)),
        ArticleSort::PriceDesc => articles.sort_by(|a, b| b.prix.total_cmp(&a.prix)),
    }
}

/// Types distincts, triés
pub fn article_types(store: &Store) -> Result<Vec<String>, AppError> {
    let types: BTreeSet<String> = store.articles()?.into_iter().map(|article| article.kind).collect();
    Ok(types.into_iter().collect())
}

pub fn get_article(store: &Store, id: i64) -> Result<Article, AppError> {
    store
        .articles()?
        .into_iter()
        .find(|article| article.id == id)
        .ok_or_else(article_not_found)
}

pub fn create_article(store: &Store, form: ArticleForm) -> Result<Article, AppError> {
    require_fields(
        &[&form.nom, &form.kind, &form.description_courte, &form.description_longue],
        "Tous les champs sont obligatoires",
    )?;
    check_stock_and_price(Some(form.stock), Some(form.prix))?;

    let _guard = store.lock();
    let mut articles = store.articles()?;
    let nom = form.nom.trim().to_string();
    if articles.iter().any(|article| article.nom == nom) {
        return Err(duplicate_name());
    }

    let article = Article {
        id: next_id(articles.iter().map(|article| article.id)),
        nom,
        kind: form.kind.trim().to_string(),
        description_courte: form.description_courte,
        description_longue: form.description_longue,
        image: form.image,
        stock: form.stock,
        prix: form.prix,
    };
    articles.push(article.clone());
    store.save_articles(&articles)?;

    info!(article_id = article.id, nom = %article.nom, "Article créé");
    Ok(article)
}

/// Mise à jour partielle ; le stock fourni est une valeur absolue
pub fn update_article(store: &Store, id: i64, update: ArticleUpdate) -> Result<Article, AppError> {
    check_stock_and_price(update.stock, update.prix)?;

    let _guard = store.lock();
    let mut articles = store.articles()?;
    let index = articles
        .iter()
        .position(|article| article.id == id)
        .ok_or_else(article_not_found)?;

    let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    let nom = non_empty(update.nom).map(|nom| nom.trim().to_string());
    if let Some(nom) = &nom {
        if articles.iter().any(|article| &article.nom == nom && article.id != id) {
            return Err(duplicate_name());
        }
    }

    let article = &mut articles[index];
    if let Some(nom) = nom {
        article.nom = nom;
    }
    if let Some(kind) = non_empty(update.kind) {
        article.kind = kind;
    }
    if let Some(description) = non_empty(update.description_courte) {
        article.description_courte = description;
    }
    if let Some(description) = non_empty(update.description_longue) {
        article.description_longue = description;
    }
    if let Some(image) = non_empty(update.image) {
        article.image = image;
    }
    if let Some(stock) = update.stock {
        article.stock = stock;
    }
    if let Some(prix) = update.prix {
        article.prix = prix;
    }

    let updated = article.clone();
    store.save_articles(&articles)?;

    info!(article_id = id, stock = updated.stock, "Article mis à jour");
    Ok(updated)
}

pub fn delete_article(store: &Store, id: i64) -> Result<(), AppError> {
    let _guard = store.lock();
    let mut articles = store.articles()?;
    let before = articles.len();
    articles.retain(|article| article.id != id);
    if articles.len() == before {
        return Err(article_not_found());
    }
    store.save_articles(&articles)?;

    info!(article_id = id, "Article supprimé");
    Ok(())
}

fn check_stock_and_price(stock: Option<i64>, prix: Option<f64>) -> Result<(), AppError> {
    if stock.is_some_and(|stock| stock < 0) {
        return Err(AppError::validation("Le stock ne peut pas être négatif"));
    }
    if prix.is_some_and(|prix| prix < 0.0 || !prix.is_finite()) {
        return Err(AppError::validation("Le prix ne peut pas être négatif"));
    }
    Ok(())
}

fn article_not_found() -> AppError {
    AppError::not_found("Article non trouvé")
}

fn duplicate_name() -> AppError {
    AppError::validation("Un article avec ce nom existe déjà")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(nom: &str, kind: &str, stock: i64, prix: f64) -> ArticleForm {
        ArticleForm {
            nom: nom.into(),
            kind: kind.into(),
            description_courte: "courte".into(),
            description_longue: "longue".into(),
            image: String::new(),
            stock,
            prix,
        }
    }

    fn store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn create_assigns_sequential_ids_and_checks_names() {
        let (_dir, store) = store();
        assert_eq!(create_article(&store, form("Casque", "Protection", 3, 10.0)).unwrap().id, 1);
        assert_eq!(create_article(&store, form("Gants", "Protection", 3, 10.0)).unwrap().id, 2);

        let err = create_article(&store, form("Casque", "Autre", 1, 1.0)).unwrap_err();
        assert_eq!(err.to_string(), "Un article avec ce nom existe déjà");
    }

    #[test]
    fn create_validates_fields() {
        let (_dir, store) = store();
        assert!(matches!(create_article(&store, form("", "T", 1, 1.0)), Err(AppError::Validation(_))));
        assert!(matches!(create_article(&store, form("A", "T", -1, 1.0)), Err(AppError::Validation(_))));
        assert!(matches!(create_article(&store, form("A", "T", 1, -0.5)), Err(AppError::Validation(_))));
    }

    #[test]
    fn partial_update_keeps_blank_fields() {
        let (_dir, store) = store();
        let created = create_article(&store, form("Casque", "Protection", 3, 10.0)).unwrap();

        let updated = update_article(
            &store,
            created.id,
            ArticleUpdate { nom: Some(" ".into()), stock: Some(12), ..Default::default() },
        )
        .unwrap();

        assert_eq!(updated.nom, "Casque");
        assert_eq!(updated.stock, 12);
        assert_eq!(updated.prix, 10.0);
        assert_eq!(get_article(&store, created.id).unwrap(), updated);
    }

    #[test]
    fn update_rejects_name_of_another_article() {
        let (_dir, store) = store();
        create_article(&store, form("Casque", "Protection", 3, 10.0)).unwrap();
        let gants = create_article(&store, form("Gants", "Protection", 3, 10.0)).unwrap();

        let err = update_article(&store, gants.id, ArticleUpdate { nom: Some("Casque".into()), ..Default::default() });
        assert!(matches!(err, Err(AppError::Validation(_))));
        assert!(matches!(update_article(&store, 77, ArticleUpdate::default()), Err(AppError::NotFound(_))));
    }

    #[test]
    fn filter_sort_and_types() {
        let (_dir, store) = store();
        create_article(&store, form("b-Sac", "Bagagerie", 5, 30.0)).unwrap();
        create_article(&store, form("A-Casque", "Protection", 1, 50.0)).unwrap();
        create_article(&store, form("c-Gants", "Protection", 9, 10.0)).unwrap();

        let names = |articles: Vec<Article>| articles.into_iter().map(|a| a.nom).collect::<Vec<_>>();

        assert_eq!(
            names(list_articles(&store, None, Some(ArticleSort::NameAsc)).unwrap()),
            vec!["A-Casque", "b-Sac", "c-Gants"]
        );
        assert_eq!(
            names(list_articles(&store, Some("Protection"), Some(ArticleSort::PriceAsc)).unwrap()),
            vec!["c-Gants", "A-Casque"]
        );
        assert_eq!(
            names(list_articles(&store, Some("all"), Some(ArticleSort::StockDesc)).unwrap()),
            vec!["c-Gants", "b-Sac", "A-Casque"]
        );
        assert_eq!(article_types(&store).unwrap(), vec!["Bagagerie", "Protection"]);
    }

    #[test]
    fn delete_unknown_article() {
        let (_dir, store) = store();
        let created = create_article(&store, form("Casque", "Protection", 3, 10.0)).unwrap();
        delete_article(&store, created.id).unwrap();
        assert!(matches!(delete_article(&store, created.id), Err(AppError::NotFound(_))));
    }
}
