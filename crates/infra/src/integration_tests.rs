//! Repository contract tests, run against both backends.
//!
//! Verifies:
//! - CRUD round trips through a fresh session per operation
//! - Partial updates merge field-wise
//! - Search and paging slice the backend's ordering correctly
//! - Duplicate handling differs per backend as documented

#[cfg(test)]
mod tests {
    use catalog_core::ProductId;
    use catalog_products::{NewProduct, Product, ProductPatch};

    use crate::db::DbConfig;
    use crate::repository::{ListQuery, RepositoryError};
    use crate::store::ProductStore;

    async fn stores() -> Vec<ProductStore> {
        let sqlite = ProductStore::connect(&DbConfig::new("sqlite::memory:"))
            .await
            .expect("sqlite store");
        vec![ProductStore::in_memory(), sqlite]
    }

    fn product(name: &str, price: f64, stock: i64) -> Product {
        NewProduct {
            id: ProductId::new(),
            name: name.to_string(),
            price,
            stock,
        }
        .validate()
        .unwrap()
    }

    async fn seed(store: &ProductStore, names: &[&str]) -> Vec<Product> {
        let mut out = Vec::new();
        for name in names {
            let p = product(name, 1.0, 1);
            store.session().await.unwrap().add(&p).await.unwrap();
            out.push(p);
        }
        out
    }

    fn names(items: &[Product]) -> Vec<&str> {
        items.iter().map(|p| p.name()).collect()
    }

    #[tokio::test]
    async fn create_then_get_returns_identical_fields() {
        for store in stores().await {
            let p = product("Tea", 5.0, 1);
            store.session().await.unwrap().add(&p).await.unwrap();

            let fetched = store.session().await.unwrap().get(p.id()).await.unwrap();
            assert_eq!(fetched, Some(p), "backend {}", store.backend());
        }
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        for store in stores().await {
            let got = store.session().await.unwrap().get(ProductId::new()).await.unwrap();
            assert!(got.is_none(), "backend {}", store.backend());
        }
    }

    #[tokio::test]
    async fn partial_update_keeps_untouched_fields() {
        for store in stores().await {
            let p = product("Tea", 5.0, 1);
            let mut session = store.session().await.unwrap();
            session.add(&p).await.unwrap();

            let patch = ProductPatch { stock: Some(3), ..Default::default() };
            let updated = session.update_partial(p.id(), &patch).await.unwrap().unwrap();
            drop(session);

            assert_eq!(updated.name(), "Tea");
            assert_eq!(updated.price(), 5.0);
            assert_eq!(updated.stock(), 3);

            let fetched = store.session().await.unwrap().get(p.id()).await.unwrap();
            assert_eq!(fetched, Some(updated), "backend {}", store.backend());
        }
    }

    #[tokio::test]
    async fn update_missing_is_none() {
        for store in stores().await {
            let patch = ProductPatch { name: Some("x".into()), ..Default::default() };
            let got = store
                .session()
                .await
                .unwrap()
                .update_partial(ProductId::new(), &patch)
                .await
                .unwrap();
            assert!(got.is_none(), "backend {}", store.backend());
        }
    }

    #[tokio::test]
    async fn invalid_patch_is_rejected_and_record_unchanged() {
        for store in stores().await {
            let p = product("Tea", 5.0, 1);
            let mut session = store.session().await.unwrap();
            session.add(&p).await.unwrap();

            let patch = ProductPatch { price: Some(-1.0), ..Default::default() };
            let err = session.update_partial(p.id(), &patch).await.unwrap_err();
            assert!(matches!(err, RepositoryError::Rejected(_)), "backend {}", store.backend());

            assert_eq!(session.get(p.id()).await.unwrap(), Some(p));
        }
    }

    #[tokio::test]
    async fn delete_reports_whether_a_record_existed() {
        for store in stores().await {
            let p = product("Tea", 5.0, 1);
            let mut session = store.session().await.unwrap();
            session.add(&p).await.unwrap();

            assert!(session.delete(p.id()).await.unwrap());
            assert!(!session.delete(p.id()).await.unwrap());
            assert!(session.get(p.id()).await.unwrap().is_none(), "backend {}", store.backend());
        }
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        for store in stores().await {
            seed(&store, &["Green Tea", "Coffee", "black TEA", "Teapot"]).await;

            let found = store
                .session()
                .await
                .unwrap()
                .list(&ListQuery::new().search("tea"))
                .await
                .unwrap();

            let mut got = names(&found);
            got.sort();
            assert_eq!(got, vec!["Green Tea", "Teapot", "black TEA"], "backend {}", store.backend());
        }
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        for store in stores().await {
            seed(&store, &["50% off", "500 grams"]).await;

            let found = store
                .session()
                .await
                .unwrap()
                .list(&ListQuery::new().search("0%"))
                .await
                .unwrap();
            assert_eq!(names(&found), vec!["50% off"], "backend {}", store.backend());
        }
    }

    #[tokio::test]
    async fn in_memory_list_is_name_ordered_and_paged() {
        let store = ProductStore::in_memory();
        seed(&store, &["d", "b", "e", "a", "c"]).await;
        let mut session = store.session().await.unwrap();

        let all = session.list(&ListQuery::new()).await.unwrap();
        assert_eq!(names(&all), vec!["a", "b", "c", "d", "e"]);

        let page = session.list(&ListQuery::new().offset(1).limit(2)).await.unwrap();
        assert_eq!(names(&page), vec!["b", "c"]);

        let tail = session.list(&ListQuery::new().offset(3)).await.unwrap();
        assert_eq!(names(&tail), vec!["d", "e"]);
    }

    #[tokio::test]
    async fn sqlite_list_is_newest_first_and_paged() {
        let store = ProductStore::connect(&DbConfig::new("sqlite::memory:")).await.unwrap();
        seed(&store, &["d", "b", "e", "a", "c"]).await;
        let mut session = store.session().await.unwrap();

        let all = session.list(&ListQuery::new()).await.unwrap();
        assert_eq!(names(&all), vec!["c", "a", "e", "b", "d"]);

        let page = session.list(&ListQuery::new().offset(1).limit(2)).await.unwrap();
        assert_eq!(names(&page), vec!["a", "e"]);

        let tail = session.list(&ListQuery::new().offset(3)).await.unwrap();
        assert_eq!(names(&tail), vec!["b", "d"]);

        let none = session.list(&ListQuery::new().offset(10)).await.unwrap();
        assert!(none.is_empty());

        let beyond_i64 = session.list(&ListQuery::new().offset(u64::MAX).limit(5)).await.unwrap();
        assert!(beyond_i64.is_empty());
    }

    #[tokio::test]
    async fn sqlite_reports_duplicate_insert() {
        let store = ProductStore::connect(&DbConfig::new("sqlite::memory:")).await.unwrap();
        let p = product("Tea", 5.0, 1);
        let mut session = store.session().await.unwrap();
        session.add(&p).await.unwrap();

        let err = session.add(&p).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Duplicate(id) if id == p.id()));

        // The failed insert rolled back; the original row is untouched.
        assert_eq!(session.get(p.id()).await.unwrap(), Some(p));
    }
}
