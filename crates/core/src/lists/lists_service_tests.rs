//! Tests for ListService operations.
//!
//! # Contract Points
//!
//! 1. Every mutation persists the whole collection and stamps `updated_at`
//! 2. Adding a symbol, or setting a position, makes that list the default
//! 3. Reordering at the edges is a no-op
//! 4. Moving between lists keeps position data only portfolio-to-portfolio

#[cfg(test)]
mod tests {
    use crate::errors::{Error, Result, ValidationError};
    use crate::lists::{
        ListItem, ListRepositoryTrait, ListService, ListServiceTrait, ListUpdate, NewStockList,
        StockList, UserSettings,
    };
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use stockwatch_market_data::ManualClock;

    // =========================================================================
    // Mock ListRepository
    // =========================================================================

    #[derive(Clone, Default)]
    struct MockListRepository {
        lists: Arc<Mutex<Option<Vec<StockList>>>>,
        settings: Arc<Mutex<UserSettings>>,
        save_count: Arc<Mutex<usize>>,
        fail_on_save: Arc<Mutex<bool>>,
    }

    impl MockListRepository {
        fn new() -> Self {
            Self::default()
        }

        fn with_lists(lists: Vec<StockList>) -> Self {
            let repo = Self::default();
            *repo.lists.lock().unwrap() = Some(lists);
            repo
        }

        fn set_fail_on_save(&self, fail: bool) {
            *self.fail_on_save.lock().unwrap() = fail;
        }

        fn stored(&self) -> Vec<StockList> {
            self.lists.lock().unwrap().clone().unwrap_or_default()
        }

        fn stored_settings(&self) -> UserSettings {
            self.settings.lock().unwrap().clone()
        }

        fn save_count(&self) -> usize {
            *self.save_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl ListRepositoryTrait for MockListRepository {
        async fn load_lists(&self) -> Result<Vec<StockList>> {
            Ok(self.stored())
        }

        async fn save_lists(&self, lists: &[StockList]) -> Result<()> {
            if *self.fail_on_save.lock().unwrap() {
                return Err(Error::Unexpected("Intentional save failure".into()));
            }
            *self.lists.lock().unwrap() = Some(lists.to_vec());
            *self.save_count.lock().unwrap() += 1;
            Ok(())
        }

        async fn load_settings(&self) -> Result<UserSettings> {
            Ok(self.stored_settings())
        }

        async fn save_settings(&self, settings: &UserSettings) -> Result<()> {
            *self.settings.lock().unwrap() = settings.clone();
            Ok(())
        }

        async fn lists_exist(&self) -> Result<bool> {
            Ok(self.lists.lock().unwrap().is_some())
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    const T0: i64 = 1_700_000_000_000;

    fn list(id: &str, name: &str, symbols: &[&str], is_portfolio: bool) -> StockList {
        StockList {
            id: id.to_string(),
            name: name.to_string(),
            icon: "📈".to_string(),
            symbols: symbols.iter().map(|s| ListItem::new(*s)).collect(),
            is_portfolio,
            created_at: 1,
            updated_at: 1,
        }
    }

    fn build_service(repo: &MockListRepository) -> (ListService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(T0));
        let service = ListService::with_clock(Arc::new(repo.clone()), clock.clone());
        (service, clock)
    }

    fn symbols_of(list: &StockList) -> Vec<&str> {
        list.symbols.iter().map(|i| i.symbol.as_str()).collect()
    }

    fn assert_invalid_input(err: Error, expected: &str) {
        match err {
            Error::Validation(ValidationError::InvalidInput(msg)) => assert_eq!(msg, expected),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    // =========================================================================
    // List CRUD
    // =========================================================================

    #[tokio::test]
    async fn test_create_list_trims_name_and_stamps_times() {
        let repo = MockListRepository::new();
        let (service, _) = build_service(&repo);

        let created = service
            .create_list(NewStockList {
                name: "  Tech  ".to_string(),
                icon: "💼".to_string(),
                is_portfolio: true,
            })
            .await
            .unwrap();

        assert_eq!(created.name, "Tech");
        assert!(created.symbols.is_empty());
        assert!(created.is_portfolio);
        assert_eq!(created.created_at, T0);
        assert_eq!(created.updated_at, T0);
        assert_eq!(created.id.len(), 36);
        assert_eq!(repo.stored(), vec![created]);
    }

    #[tokio::test]
    async fn test_create_list_requires_name() {
        let repo = MockListRepository::new();
        let (service, _) = build_service(&repo);

        let err = service
            .create_list(NewStockList {
                name: "   ".to_string(),
                icon: "💼".to_string(),
                is_portfolio: false,
            })
            .await
            .unwrap_err();

        assert_invalid_input(err, "Name is required");
        assert_eq!(repo.save_count(), 0);
    }

    #[tokio::test]
    async fn test_update_list() {
        let repo = MockListRepository::with_lists(vec![list("a", "Old", &["AAPL"], false)]);
        let (service, _) = build_service(&repo);

        let updated = service
            .update_list(
                "a",
                ListUpdate {
                    name: "New".to_string(),
                    icon: "🪙".to_string(),
                    is_portfolio: true,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "New");
        assert_eq!(updated.icon, "🪙");
        assert!(updated.is_portfolio);
        assert_eq!(updated.updated_at, T0);
        assert_eq!(updated.created_at, 1);
        assert_eq!(symbols_of(&updated), vec!["AAPL"]);
    }

    #[tokio::test]
    async fn test_update_missing_list() {
        let repo = MockListRepository::new();
        let (service, _) = build_service(&repo);

        let err = service
            .update_list(
                "missing",
                ListUpdate {
                    name: "X".to_string(),
                    icon: "📈".to_string(),
                    is_portfolio: false,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ListNotFound(id) if id == "missing"));
    }

    #[tokio::test]
    async fn test_delete_list() {
        let repo = MockListRepository::with_lists(vec![
            list("a", "A", &[], false),
            list("b", "B", &[], false),
        ]);
        let (service, _) = build_service(&repo);

        let remaining = service.delete_list("a").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(repo.stored()[0].id, "b");

        assert!(matches!(
            service.delete_list("a").await,
            Err(Error::ListNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_list() {
        let mut source = list("a", "Tech", &["AAPL", "MSFT"], true);
        source.symbols[0] = ListItem::with_position("AAPL", 5.0, 500.0);
        let repo = MockListRepository::with_lists(vec![source]);
        let (service, _) = build_service(&repo);

        let copy = service.duplicate_list("a").await.unwrap();

        assert_ne!(copy.id, "a");
        assert_eq!(copy.name, "Tech (Copy)");
        assert!(copy.is_portfolio);
        assert_eq!(copy.created_at, T0);
        assert_eq!(copy.symbols[0].units, Some(5.0));
        assert_eq!(repo.stored().len(), 2);
        assert_eq!(repo.stored()[1], copy);
    }

    #[tokio::test]
    async fn test_move_list_up_and_down() {
        let repo = MockListRepository::with_lists(vec![
            list("a", "A", &[], false),
            list("b", "B", &[], false),
            list("c", "C", &[], false),
        ]);
        let (service, _) = build_service(&repo);

        let lists = service.move_list_up(2).await.unwrap();
        let ids: Vec<_> = lists.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);

        let lists = service.move_list_down(0).await.unwrap();
        let ids: Vec<_> = lists.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_move_list_at_edges_is_noop() {
        let repo = MockListRepository::with_lists(vec![
            list("a", "A", &[], false),
            list("b", "B", &[], false),
        ]);
        let (service, _) = build_service(&repo);

        service.move_list_up(0).await.unwrap();
        service.move_list_down(1).await.unwrap();
        service.move_list_down(7).await.unwrap();

        assert_eq!(repo.save_count(), 0);
        assert_eq!(repo.stored()[0].id, "a");
    }

    // =========================================================================
    // Symbols
    // =========================================================================

    #[tokio::test]
    async fn test_add_symbol_sets_default_list() {
        let repo = MockListRepository::with_lists(vec![
            list("a", "A", &[], false),
            list("b", "B", &["MSFT"], false),
        ]);
        let (service, _) = build_service(&repo);

        let updated = service.add_symbol("b", "AAPL").await.unwrap();

        assert_eq!(symbols_of(&updated), vec!["MSFT", "AAPL"]);
        assert_eq!(updated.updated_at, T0);
        assert_eq!(repo.stored_settings().default_list_id.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_add_duplicate_symbol_fails() {
        let repo = MockListRepository::with_lists(vec![list("a", "Tech", &["AAPL"], false)]);
        let (service, _) = build_service(&repo);

        let err = service.add_symbol("a", "AAPL").await.unwrap_err();

        assert_eq!(err.to_string(), "AAPL is already in \"Tech\"");
        assert_eq!(repo.save_count(), 0);
        assert_eq!(repo.stored_settings().default_list_id, None);
    }

    #[tokio::test]
    async fn test_set_position_inserts_and_updates() {
        let repo = MockListRepository::with_lists(vec![list("p", "Port", &["AAPL"], true)]);
        let (service, _) = build_service(&repo);

        let updated = service.set_position("p", "AAPL", 10.0, 1500.0).await.unwrap();
        assert_eq!(updated.symbols.len(), 1);
        assert_eq!(updated.symbols[0].units, Some(10.0));
        assert_eq!(updated.symbols[0].cost_basis, Some(1500.0));

        let updated = service.set_position("p", "NVDA", 2.0, 800.0).await.unwrap();
        assert_eq!(symbols_of(&updated), vec!["AAPL", "NVDA"]);
        assert_eq!(repo.stored_settings().default_list_id.as_deref(), Some("p"));
    }

    #[tokio::test]
    async fn test_set_position_rejects_non_positive_values() {
        let repo = MockListRepository::with_lists(vec![list("p", "Port", &[], true)]);
        let (service, _) = build_service(&repo);

        let err = service.set_position("p", "AAPL", 0.0, 10.0).await.unwrap_err();
        assert_invalid_input(err, "Units must be a positive number");

        let err = service
            .set_position("p", "AAPL", 1.0, f64::NAN)
            .await
            .unwrap_err();
        assert_invalid_input(err, "Cost basis must be a positive number");

        assert_eq!(repo.save_count(), 0);
    }

    #[tokio::test]
    async fn test_update_position_zero_units_clears_both() {
        let mut p = list("p", "Port", &[], true);
        p.symbols.push(ListItem::with_position("AAPL", 10.0, 1500.0));
        let repo = MockListRepository::with_lists(vec![p]);
        let (service, _) = build_service(&repo);

        let updated = service
            .update_position("p", 0, Some(0.0), Some(1500.0))
            .await
            .unwrap();

        assert_eq!(updated.symbols[0], ListItem::new("AAPL"));
    }

    #[tokio::test]
    async fn test_update_position_keeps_units_without_cost() {
        let repo = MockListRepository::with_lists(vec![list("p", "Port", &["AAPL"], true)]);
        let (service, _) = build_service(&repo);

        let updated = service
            .update_position("p", 0, Some(3.0), None)
            .await
            .unwrap();

        assert_eq!(updated.symbols[0].units, Some(3.0));
        assert_eq!(updated.symbols[0].cost_basis, None);
    }

    #[tokio::test]
    async fn test_update_position_rejects_negative() {
        let repo = MockListRepository::with_lists(vec![list("p", "Port", &["AAPL"], true)]);
        let (service, _) = build_service(&repo);

        let err = service
            .update_position("p", 0, Some(-1.0), None)
            .await
            .unwrap_err();
        assert_invalid_input(err, "Units must be a positive number");

        let err = service
            .update_position("p", 5, Some(1.0), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::IndexOutOfRange { index: 5, len: 1 })
        ));
    }

    #[tokio::test]
    async fn test_remove_symbol() {
        let repo = MockListRepository::with_lists(vec![list("a", "A", &["AAPL", "MSFT"], false)]);
        let (service, clock) = build_service(&repo);
        clock.advance(5);

        let updated = service.remove_symbol("a", 0).await.unwrap();

        assert_eq!(symbols_of(&updated), vec!["MSFT"]);
        assert_eq!(updated.updated_at, T0 + 5);
    }

    #[tokio::test]
    async fn test_move_symbol_within_list() {
        let repo =
            MockListRepository::with_lists(vec![list("a", "A", &["AAPL", "MSFT", "NVDA"], false)]);
        let (service, _) = build_service(&repo);

        let updated = service.move_symbol_up("a", 2).await.unwrap();
        assert_eq!(symbols_of(&updated), vec!["AAPL", "NVDA", "MSFT"]);

        let updated = service.move_symbol_down("a", 0).await.unwrap();
        assert_eq!(symbols_of(&updated), vec!["NVDA", "AAPL", "MSFT"]);

        let saves = repo.save_count();
        service.move_symbol_up("a", 0).await.unwrap();
        service.move_symbol_down("a", 2).await.unwrap();
        assert_eq!(repo.save_count(), saves);
    }

    #[tokio::test]
    async fn test_move_symbol_between_portfolios_keeps_position() {
        let mut source = list("p1", "P1", &[], true);
        source.symbols.push(ListItem::with_position("AAPL", 10.0, 1500.0));
        let target = list("p2", "P2", &["MSFT"], true);
        let repo = MockListRepository::with_lists(vec![source, target]);
        let (service, _) = build_service(&repo);

        let lists = service.move_symbol_to_list("p1", 0, "p2").await.unwrap();

        assert!(lists[0].symbols.is_empty());
        assert_eq!(symbols_of(&lists[1]), vec!["MSFT", "AAPL"]);
        assert_eq!(lists[1].symbols[1].units, Some(10.0));
        assert_eq!(lists[0].updated_at, T0);
        assert_eq!(lists[1].updated_at, T0);
    }

    #[tokio::test]
    async fn test_move_symbol_to_watchlist_drops_position() {
        let mut source = list("p1", "P1", &[], true);
        source.symbols.push(ListItem::with_position("AAPL", 10.0, 1500.0));
        let target = list("w", "Watch", &[], false);
        let repo = MockListRepository::with_lists(vec![source, target]);
        let (service, _) = build_service(&repo);

        let lists = service.move_symbol_to_list("p1", 0, "w").await.unwrap();

        assert_eq!(lists[1].symbols[0], ListItem::new("AAPL"));
    }

    #[tokio::test]
    async fn test_move_symbol_to_same_list_is_noop() {
        let repo = MockListRepository::with_lists(vec![list("a", "A", &["AAPL"], false)]);
        let (service, _) = build_service(&repo);

        service.move_symbol_to_list("a", 0, "a").await.unwrap();
        assert_eq!(repo.save_count(), 0);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    #[tokio::test]
    async fn test_default_list_resolution() {
        let repo = MockListRepository::new();
        let (service, _) = build_service(&repo);
        assert!(service.default_list().await.unwrap().is_none());

        let repo = MockListRepository::with_lists(vec![
            list("a", "A", &[], false),
            list("b", "B", &[], false),
        ]);
        let (service, _) = build_service(&repo);
        assert_eq!(service.default_list().await.unwrap().unwrap().id, "a");

        repo.save_settings(&UserSettings {
            default_list_id: Some("b".to_string()),
        })
        .await
        .unwrap();
        assert_eq!(service.default_list().await.unwrap().unwrap().id, "b");

        repo.save_settings(&UserSettings {
            default_list_id: Some("deleted".to_string()),
        })
        .await
        .unwrap();
        assert_eq!(service.default_list().await.unwrap().unwrap().id, "a");
    }

    #[tokio::test]
    async fn test_all_symbols_deduplicates_in_order() {
        let repo = MockListRepository::with_lists(vec![
            list("a", "A", &["AAPL", "MSFT"], false),
            list("b", "B", &["NVDA", "AAPL"], true),
        ]);
        let (service, _) = build_service(&repo);

        assert_eq!(
            service.all_symbols().await.unwrap(),
            vec!["AAPL", "MSFT", "NVDA"]
        );
    }

    #[tokio::test]
    async fn test_find_list_by_id_or_name() {
        let repo = MockListRepository::with_lists(vec![list("a1", "Tech", &[], false)]);
        let (service, _) = build_service(&repo);

        assert!(service.find_list("a1").await.unwrap().is_some());
        assert!(service.find_list("tech").await.unwrap().is_some());
        assert!(service.find_list("crypto").await.unwrap().is_none());

        let found = service.find_item("a1", "aapl").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_save_failure_propagates() {
        let repo = MockListRepository::with_lists(vec![list("a", "A", &[], false)]);
        repo.set_fail_on_save(true);
        let (service, _) = build_service(&repo);

        assert!(matches!(
            service.add_symbol("a", "AAPL").await,
            Err(Error::Unexpected(_))
        ));
        assert_eq!(repo.stored_settings().default_list_id, None);
    }
}
