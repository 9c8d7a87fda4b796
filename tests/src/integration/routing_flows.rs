//! # Routing Flow Tests
//!
//! End-to-end flows: build a registry from a JSON configuration document,
//! route writes and reads through the public API, and check the routing
//! properties hold across the whole stack.

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use shard_router::{
        invariant_range_is_union_of_points, invariant_targets_within_nodes, ColumnValue,
        Predicate, Router, RoutingApi, RoutingError, Row, ShardingRuleRegistry,
        ShardingRuleConfig, Statement, StaticDataSourceCatalog,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// A two-table configuration: monthly time buckets plus hash-mod.
    fn config_document() -> ShardingRuleConfig {
        serde_json::from_str(
            r#"{
                "tables": [
                    {
                        "logical_table": "orders",
                        "actual_data_nodes": "ds_orders_0.orders_$->{2023..2023}_$->{01..12}",
                        "sharding_column": "created_at",
                        "sharding_algorithm": "monthly-2023",
                        "key_column": "order_id",
                        "key_generator": "snowflake-a"
                    },
                    {
                        "logical_table": "user_profile",
                        "actual_data_nodes": "ds_users_0.user_profile_$->{0..3}",
                        "sharding_column": "user_id",
                        "sharding_algorithm": "hash-4",
                        "key_column": "profile_id",
                        "key_generator": "snowflake-a"
                    }
                ],
                "sharding_algorithms": [
                    {"name": "monthly-2023", "kind": "time_bucket_monthly", "min_year": 2023, "max_year": 2023},
                    {"name": "hash-4", "kind": "hash_mod", "shard_count": 4}
                ],
                "key_generators": [
                    {"name": "snowflake-a", "kind": "snowflake", "worker_id": 1, "datacenter_id": 1}
                ]
            }"#,
        )
        .expect("well-formed configuration document")
    }

    fn build_router() -> Router {
        crate::integration::init_tracing();
        let catalog = StaticDataSourceCatalog::new(["ds_orders_0", "ds_users_0"]);
        let registry =
            ShardingRuleRegistry::from_config_with_catalog(&config_document(), &catalog)
                .expect("valid configuration");
        Router::new(registry)
    }

    fn ts(year: i32, month: u32, day: u32) -> ColumnValue {
        ColumnValue::Timestamp(Utc.with_ymd_and_hms(year, month, day, 8, 30, 0).unwrap())
    }

    // =============================================================================
    // WRITE PATH
    // =============================================================================

    #[test]
    fn test_write_routes_to_month_table_and_fills_key() {
        let router = build_router();
        let mut row = Row::new();
        row.insert("created_at".to_string(), ts(2023, 6, 15));
        row.insert("amount".to_string(), ColumnValue::Integer(1250));

        let plan = router
            .route("orders", Statement::Write { row })
            .expect("routable write");

        assert_eq!(plan.targets.len(), 1);
        assert_eq!(plan.targets[0].data_source, "ds_orders_0");
        assert_eq!(plan.targets[0].table, "orders_2023_06");

        let finalized = plan.row.expect("write plans carry the finalized row");
        assert!(matches!(
            finalized.get("order_id"),
            Some(ColumnValue::Integer(id)) if *id > 0
        ));
        // Caller-supplied columns survive untouched.
        assert_eq!(finalized.get("amount"), Some(&ColumnValue::Integer(1250)));
    }

    #[test]
    fn test_two_writes_same_month_same_target_distinct_keys() {
        let router = build_router();
        let mut ids = Vec::new();
        let mut tables = Vec::new();
        for day in [1, 28] {
            let mut row = Row::new();
            row.insert("created_at".to_string(), ts(2023, 4, day));
            let plan = router.route("orders", Statement::Write { row }).unwrap();
            tables.push(plan.targets[0].table.clone());
            let row = plan.row.unwrap();
            let Some(ColumnValue::Integer(id)) = row.get("order_id").cloned() else {
                panic!("key not generated");
            };
            ids.push(id);
        }
        assert_eq!(tables[0], tables[1]);
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_write_outside_supported_years_is_unroutable() {
        let router = build_router();
        let mut row = Row::new();
        row.insert("created_at".to_string(), ts(2101, 1, 1));
        let err = router
            .route("orders", Statement::Write { row })
            .unwrap_err();
        assert!(matches!(err, RoutingError::UnroutableValue(_)));
    }

    // =============================================================================
    // READ PATH
    // =============================================================================

    #[test]
    fn test_read_equality_hits_single_month() {
        let router = build_router();
        let plan = router
            .route(
                "orders",
                Statement::Read {
                    predicate: Some(Predicate::Equals(ts(2023, 11, 5))),
                },
            )
            .unwrap();
        assert_eq!(plan.targets.len(), 1);
        assert_eq!(plan.targets[0].table, "orders_2023_11");
    }

    #[test]
    fn test_read_range_hits_exactly_touched_months() {
        let router = build_router();
        let plan = router
            .route(
                "orders",
                Statement::Read {
                    predicate: Some(Predicate::Between {
                        start: ts(2023, 3, 1),
                        end: ts(2023, 5, 1),
                    }),
                },
            )
            .unwrap();
        let tables: Vec<&str> = plan.targets.iter().map(|n| n.table.as_str()).collect();
        assert_eq!(
            tables,
            vec!["orders_2023_03", "orders_2023_04", "orders_2023_05"]
        );
    }

    #[test]
    fn test_read_without_predicate_fans_out_to_node_set() {
        let router = build_router();
        let plan = router
            .route("orders", Statement::Read { predicate: None })
            .unwrap();
        assert_eq!(plan.targets.len(), 12);

        let registry = router.registry();
        let declared = registry.resolve("orders").unwrap().data_nodes();
        assert!(invariant_targets_within_nodes(&plan.targets, declared));
    }

    #[test]
    fn test_read_range_on_hashed_column_scans_every_shard() {
        let router = build_router();
        let plan = router
            .route(
                "user_profile",
                Statement::Read {
                    predicate: Some(Predicate::Between {
                        start: ColumnValue::Integer(100),
                        end: ColumnValue::Integer(200),
                    }),
                },
            )
            .unwrap();
        assert_eq!(plan.targets.len(), 4);
    }

    #[test]
    fn test_hashed_write_read_agree_on_target() {
        let router = build_router();
        let user = ColumnValue::Integer(987_654);

        let mut row = Row::new();
        row.insert("user_id".to_string(), user.clone());
        let write = router
            .route("user_profile", Statement::Write { row })
            .unwrap();

        let read = router
            .route(
                "user_profile",
                Statement::Read {
                    predicate: Some(Predicate::Equals(user)),
                },
            )
            .unwrap();
        assert_eq!(write.targets, read.targets);
    }

    // =============================================================================
    // PROPERTIES ACROSS THE STACK
    // =============================================================================

    #[test]
    fn test_range_routing_equals_union_of_point_routings() {
        let router = build_router();
        let ranged = router
            .route(
                "orders",
                Statement::Read {
                    predicate: Some(Predicate::Between {
                        start: ts(2023, 2, 10),
                        end: ts(2023, 8, 20),
                    }),
                },
            )
            .unwrap();

        let mut pointwise = Vec::new();
        for month in 2..=8 {
            let plan = router
                .route(
                    "orders",
                    Statement::Read {
                        predicate: Some(Predicate::Equals(ts(2023, month, 15))),
                    },
                )
                .unwrap();
            pointwise.extend(plan.targets);
        }

        let range_keys: Vec<u64> = ranged
            .targets
            .iter()
            .map(|n| n.bucket_key("orders").unwrap())
            .collect();
        let point_keys: Vec<u64> = pointwise
            .iter()
            .map(|n| n.bucket_key("orders").unwrap())
            .collect();
        assert!(invariant_range_is_union_of_points(&range_keys, &point_keys));
    }

    #[test]
    fn test_unknown_table_surfaces_before_statement_evaluation() {
        let router = build_router();
        let err = router
            .route("payments", Statement::Read { predicate: None })
            .unwrap_err();
        assert!(matches!(err, RoutingError::UnknownTable(ref t) if t == "payments"));
    }

    #[test]
    fn test_logical_tables_listed_sorted() {
        let router = build_router();
        assert_eq!(router.logical_tables(), vec!["orders", "user_profile"]);
    }
}
