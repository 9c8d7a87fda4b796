//! # IoT Table Configuration Tests
//!
//! Reproduces the production configuration this engine was built for: two
//! sensor-data tables, each sharded into one physical table per month from
//! their first deployment year through 2100, keyed by snowflake ids.

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use shard_router::{
        ColumnValue, Predicate, Router, RoutingApi, Row, ShardingRuleConfig,
        ShardingRuleRegistry, Statement, StaticDataSourceCatalog,
    };

    /// Henhouse sensor data from 2023, beehive sensor data from 2022; both
    /// monthly through 2100, both keyed by the same snowflake generator.
    fn iot_config() -> ShardingRuleConfig {
        serde_json::from_str(
            r#"{
                "tables": [
                    {
                        "logical_table": "hen_house_smart_data",
                        "actual_data_nodes": "data_source_henhouse_0.hen_house_smart_data_$->{2023..2100}0$->{1..9},data_source_henhouse_0.hen_house_smart_data_$->{2023..2100}1$->{0..2}",
                        "sharding_column": "create_time_data",
                        "sharding_algorithm": "monthly-henhouse",
                        "key_column": "smart_data_id",
                        "key_generator": "alg-snowflake"
                    },
                    {
                        "logical_table": "bee_beehive_data",
                        "actual_data_nodes": "data_source_beehive_0.bee_beehive_data_$->{2022..2100}0$->{1..9},data_source_beehive_0.bee_beehive_data_$->{2022..2100}1$->{0..2}",
                        "sharding_column": "create_date_time",
                        "sharding_algorithm": "monthly-beehive",
                        "key_column": "beehive_data_id",
                        "key_generator": "alg-snowflake"
                    }
                ],
                "sharding_algorithms": [
                    {"name": "monthly-henhouse", "kind": "time_bucket_monthly", "min_year": 2023, "max_year": 2100},
                    {"name": "monthly-beehive", "kind": "time_bucket_monthly", "min_year": 2022, "max_year": 2100}
                ],
                "key_generators": [
                    {"name": "alg-snowflake", "kind": "snowflake", "worker_id": 1, "datacenter_id": 1}
                ]
            }"#,
        )
        .expect("well-formed configuration document")
    }

    fn build_router() -> Router {
        crate::integration::init_tracing();
        let catalog =
            StaticDataSourceCatalog::new(["data_source_henhouse_0", "data_source_beehive_0"]);
        let registry = ShardingRuleRegistry::from_config_with_catalog(&iot_config(), &catalog)
            .expect("valid configuration");
        Router::new(registry)
    }

    fn ts(year: i32, month: u32, day: u32) -> ColumnValue {
        ColumnValue::Timestamp(Utc.with_ymd_and_hms(year, month, day, 6, 0, 0).unwrap())
    }

    #[test]
    fn test_node_sets_span_every_month_of_every_year() {
        let router = build_router();
        let registry = router.registry();
        // Henhouse: 2023..=2100 -> 78 years x 12 months.
        assert_eq!(
            registry.resolve("hen_house_smart_data").unwrap().data_nodes().len(),
            78 * 12
        );
        // Beehive: 2022..=2100 -> 79 years x 12 months.
        assert_eq!(
            registry.resolve("bee_beehive_data").unwrap().data_nodes().len(),
            79 * 12
        );
    }

    #[test]
    fn test_henhouse_write_lands_in_month_table() {
        let router = build_router();
        let mut row = Row::new();
        row.insert("create_time_data".to_string(), ts(2023, 6, 15));
        row.insert("temperature".to_string(), ColumnValue::Integer(22));

        let plan = router
            .route("hen_house_smart_data", Statement::Write { row })
            .unwrap();
        assert_eq!(plan.targets[0].data_source, "data_source_henhouse_0");
        assert_eq!(plan.targets[0].table, "hen_house_smart_data_202306");
        assert!(plan.row.unwrap().contains_key("smart_data_id"));
    }

    #[test]
    fn test_beehive_accepts_2022_but_henhouse_does_not() {
        let router = build_router();

        let mut beehive_row = Row::new();
        beehive_row.insert("create_date_time".to_string(), ts(2022, 5, 1));
        let plan = router
            .route("bee_beehive_data", Statement::Write { row: beehive_row })
            .unwrap();
        assert_eq!(plan.targets[0].table, "bee_beehive_data_202205");

        let mut henhouse_row = Row::new();
        henhouse_row.insert("create_time_data".to_string(), ts(2022, 5, 1));
        assert!(router
            .route("hen_house_smart_data", Statement::Write { row: henhouse_row })
            .is_err());
    }

    #[test]
    fn test_range_query_across_year_boundary() {
        let router = build_router();
        let plan = router
            .route(
                "bee_beehive_data",
                Statement::Read {
                    predicate: Some(Predicate::Between {
                        start: ts(2022, 11, 20),
                        end: ts(2023, 2, 10),
                    }),
                },
            )
            .unwrap();
        let tables: Vec<&str> = plan.targets.iter().map(|n| n.table.as_str()).collect();
        assert_eq!(
            tables,
            vec![
                "bee_beehive_data_202211",
                "bee_beehive_data_202212",
                "bee_beehive_data_202301",
                "bee_beehive_data_202302"
            ]
        );
    }

    #[test]
    fn test_far_future_months_still_route() {
        let router = build_router();
        let plan = router
            .route(
                "hen_house_smart_data",
                Statement::Read {
                    predicate: Some(Predicate::Equals(ts(2100, 12, 31))),
                },
            )
            .unwrap();
        assert_eq!(plan.targets[0].table, "hen_house_smart_data_210012");
    }

    #[test]
    fn test_shared_generator_keeps_keys_unique_across_tables() {
        let router = build_router();
        let mut keys = std::collections::HashSet::new();
        for month in 1..=12 {
            let mut hen_row = Row::new();
            hen_row.insert("create_time_data".to_string(), ts(2023, month, 10));
            let plan = router
                .route("hen_house_smart_data", Statement::Write { row: hen_row })
                .unwrap();
            let Some(ColumnValue::Integer(id)) =
                plan.row.unwrap().get("smart_data_id").cloned()
            else {
                panic!("key not generated");
            };
            assert!(keys.insert(id));

            let mut bee_row = Row::new();
            bee_row.insert("create_date_time".to_string(), ts(2023, month, 10));
            let plan = router
                .route("bee_beehive_data", Statement::Write { row: bee_row })
                .unwrap();
            let Some(ColumnValue::Integer(id)) =
                plan.row.unwrap().get("beehive_data_id").cloned()
            else {
                panic!("key not generated");
            };
            assert!(keys.insert(id));
        }
        assert_eq!(keys.len(), 24);
    }

    #[test]
    fn test_missing_pool_for_data_source_fails_startup() {
        let catalog = StaticDataSourceCatalog::new(["data_source_henhouse_0"]);
        let result = ShardingRuleRegistry::from_config_with_catalog(&iot_config(), &catalog);
        assert!(result.is_err());
    }
}
