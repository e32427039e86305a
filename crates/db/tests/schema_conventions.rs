use sqlx::PgPool;

/// Application tables, excluding sqlx bookkeeping.
async fn user_tables(pool: &PgPool) -> Vec<String> {
    sqlx::query_scalar(
        "SELECT table_name::TEXT
         FROM information_schema.tables
         WHERE table_schema = 'public'
           AND table_type = 'BASE TABLE'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expected_tables_exist(pool: PgPool) {
    assert_eq!(user_tables(&pool).await, ["items", "point_items", "points"]);
}

/// Primary keys are bigint and every table carries timestamptz audit columns.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ids_and_timestamps(pool: PgPool) {
    for table in user_tables(&pool).await {
        let columns: Vec<(String, String)> = sqlx::query_as(
            "SELECT column_name::TEXT, data_type::TEXT
             FROM information_schema.columns
             WHERE table_schema = 'public' AND table_name = $1",
        )
        .bind(&table)
        .fetch_all(&pool)
        .await
        .unwrap();

        let type_of = |name: &str| {
            columns
                .iter()
                .find(|(c, _)| c == name)
                .map(|(_, t)| t.as_str())
                .unwrap_or_else(|| panic!("{table} is missing column {name}"))
        };

        assert_eq!(type_of("id"), "bigint", "{table}.id");
        assert_eq!(type_of("created_at"), "timestamp with time zone", "{table}.created_at");
        assert_eq!(type_of("updated_at"), "timestamp with time zone", "{table}.updated_at");
        assert!(
            columns.iter().all(|(_, t)| t != "character varying"),
            "{table} should use TEXT, not VARCHAR"
        );
    }
}

/// Both junction FKs are indexed and declare explicit referential actions.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_point_items_foreign_keys(pool: PgPool) {
    let rules: Vec<(String, String)> = sqlx::query_as(
        "SELECT rc.delete_rule::TEXT, rc.update_rule::TEXT
         FROM information_schema.referential_constraints rc
         JOIN information_schema.table_constraints tc
             ON rc.constraint_name = tc.constraint_name
            AND rc.constraint_schema = tc.table_schema
         WHERE tc.table_name = 'point_items'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(rules.len(), 2);
    for (on_delete, on_update) in &rules {
        assert_ne!(on_delete, "NO ACTION");
        assert_ne!(on_update, "NO ACTION");
    }

    for column in ["point_id", "item_id"] {
        let indexed: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                 SELECT 1 FROM pg_indexes
                 WHERE schemaname = 'public'
                   AND tablename = 'point_items'
                   AND indexdef LIKE '%(' || $1 || ')%'
             )",
        )
        .bind(column)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(indexed, "point_items.{column} has no index");
    }
}

/// The schema itself rejects out-of-range coordinates and malformed state codes.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_point_check_constraints(pool: PgPool) {
    let insert = "INSERT INTO points (name, email, whatsapp, latitude, longitude, city, uf)
                  VALUES ('x', 'x@x.com', '1', $1, $2, 'Campinas', $3)";

    for (lat, lon, uf) in [(91.0, 0.0, "SP"), (0.0, 181.0, "SP"), (0.0, 0.0, "sp")] {
        let result = sqlx::query(insert)
            .bind(lat)
            .bind(lon)
            .bind(uf)
            .execute(&pool)
            .await;
        assert!(result.is_err(), "({lat}, {lon}, {uf}) should violate a CHECK");
    }
}
