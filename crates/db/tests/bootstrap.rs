use ecoleta_db::repositories::ItemRepo;
use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify the seeded catalog.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    ecoleta_db::health_check(&pool).await.unwrap();

    let items = ItemRepo::list(&pool).await.unwrap();
    let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(
        titles,
        [
            "Lâmpadas",
            "Pilhas e Baterias",
            "Papéis e Papelão",
            "Resíduos Eletrônicos",
            "Resíduos Orgânicos",
            "Óleo de Cozinha",
        ]
    );
    assert!(items.windows(2).all(|w| w[0].id < w[1].id), "catalog order is ascending id");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_missing_reports_unknown_ids_in_input_order(pool: PgPool) {
    let items = ItemRepo::list(&pool).await.unwrap();
    let known = items[0].id;

    let missing = ItemRepo::find_missing(&pool, &[9002, known, 9001]).await.unwrap();
    assert_eq!(missing, vec![9002, 9001]);

    let none = ItemRepo::find_missing(&pool, &[known]).await.unwrap();
    assert!(none.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_item_by_id(pool: PgPool) {
    let first = ItemRepo::list(&pool).await.unwrap().remove(0);
    let found = ItemRepo::find_by_id(&pool, first.id).await.unwrap().unwrap();
    assert_eq!(found.title, first.title);
    assert!(ItemRepo::find_by_id(&pool, 9999).await.unwrap().is_none());
}
