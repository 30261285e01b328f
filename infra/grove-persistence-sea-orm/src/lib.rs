use async_lock::OnceCell;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema, SqlErr,
};

pub mod comments;
pub mod entity;
pub mod games;
pub mod ratings;

static DB_POOL: OnceCell<DatabaseConnection> = OnceCell::new();

pub async fn create_db_pool() -> DatabaseConnection {
    DB_POOL
        .get_or_init(|| async move {
            let db_url =
                std::env::var("GROVE_DATABASE_URL").expect("GROVE_DATABASE_URL must be set");

            let mut opt = ConnectOptions::new(&db_url);
            opt.max_connections(5).sqlx_logging(false);

            Database::connect(opt)
                .await
                .expect("Failed to connect to database")
        })
        .await
        .clone()
}

/// Creates the games, comments and ratings tables when they do not exist yet.
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut statements = vec![
        schema.create_table_from_entity(entity::game::Entity),
        schema.create_table_from_entity(entity::comment::Entity),
        schema.create_table_from_entity(entity::rating::Entity),
    ];
    for statement in statements.iter_mut() {
        db.execute(backend.build(statement.if_not_exists())).await?;
    }
    Ok(())
}

pub(crate) fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
