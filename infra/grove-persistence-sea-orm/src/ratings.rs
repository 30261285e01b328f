use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, Set,
};

use grove_server_app::domain::{GameId, RepoError, rating::RatingRepository};

use crate::{create_db_pool, entity::rating};

pub struct RatingRepositoryImpl {
    db: DatabaseConnection,
}

impl RatingRepositoryImpl {
    pub async fn new() -> Self {
        let db = create_db_pool().await;
        Self { db }
    }

    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl RatingRepository for RatingRepositoryImpl {
    async fn add_rating(&self, game_id: GameId, value: i32) -> Result<(), RepoError> {
        let model = rating::ActiveModel {
            game_id: Set(game_id.0),
            value: Set(value),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        model
            .insert(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(())
    }

    async fn get_rating_values(&self, game_id: GameId) -> Result<Vec<i32>, RepoError> {
        rating::Entity::find()
            .filter(rating::Column::GameId.eq(game_id.0))
            .select_only()
            .column(rating::Column::Value)
            .into_tuple::<i32>()
            .all(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))
    }
}
