use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionError, TransactionTrait, sea_query::Expr,
};

use grove_core::GameType;
use grove_server_app::domain::{
    GameId, RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError,
    game::{Game, GameChanges, GameOrder, GameQuery, GameRepository, GameSelection, NewGame},
};

use crate::{
    create_db_pool,
    entity::{comment, game, rating},
    is_unique_violation,
};

pub struct GameRepositoryImpl {
    db: DatabaseConnection,
}

impl GameRepositoryImpl {
    pub async fn new() -> Self {
        let db = create_db_pool().await;
        Self { db }
    }

    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_game(model: game::Model) -> Game {
        let game_type = model.game_type.parse::<GameType>().unwrap_or_else(|_| {
            log::warn!(
                "Game {} has unknown type '{}', treating as emulator",
                model.id,
                model.game_type
            );
            GameType::default()
        });
        Game {
            id: GameId(model.id),
            title: model.title,
            slug: model.slug,
            game_url: model.game_url,
            game_type,
            thumbnail_url: model.thumbnail_url,
            description: model.description,
            categories: model.categories,
            play_count: model.play_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait::async_trait]
impl GameRepository for GameRepositoryImpl {
    async fn create_game(&self, new_game: NewGame) -> Result<Game, RepoCreateError> {
        let now = Utc::now();
        let model = game::ActiveModel {
            title: Set(new_game.title),
            slug: Set(new_game.slug),
            game_url: Set(new_game.game_url),
            game_type: Set(new_game.game_type.as_str().to_string()),
            thumbnail_url: Set(new_game.thumbnail_url),
            description: Set(new_game.description),
            categories: Set(new_game.categories),
            play_count: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        match model.insert(&self.db).await {
            Ok(model) => Ok(Self::model_to_game(model)),
            Err(e) if is_unique_violation(&e) => Err(RepoCreateError::Conflict),
            Err(e) => Err(RepoCreateError::StorageError(e.to_string())),
        }
    }

    async fn get_game(&self, id: GameId) -> Result<Game, RepoRetrieveError> {
        game::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?
            .map(Self::model_to_game)
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn get_game_by_slug(&self, slug: &str) -> Result<Game, RepoRetrieveError> {
        game::Entity::find()
            .filter(game::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?
            .map(Self::model_to_game)
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn query_games(&self, query: GameQuery) -> Result<Vec<Game>, RepoError> {
        let db_query = match query.order {
            GameOrder::Newest => game::Entity::find()
                .order_by_desc(game::Column::CreatedAt)
                .order_by_desc(game::Column::Id),
            GameOrder::MostPlayed => game::Entity::find()
                .order_by_desc(game::Column::PlayCount)
                .order_by_desc(game::Column::Id),
        };
        let models = db_query
            .offset(query.pagination.offset.map(|o| o as u64))
            .limit(query.pagination.limit.map(|l| l as u64))
            .all(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(models.into_iter().map(Self::model_to_game).collect())
    }

    async fn update_game(
        &self,
        id: GameId,
        changes: GameChanges,
    ) -> Result<Game, RepoUpdateError> {
        let model = game::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| RepoUpdateError::StorageError(e.to_string()))?
            .ok_or(RepoUpdateError::NotFound)?;

        let mut active: game::ActiveModel = model.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(slug) = changes.slug {
            active.slug = Set(slug);
        }
        if let Some(game_url) = changes.game_url {
            active.game_url = Set(game_url);
        }
        if let Some(game_type) = changes.game_type {
            active.game_type = Set(game_type.as_str().to_string());
        }
        if let Some(thumbnail_url) = changes.thumbnail_url {
            active.thumbnail_url = Set(thumbnail_url);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(categories) = changes.categories {
            active.categories = Set(categories);
        }
        active.updated_at = Set(Utc::now());

        match active.update(&self.db).await {
            Ok(model) => Ok(Self::model_to_game(model)),
            Err(e) if is_unique_violation(&e) => Err(RepoUpdateError::Conflict),
            Err(e) => Err(RepoUpdateError::StorageError(e.to_string())),
        }
    }

    async fn delete_game(&self, id: GameId) -> Result<(), RepoRetrieveError> {
        let res = self
            .db
            .transaction::<_, (), RepoRetrieveError>(|c| {
                Box::pin(async move {
                    comment::Entity::delete_many()
                        .filter(comment::Column::GameId.eq(id.0))
                        .exec(c)
                        .await
                        .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?;
                    rating::Entity::delete_many()
                        .filter(rating::Column::GameId.eq(id.0))
                        .exec(c)
                        .await
                        .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?;
                    let deleted = game::Entity::delete_by_id(id.0)
                        .exec(c)
                        .await
                        .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?;
                    if deleted.rows_affected == 0 {
                        return Err(RepoRetrieveError::NotFound);
                    }
                    Ok(())
                })
            })
            .await;
        match res {
            Ok(()) => Ok(()),
            Err(TransactionError::Transaction(e)) => Err(e),
            Err(TransactionError::Connection(e)) => {
                Err(RepoRetrieveError::StorageError(e.to_string()))
            }
        }
    }

    async fn delete_games(&self, selection: GameSelection) -> Result<u64, RepoError> {
        let ids: Option<Vec<i64>> = match selection {
            GameSelection::All => None,
            GameSelection::Ids(ids) => Some(ids.into_iter().map(|id| id.0).collect()),
        };
        let res = self
            .db
            .transaction::<_, u64, RepoError>(|c| {
                Box::pin(async move {
                    let mut comments = comment::Entity::delete_many();
                    let mut ratings = rating::Entity::delete_many();
                    let mut games = game::Entity::delete_many();
                    if let Some(ids) = ids {
                        comments = comments.filter(comment::Column::GameId.is_in(ids.clone()));
                        ratings = ratings.filter(rating::Column::GameId.is_in(ids.clone()));
                        games = games.filter(game::Column::Id.is_in(ids));
                    }
                    comments
                        .exec(c)
                        .await
                        .map_err(|e| RepoError::StorageError(e.to_string()))?;
                    ratings
                        .exec(c)
                        .await
                        .map_err(|e| RepoError::StorageError(e.to_string()))?;
                    let deleted = games
                        .exec(c)
                        .await
                        .map_err(|e| RepoError::StorageError(e.to_string()))?;
                    Ok(deleted.rows_affected)
                })
            })
            .await;
        match res {
            Ok(deleted) => Ok(deleted),
            Err(TransactionError::Transaction(e)) => Err(e),
            Err(TransactionError::Connection(e)) => Err(RepoError::StorageError(e.to_string())),
        }
    }

    async fn increment_play_count(&self, id: GameId) -> Result<i64, RepoRetrieveError> {
        let id = id.0;
        let res = self
            .db
            .transaction::<_, i64, RepoRetrieveError>(|c| {
                Box::pin(async move {
                    let updated = game::Entity::update_many()
                        .col_expr(
                            game::Column::PlayCount,
                            Expr::col(game::Column::PlayCount).add(1),
                        )
                        .filter(game::Column::Id.eq(id))
                        .exec(c)
                        .await
                        .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?;
                    if updated.rows_affected == 0 {
                        return Err(RepoRetrieveError::NotFound);
                    }
                    game::Entity::find_by_id(id)
                        .select_only()
                        .column(game::Column::PlayCount)
                        .into_tuple::<i64>()
                        .one(c)
                        .await
                        .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?
                        .ok_or(RepoRetrieveError::NotFound)
                })
            })
            .await;
        match res {
            Ok(count) => Ok(count),
            Err(TransactionError::Transaction(e)) => Err(e),
            Err(TransactionError::Connection(e)) => {
                Err(RepoRetrieveError::StorageError(e.to_string()))
            }
        }
    }

    async fn overwrite_play_counts(
        &self,
        value_fn: impl Fn() -> i64 + Send + Sync + 'static,
    ) -> Result<u64, RepoError> {
        let res = self
            .db
            .transaction::<_, u64, RepoError>(|c| {
                Box::pin(async move {
                    let ids = game::Entity::find()
                        .select_only()
                        .column(game::Column::Id)
                        .into_tuple::<i64>()
                        .all(c)
                        .await
                        .map_err(|e| RepoError::StorageError(e.to_string()))?;
                    for id in ids.iter() {
                        let value = value_fn();
                        game::Entity::update_many()
                            .col_expr(game::Column::PlayCount, Expr::value(value))
                            .filter(game::Column::Id.eq(*id))
                            .exec(c)
                            .await
                            .map_err(|e| RepoError::StorageError(e.to_string()))?;
                    }
                    Ok(ids.len() as u64)
                })
            })
            .await;
        match res {
            Ok(updated) => Ok(updated),
            Err(TransactionError::Transaction(e)) => Err(e),
            Err(TransactionError::Connection(e)) => Err(RepoError::StorageError(e.to_string())),
        }
    }
}
