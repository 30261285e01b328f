use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

use grove_server_app::domain::{
    CommentId, GameId, RepoError, RepoRetrieveError, RepoUpdateError,
    comment::{Comment, CommentQuery, CommentRepository, CommentWithGame, NewComment},
};

use crate::{
    create_db_pool,
    entity::{comment, game},
};

pub struct CommentRepositoryImpl {
    db: DatabaseConnection,
}

impl CommentRepositoryImpl {
    pub async fn new() -> Self {
        let db = create_db_pool().await;
        Self { db }
    }

    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_comment(model: comment::Model) -> Comment {
        Comment {
            id: CommentId(model.id),
            game_id: GameId(model.game_id),
            content: model.content,
            author: model.author,
            approved: model.approved,
            created_at: model.created_at,
        }
    }
}

#[async_trait::async_trait]
impl CommentRepository for CommentRepositoryImpl {
    async fn create_comment(&self, new_comment: NewComment) -> Result<Comment, RepoError> {
        let model = comment::ActiveModel {
            game_id: Set(new_comment.game_id.0),
            content: Set(new_comment.content),
            author: Set(new_comment.author),
            approved: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        model
            .insert(&self.db)
            .await
            .map(Self::model_to_comment)
            .map_err(|e| RepoError::StorageError(e.to_string()))
    }

    async fn get_comments(&self, query: CommentQuery) -> Result<Vec<CommentWithGame>, RepoError> {
        let mut db_query = comment::Entity::find();
        if let Some(game_id) = query.game_id {
            db_query = db_query.filter(comment::Column::GameId.eq(game_id.0));
        }
        if query.approved_only {
            db_query = db_query.filter(comment::Column::Approved.eq(true));
        }
        let rows = db_query
            .order_by_desc(comment::Column::CreatedAt)
            .order_by_desc(comment::Column::Id)
            .find_also_related(game::Entity)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::StorageError(e.to_string()))?;
        Ok(rows
            .into_iter()
            .map(|(comment, game)| CommentWithGame {
                comment: Self::model_to_comment(comment),
                game_title: game.map(|g| g.title).unwrap_or_default(),
            })
            .collect())
    }

    async fn set_approved(&self, id: CommentId, approved: bool) -> Result<(), RepoUpdateError> {
        let updated = comment::Entity::update_many()
            .col_expr(comment::Column::Approved, Expr::value(approved))
            .filter(comment::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .map_err(|e| RepoUpdateError::StorageError(e.to_string()))?;
        if updated.rows_affected == 0 {
            return Err(RepoUpdateError::NotFound);
        }
        Ok(())
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), RepoRetrieveError> {
        let deleted = comment::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| RepoRetrieveError::StorageError(e.to_string()))?;
        if deleted.rows_affected == 0 {
            return Err(RepoRetrieveError::NotFound);
        }
        Ok(())
    }
}
