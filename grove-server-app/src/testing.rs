use std::sync::Mutex;

use chrono::Utc;

use crate::{
    domain::{
        CommentId, GameId, RepoCreateError, RepoError, RepoRetrieveError, RepoUpdateError,
        asset::{AssetKind, RemoteResource},
        comment::{Comment, CommentQuery, CommentRepository, CommentWithGame, NewComment},
        game::{Game, GameChanges, GameOrder, GameQuery, GameRepository, GameSelection, NewGame},
        rating::RatingRepository,
    },
    ports::{
        fetch::{FetchError, ResourceFetchPort},
        storage::{AssetStoragePort, StoreAssetError},
    },
};

#[derive(Default)]
struct Tables {
    games: Vec<Game>,
    comments: Vec<Comment>,
    ratings: Vec<(GameId, i32)>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Backs every repository trait with one set of in-memory tables so that
/// deletes cascade the way the database does.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    pub fail_storage: std::sync::atomic::AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check(&self) -> Result<(), String> {
        if self.fail_storage.load(std::sync::atomic::Ordering::SeqCst) {
            return Err("storage offline".to_string());
        }
        Ok(())
    }

    pub fn comment_count(&self) -> usize {
        self.tables.lock().unwrap().comments.len()
    }

    pub fn rating_count(&self) -> usize {
        self.tables.lock().unwrap().ratings.len()
    }
}

#[async_trait::async_trait]
impl GameRepository for InMemoryStore {
    async fn create_game(&self, game: NewGame) -> Result<Game, RepoCreateError> {
        self.check().map_err(RepoCreateError::StorageError)?;
        let mut tables = self.tables.lock().unwrap();
        if tables.games.iter().any(|g| g.slug == game.slug) {
            return Err(RepoCreateError::Conflict);
        }
        let now = Utc::now();
        let game = Game {
            id: GameId(tables.next_id()),
            title: game.title,
            slug: game.slug,
            game_url: game.game_url,
            game_type: game.game_type,
            thumbnail_url: game.thumbnail_url,
            description: game.description,
            categories: game.categories,
            play_count: 0,
            created_at: now,
            updated_at: now,
        };
        tables.games.push(game.clone());
        Ok(game)
    }

    async fn get_game(&self, id: GameId) -> Result<Game, RepoRetrieveError> {
        self.check().map_err(RepoRetrieveError::StorageError)?;
        let tables = self.tables.lock().unwrap();
        tables
            .games
            .iter()
            .find(|g| g.id == id)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn get_game_by_slug(&self, slug: &str) -> Result<Game, RepoRetrieveError> {
        self.check().map_err(RepoRetrieveError::StorageError)?;
        let tables = self.tables.lock().unwrap();
        tables
            .games
            .iter()
            .find(|g| g.slug == slug)
            .cloned()
            .ok_or(RepoRetrieveError::NotFound)
    }

    async fn query_games(&self, query: GameQuery) -> Result<Vec<Game>, RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        let mut games = self.tables.lock().unwrap().games.clone();
        match query.order {
            GameOrder::Newest => games.sort_by(|a, b| b.id.cmp(&a.id)),
            GameOrder::MostPlayed => games.sort_by(|a, b| {
                b.play_count.cmp(&a.play_count).then(b.id.cmp(&a.id))
            }),
        }
        Ok(query.pagination.apply(games))
    }

    async fn update_game(
        &self,
        id: GameId,
        changes: GameChanges,
    ) -> Result<Game, RepoUpdateError> {
        self.check().map_err(RepoUpdateError::StorageError)?;
        let mut tables = self.tables.lock().unwrap();
        if let Some(slug) = &changes.slug
            && tables.games.iter().any(|g| &g.slug == slug && g.id != id)
        {
            return Err(RepoUpdateError::Conflict);
        }
        let game = tables
            .games
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(RepoUpdateError::NotFound)?;
        if let Some(title) = changes.title {
            game.title = title;
        }
        if let Some(slug) = changes.slug {
            game.slug = slug;
        }
        if let Some(game_url) = changes.game_url {
            game.game_url = game_url;
        }
        if let Some(game_type) = changes.game_type {
            game.game_type = game_type;
        }
        if let Some(thumbnail_url) = changes.thumbnail_url {
            game.thumbnail_url = thumbnail_url;
        }
        if let Some(description) = changes.description {
            game.description = description;
        }
        if let Some(categories) = changes.categories {
            game.categories = categories;
        }
        game.updated_at = Utc::now();
        Ok(game.clone())
    }

    async fn delete_game(&self, id: GameId) -> Result<(), RepoRetrieveError> {
        self.check().map_err(RepoRetrieveError::StorageError)?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.games.len();
        tables.games.retain(|g| g.id != id);
        if tables.games.len() == before {
            return Err(RepoRetrieveError::NotFound);
        }
        tables.comments.retain(|c| c.game_id != id);
        tables.ratings.retain(|(game_id, _)| *game_id != id);
        Ok(())
    }

    async fn delete_games(&self, selection: GameSelection) -> Result<u64, RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        let mut tables = self.tables.lock().unwrap();
        let selected = |id: &GameId| match &selection {
            GameSelection::All => true,
            GameSelection::Ids(ids) => ids.contains(id),
        };
        let before = tables.games.len();
        tables.games.retain(|g| !selected(&g.id));
        tables.comments.retain(|c| !selected(&c.game_id));
        tables.ratings.retain(|(game_id, _)| !selected(game_id));
        Ok((before - tables.games.len()) as u64)
    }

    async fn increment_play_count(&self, id: GameId) -> Result<i64, RepoRetrieveError> {
        self.check().map_err(RepoRetrieveError::StorageError)?;
        let mut tables = self.tables.lock().unwrap();
        let game = tables
            .games
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(RepoRetrieveError::NotFound)?;
        game.play_count += 1;
        Ok(game.play_count)
    }

    async fn overwrite_play_counts(
        &self,
        value_fn: impl Fn() -> i64 + Send + Sync + 'static,
    ) -> Result<u64, RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        let mut tables = self.tables.lock().unwrap();
        for game in tables.games.iter_mut() {
            game.play_count = value_fn();
        }
        Ok(tables.games.len() as u64)
    }
}

#[async_trait::async_trait]
impl CommentRepository for InMemoryStore {
    async fn create_comment(&self, comment: NewComment) -> Result<Comment, RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        let mut tables = self.tables.lock().unwrap();
        let comment = Comment {
            id: CommentId(tables.next_id()),
            game_id: comment.game_id,
            content: comment.content,
            author: comment.author,
            approved: false,
            created_at: Utc::now(),
        };
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn get_comments(&self, query: CommentQuery) -> Result<Vec<CommentWithGame>, RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        let tables = self.tables.lock().unwrap();
        let mut comments: Vec<CommentWithGame> = tables
            .comments
            .iter()
            .filter(|c| query.game_id.is_none_or(|id| c.game_id == id))
            .filter(|c| !query.approved_only || c.approved)
            .map(|c| CommentWithGame {
                comment: c.clone(),
                game_title: tables
                    .games
                    .iter()
                    .find(|g| g.id == c.game_id)
                    .map(|g| g.title.clone())
                    .unwrap_or_default(),
            })
            .collect();
        comments.sort_by(|a, b| b.comment.id.0.cmp(&a.comment.id.0));
        Ok(comments)
    }

    async fn set_approved(&self, id: CommentId, approved: bool) -> Result<(), RepoUpdateError> {
        self.check().map_err(RepoUpdateError::StorageError)?;
        let mut tables = self.tables.lock().unwrap();
        let comment = tables
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepoUpdateError::NotFound)?;
        comment.approved = approved;
        Ok(())
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), RepoRetrieveError> {
        self.check().map_err(RepoRetrieveError::StorageError)?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != id);
        if tables.comments.len() == before {
            return Err(RepoRetrieveError::NotFound);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RatingRepository for InMemoryStore {
    async fn add_rating(&self, game_id: GameId, value: i32) -> Result<(), RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        self.tables.lock().unwrap().ratings.push((game_id, value));
        Ok(())
    }

    async fn get_rating_values(&self, game_id: GameId) -> Result<Vec<i32>, RepoError> {
        self.check().map_err(RepoError::StorageError)?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .ratings
            .iter()
            .filter(|(id, _)| *id == game_id)
            .map(|(_, value)| *value)
            .collect())
    }
}

#[derive(Default)]
pub struct RecordingStorage {
    pub stored: Mutex<Vec<(AssetKind, String, usize)>>,
}

#[async_trait::async_trait]
impl AssetStoragePort for RecordingStorage {
    async fn store(
        &self,
        kind: AssetKind,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreAssetError> {
        self.stored
            .lock()
            .unwrap()
            .push((kind, file_name.to_string(), bytes.len()));
        Ok(format!("/{}/{}", kind.directory(), file_name))
    }
}

pub struct StaticFetcher {
    pub result: Result<RemoteResource, FetchError>,
}

#[async_trait::async_trait]
impl ResourceFetchPort for StaticFetcher {
    async fn fetch(&self, _url: &str) -> Result<RemoteResource, FetchError> {
        self.result.clone()
    }
}
