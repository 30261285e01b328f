use std::sync::Arc;

use crate::domain::{
    Pagination, RepoError,
    game::{Game, GameOrder, GameQuery, GameRepository},
};

#[async_trait::async_trait]
pub trait ListGamesUseCase {
    async fn list_games(
        &self,
        search: Option<String>,
        pagination: Pagination,
    ) -> Result<Vec<Game>, ListGamesError>;
}

#[derive(Debug, PartialEq)]
pub enum ListGamesError {
    RepositoryError,
}

pub struct ListGamesUseCaseImpl<G: GameRepository> {
    game_repository: Arc<G>,
}

impl<G: GameRepository> ListGamesUseCaseImpl<G> {
    pub fn new(game_repository: Arc<G>) -> Self {
        Self { game_repository }
    }
}

#[async_trait::async_trait]
impl<G: GameRepository + Send + Sync + 'static> ListGamesUseCase for ListGamesUseCaseImpl<G> {
    async fn list_games(
        &self,
        search: Option<String>,
        pagination: Pagination,
    ) -> Result<Vec<Game>, ListGamesError> {
        let search = search.filter(|s| !s.trim().is_empty());
        // Searching needs the full list, so paginate after filtering.
        let query = GameQuery {
            order: GameOrder::Newest,
            pagination: if search.is_some() {
                Pagination::default()
            } else {
                pagination.clone()
            },
        };
        let games = match self.game_repository.query_games(query).await {
            Ok(games) => games,
            Err(RepoError::StorageError(e)) => {
                log::error!("Error listing games: {}", e);
                return Err(ListGamesError::RepositoryError);
            }
        };
        match search {
            Some(term) => Ok(pagination.apply(
                games
                    .into_iter()
                    .filter(|g| g.matches_search(&term))
                    .collect(),
            )),
            None => Ok(games),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::{
        testing::InMemoryStore,
        workflow::games::{
            GameInput,
            create::{CreateGameUseCase, CreateGameUseCaseImpl},
        },
    };

    async fn seed(store: &Arc<InMemoryStore>, titles: &[&str]) {
        let create = CreateGameUseCaseImpl::new(store.clone());
        for title in titles {
            create
                .create_game(GameInput {
                    title: Some(title.to_string()),
                    game_url: Some("/roms/x.nes".to_string()),
                    ..Default::default()
                })
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_list_games_newest_first() {
        let store = Arc::new(InMemoryStore::new());
        seed(&store, &["Alpha", "Beta", "Gamma"]).await;
        let use_case = ListGamesUseCaseImpl::new(store);
        let games = use_case
            .list_games(None, Pagination::default())
            .await
            .unwrap();
        let titles: Vec<_> = games.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["Gamma", "Beta", "Alpha"]);

        let page = use_case
            .list_games(
                None,
                Pagination {
                    offset: Some(1),
                    limit: Some(1),
                },
            )
            .await
            .unwrap();
        assert_eq!(page[0].title, "Beta");
    }

    #[tokio::test]
    async fn test_list_games_search() {
        let store = Arc::new(InMemoryStore::new());
        seed(&store, &["Super Mario", "Mario Kart", "Zelda"]).await;
        let use_case = ListGamesUseCaseImpl::new(store);
        let games = use_case
            .list_games(Some("MARIO".to_string()), Pagination::limit(1))
            .await
            .unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].title, "Mario Kart");

        let by_id = use_case
            .list_games(Some("3".to_string()), Pagination::default())
            .await
            .unwrap();
        assert_eq!(by_id[0].title, "Zelda");
    }

    #[tokio::test]
    async fn test_list_games_storage_error() {
        let store = Arc::new(InMemoryStore::new());
        store.fail_storage.store(true, Ordering::SeqCst);
        let use_case = ListGamesUseCaseImpl::new(store);
        assert_eq!(
            use_case.list_games(None, Pagination::default()).await,
            Err(ListGamesError::RepositoryError)
        );
    }
}
