use std::sync::Arc;

use grove_core::GameType;
use grove_persistence_sea_orm::{
    comments::CommentRepositoryImpl, create_schema, games::GameRepositoryImpl,
    ratings::RatingRepositoryImpl,
};
use grove_server_app::domain::{
    GameId, Pagination, RepoCreateError, RepoRetrieveError, RepoUpdateError,
    comment::{CommentQuery, CommentRepository, NewComment},
    game::{GameChanges, GameOrder, GameQuery, GameRepository, GameSelection, NewGame},
    rating::RatingRepository,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

async fn setup() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    create_schema(&db).await.unwrap();
    db
}

fn new_game(title: &str, slug: &str) -> NewGame {
    NewGame {
        title: title.to_string(),
        slug: slug.to_string(),
        game_url: format!("/roms/{}.nes", slug),
        game_type: GameType::Emulator,
        thumbnail_url: None,
        description: Some("A classic".to_string()),
        categories: Some("Arcade".to_string()),
    }
}

#[tokio::test]
async fn test_game_crud_round_trip() {
    let db = setup().await;
    let repo = GameRepositoryImpl::from_connection(db);

    let created = repo.create_game(new_game("Pac-Man", "pac-man")).await.unwrap();
    assert_eq!(created.play_count, 0);
    assert_eq!(repo.get_game(created.id).await.unwrap().title, "Pac-Man");
    assert_eq!(
        repo.get_game_by_slug("pac-man").await.unwrap().id,
        created.id
    );

    let updated = repo
        .update_game(
            created.id,
            GameChanges {
                title: Some("Ms. Pac-Man".to_string()),
                game_type: Some(GameType::Embed),
                description: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Ms. Pac-Man");
    assert_eq!(updated.game_type, GameType::Embed);
    assert_eq!(updated.description, None);
    assert_eq!(updated.categories.as_deref(), Some("Arcade"));
    assert!(updated.updated_at >= created.updated_at);

    assert!(matches!(
        repo.get_game(GameId(404)).await,
        Err(RepoRetrieveError::NotFound)
    ));
    assert!(matches!(
        repo.update_game(GameId(404), GameChanges::default()).await,
        Err(RepoUpdateError::NotFound)
    ));
}

#[tokio::test]
async fn test_unique_slug_conflict() {
    let db = setup().await;
    let repo = GameRepositoryImpl::from_connection(db);
    repo.create_game(new_game("Tetris", "tetris")).await.unwrap();
    let other = repo.create_game(new_game("Dr. Mario", "dr-mario")).await.unwrap();

    assert!(matches!(
        repo.create_game(new_game("Tetris DX", "tetris")).await,
        Err(RepoCreateError::Conflict)
    ));
    assert!(matches!(
        repo.update_game(
            other.id,
            GameChanges {
                slug: Some("tetris".to_string()),
                ..Default::default()
            }
        )
        .await,
        Err(RepoUpdateError::Conflict)
    ));
}

#[tokio::test]
async fn test_query_order_and_pagination() {
    let db = setup().await;
    let repo = GameRepositoryImpl::from_connection(db);
    let a = repo.create_game(new_game("A", "a")).await.unwrap();
    let b = repo.create_game(new_game("B", "b")).await.unwrap();
    let c = repo.create_game(new_game("C", "c")).await.unwrap();

    let newest = repo.query_games(GameQuery::default()).await.unwrap();
    let ids: Vec<_> = newest.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![c.id, b.id, a.id]);

    repo.increment_play_count(a.id).await.unwrap();
    repo.increment_play_count(a.id).await.unwrap();
    repo.increment_play_count(b.id).await.unwrap();
    let popular = repo
        .query_games(GameQuery {
            order: GameOrder::MostPlayed,
            pagination: Pagination::limit(2),
        })
        .await
        .unwrap();
    let ids: Vec<_> = popular.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![a.id, b.id]);

    let page = repo
        .query_games(GameQuery {
            order: GameOrder::Newest,
            pagination: Pagination {
                offset: Some(2),
                limit: Some(5),
            },
        })
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, a.id);
}

#[tokio::test]
async fn test_play_counts() {
    let db = setup().await;
    let repo = GameRepositoryImpl::from_connection(db);
    let game = repo.create_game(new_game("Joust", "joust")).await.unwrap();

    assert_eq!(repo.increment_play_count(game.id).await.unwrap(), 1);
    assert_eq!(repo.increment_play_count(game.id).await.unwrap(), 2);
    assert!(matches!(
        repo.increment_play_count(GameId(404)).await,
        Err(RepoRetrieveError::NotFound)
    ));

    repo.create_game(new_game("Qix", "qix")).await.unwrap();
    assert_eq!(repo.overwrite_play_counts(|| 4242).await.unwrap(), 2);
    let games = repo.query_games(GameQuery::default()).await.unwrap();
    assert!(games.iter().all(|g| g.play_count == 4242));
}

#[tokio::test]
async fn test_concurrent_plays_report_distinct_counts() {
    let db = setup().await;
    let repo = Arc::new(GameRepositoryImpl::from_connection(db));
    let game = repo.create_game(new_game("Joust", "joust")).await.unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.increment_play_count(game.id).await })
        })
        .collect();
    let mut counts = Vec::new();
    for handle in handles {
        counts.push(handle.await.unwrap().unwrap());
    }
    counts.sort();

    assert_eq!(counts, (1..=8).collect::<Vec<i64>>());
    assert_eq!(repo.get_game(game.id).await.unwrap().play_count, 8);
}

#[tokio::test]
async fn test_delete_game_cascades() {
    let db = setup().await;
    let games = GameRepositoryImpl::from_connection(db.clone());
    let comments = CommentRepositoryImpl::from_connection(db.clone());
    let ratings = RatingRepositoryImpl::from_connection(db);

    let keep = games.create_game(new_game("Keep", "keep")).await.unwrap();
    let doomed = games.create_game(new_game("Doomed", "doomed")).await.unwrap();
    for id in [keep.id, doomed.id] {
        comments
            .create_comment(NewComment {
                game_id: id,
                content: "gg".to_string(),
                author: "tester".to_string(),
            })
            .await
            .unwrap();
        ratings.add_rating(id, 5).await.unwrap();
    }

    games.delete_game(doomed.id).await.unwrap();
    assert!(matches!(
        games.delete_game(doomed.id).await,
        Err(RepoRetrieveError::NotFound)
    ));
    let remaining = comments.get_comments(CommentQuery::default()).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].comment.game_id, keep.id);
    assert!(ratings.get_rating_values(doomed.id).await.unwrap().is_empty());
    assert_eq!(ratings.get_rating_values(keep.id).await.unwrap(), vec![5]);
}

#[tokio::test]
async fn test_bulk_delete() {
    let db = setup().await;
    let games = GameRepositoryImpl::from_connection(db.clone());
    let ratings = RatingRepositoryImpl::from_connection(db);
    let a = games.create_game(new_game("A", "a")).await.unwrap();
    let b = games.create_game(new_game("B", "b")).await.unwrap();
    games.create_game(new_game("C", "c")).await.unwrap();
    ratings.add_rating(a.id, 3).await.unwrap();

    assert_eq!(
        games
            .delete_games(GameSelection::Ids(vec![a.id, b.id, GameId(404)]))
            .await
            .unwrap(),
        2
    );
    assert!(ratings.get_rating_values(a.id).await.unwrap().is_empty());
    assert_eq!(games.delete_games(GameSelection::All).await.unwrap(), 1);
    assert!(games.query_games(GameQuery::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_comment_filtering_and_moderation() {
    let db = setup().await;
    let games = GameRepositoryImpl::from_connection(db.clone());
    let comments = CommentRepositoryImpl::from_connection(db);
    let first = games.create_game(new_game("First", "first")).await.unwrap();
    let second = games.create_game(new_game("Second", "second")).await.unwrap();

    let c1 = comments
        .create_comment(NewComment {
            game_id: first.id,
            content: "one".to_string(),
            author: "a".to_string(),
        })
        .await
        .unwrap();
    let c2 = comments
        .create_comment(NewComment {
            game_id: second.id,
            content: "two".to_string(),
            author: "b".to_string(),
        })
        .await
        .unwrap();
    assert!(!c1.approved);

    let all = comments.get_comments(CommentQuery::default()).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].comment.id, c2.id);
    assert_eq!(all[0].game_title, "Second");

    let approved_only = CommentQuery {
        game_id: Some(first.id),
        approved_only: true,
    };
    assert!(comments.get_comments(approved_only.clone()).await.unwrap().is_empty());
    comments.set_approved(c1.id, true).await.unwrap();
    let visible = comments.get_comments(approved_only).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].comment.content, "one");

    comments.delete_comment(c2.id).await.unwrap();
    assert!(matches!(
        comments.delete_comment(c2.id).await,
        Err(RepoRetrieveError::NotFound)
    ));
    assert!(matches!(
        comments.set_approved(c2.id, true).await,
        Err(RepoUpdateError::NotFound)
    ));
}

#[tokio::test]
async fn test_rating_values() {
    let db = setup().await;
    let games = GameRepositoryImpl::from_connection(db.clone());
    let ratings = RatingRepositoryImpl::from_connection(db);
    let game = games.create_game(new_game("Rated", "rated")).await.unwrap();
    for value in [1, 4, 5] {
        ratings.add_rating(game.id, value).await.unwrap();
    }
    let mut values = ratings.get_rating_values(game.id).await.unwrap();
    values.sort();
    assert_eq!(values, vec![1, 4, 5]);
}
