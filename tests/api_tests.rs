use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;

use rurax_api::api::{create_router, AppState};
use rurax_api::config::RecommenderConfig;
use rurax_api::db::InMemoryStore;
use rurax_api::models::{Movie, User};

fn genres(names: &[&str]) -> Vec<String> {
    names.iter().map(|g| g.to_string()).collect()
}

/// Users 1 and 2 share taste; user 3 has liked nothing.
async fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    store.insert_user(User::new(1, "ana@example.com", "ana")).await;
    store.insert_user(User::new(2, "ben@example.com", "ben")).await;
    store.insert_user(User::new(3, "cai@example.com", "cai")).await;

    store.insert_movie(Movie::new(1, "Harbor Lights", genres(&["Drama"])).with_vote_average(7.1)).await;
    store.insert_movie(Movie::new(2, "Quiet Rooms", genres(&["Drama"])).with_vote_average(6.4)).await;
    store.insert_movie(Movie::new(3, "Winter Letters", genres(&["Drama"])).with_vote_average(8.0)).await;
    store.insert_movie(Movie::new(4, "Laugh Track", genres(&["Comedy"])).with_vote_average(5.5)).await;
    store.insert_movie(Movie::new(5, "Road Trip", genres(&["Comedy"])).with_vote_average(6.9)).await;

    for movie_id in [1, 2] {
        store.add_like(1, movie_id).await;
        store.add_like(2, movie_id).await;
    }
    store.add_like(2, 5).await;
    store
}

async fn create_test_server() -> TestServer {
    let state = AppState::new(seeded_store().await, &RecommenderConfig::default());
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn item_ids(body: &serde_json::Value) -> Vec<i64> {
    body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server().await;
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server().await;
    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("trace-123"),
        )
        .await;

    assert_eq!(response.headers().get("x-request-id").unwrap(), "trace-123");
}

#[tokio::test]
async fn test_list_algorithms() {
    let server = create_test_server().await;
    let response = server.get("/api/v1/recommendations/algorithms").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["popularity"]["name"], "Popularity-Based");
    assert_eq!(body["collaborative"]["name"], "Collaborative Filtering");
    assert_eq!(body["content_based"]["name"], "Content-Based Filtering");
}

#[tokio::test]
async fn test_collaborative_recommendations() {
    let server = create_test_server().await;
    let response = server
        .get("/api/v1/users/1/recommendations")
        .add_query_param("algorithm", "collaborative")
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["algorithm_used"], "Collaborative Filtering");
    assert_eq!(item_ids(&body), vec![5]);
    assert_eq!(body["total"], 1);
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 20);
    assert_eq!(body["total_pages"], 1);
    assert_eq!(body["items"][0]["is_liked"], false);
}

#[tokio::test]
async fn test_content_based_prefers_liked_genre() {
    let server = create_test_server().await;
    let response = server
        .get("/api/v1/users/1/recommendations")
        .add_query_param("algorithm", "content_based")
        .add_query_param("page_size", 10)
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let ids = item_ids(&body);
    assert_eq!(body["algorithm_used"], "Content-Based Filtering");
    assert_eq!(ids[0], 3);
    assert!(!ids.contains(&1) && !ids.contains(&2));
}

#[tokio::test]
async fn test_popularity_flags_liked_movies() {
    let server = create_test_server().await;
    let response = server
        .get("/api/v1/users/1/recommendations")
        .add_query_param("algorithm", "popularity")
        .add_query_param("page_size", 2)
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(item_ids(&body), vec![1, 2]);
    assert_eq!(body["items"][0]["is_liked"], true);
    assert_eq!(body["total"], 5);
    assert_eq!(body["total_pages"], 3);
}

#[tokio::test]
async fn test_fallback_for_user_without_likes() {
    let server = create_test_server().await;

    let popular: serde_json::Value = server
        .get("/api/v1/users/3/recommendations")
        .add_query_param("algorithm", "popularity")
        .await
        .json();

    for algorithm in ["collaborative", "content_based"] {
        let body: serde_json::Value = server
            .get("/api/v1/users/3/recommendations")
            .add_query_param("algorithm", algorithm)
            .await
            .json();

        assert_eq!(item_ids(&body), item_ids(&popular));
        assert!(body["algorithm_used"]
            .as_str()
            .unwrap()
            .ends_with("(fallback to popularity)"));
    }
}

#[tokio::test]
async fn test_unknown_algorithm_uses_default() {
    let server = create_test_server().await;
    let response = server
        .get("/api/v1/users/1/recommendations")
        .add_query_param("algorithm", "matrix_factorization")
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["algorithm_used"], "Content-Based Filtering");
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let server = create_test_server().await;
    let response = server.get("/api/v1/users/99/recommendations").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("99"));
}

#[tokio::test]
async fn test_page_size_is_clamped() {
    let server = create_test_server().await;
    let response = server
        .get("/api/v1/users/3/recommendations")
        .add_query_param("algorithm", "popularity")
        .add_query_param("page", 0)
        .add_query_param("page_size", 1000)
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 100);
    assert_eq!(body["total_pages"], 1);
}
