use crate::{page, photo, Harness};
use mockito::Matcher;
use photo_feed_client::application::events::Notification;
use photo_feed_client::application::services::{FeedService, LikeService, LikeServiceImpl, PageFetch};
use photo_feed_client::error::AppError;
use pretty_assertions::assert_eq;
use serde_json::json;

fn page_query(page: u32) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("page".into(), page.to_string()),
        Matcher::UrlEncoded("per_page".into(), "10".into()),
        Matcher::UrlEncoded("order_by".into(), "latest".into()),
    ])
}

#[tokio::test]
async fn test_pages_accumulate_and_cursor_advances() {
    let mut harness = Harness::new(Some("tok_1")).await;
    let first = harness
        .server
        .mock("GET", "/photos")
        .match_header("authorization", "Bearer tok_1")
        .match_query(page_query(1))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page(1, 10))
        .create_async()
        .await;
    let second = harness
        .server
        .mock("GET", "/photos")
        .match_query(page_query(2))
        .with_status(200)
        .with_body(page(2, 10))
        .create_async()
        .await;
    let mut events = harness.notifications.subscribe();

    let outcome = harness.feed.fetch_next_page().await.unwrap();
    assert_eq!(outcome, PageFetch::Loaded { page: 1, count: 10 });
    assert_eq!(harness.feed.photo_count(), 10);
    assert_eq!(harness.feed.last_loaded_page(), Some(1));
    assert_eq!(events.try_recv(), Some(Notification::FeedChanged));
    first.assert_async().await;

    let outcome = harness.feed.fetch_next_page().await.unwrap();
    assert_eq!(outcome, PageFetch::Loaded { page: 2, count: 10 });
    second.assert_async().await;

    let photos = harness.feed.photos();
    assert_eq!(photos.len(), 20);
    assert_eq!(photos[0].id, "page1_0");
    assert_eq!(photos[10].id, "page2_0");
    assert_eq!(photos[19].id, "page2_9");
    assert_eq!(photos[0].thumb_image_url, "https://images.example.com/page1_0?thumb");
    assert_eq!(photos[0].large_image_url, "https://images.example.com/page1_0?full");
    assert_eq!(photos[0].welcome_description.as_deref(), Some("Harbour at dawn"));
    assert!(photos[0].created_at.is_some());
}

#[tokio::test]
async fn test_failed_page_is_retried_with_same_number() {
    let mut harness = Harness::new(Some("tok_1")).await;
    let failing = harness
        .server
        .mock("GET", "/photos")
        .match_query(page_query(1))
        .with_status(503)
        .expect(1)
        .create_async()
        .await;

    let result = harness.feed.fetch_next_page().await;
    let err = result.unwrap_err();
    assert!(matches!(err, AppError::HttpStatus(503)));
    assert!(err.is_retryable());
    assert_eq!(harness.feed.photo_count(), 0);
    assert_eq!(harness.feed.last_loaded_page(), None);
    assert!(!harness.feed.is_loading());
    failing.assert_async().await;
    failing.remove_async().await;

    let recovered = harness
        .server
        .mock("GET", "/photos")
        .match_query(page_query(1))
        .with_status(200)
        .with_body(page(1, 3))
        .create_async()
        .await;

    let outcome = harness.feed.fetch_next_page().await.unwrap();
    assert_eq!(outcome, PageFetch::Loaded { page: 1, count: 3 });
    recovered.assert_async().await;
}

#[tokio::test]
async fn test_server_liked_state_wins() {
    let mut harness = Harness::new(Some("tok_1")).await;
    let _photos = harness
        .server
        .mock("GET", "/photos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(page(1, 10))
        .create_async()
        .await;
    let like = harness
        .server
        .mock("POST", "/photos/page1_4/like")
        .match_header("authorization", "Bearer tok_1")
        .with_status(201)
        .with_body(json!({ "photo": photo("page1_4", false) }).to_string())
        .create_async()
        .await;
    harness.feed.fetch_next_page().await.unwrap();

    let likes = LikeServiceImpl::new(
        harness.config.clone(),
        harness.client.clone(),
        harness.token_store.clone(),
        harness.feed.clone(),
    );
    let liked = likes.change_like("page1_4", true).await.unwrap();

    assert!(!liked);
    assert!(!harness.feed.photos()[4].is_liked);
    like.assert_async().await;
}

#[tokio::test]
async fn test_unlike_updates_feed_in_place() {
    let mut harness = Harness::new(Some("tok_1")).await;
    let _photos = harness
        .server
        .mock("GET", "/photos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!([photo("a", false), photo("b", true), photo("c", false)]).to_string(),
        )
        .create_async()
        .await;
    let unlike = harness
        .server
        .mock("DELETE", "/photos/b/like")
        .with_status(200)
        .with_body(json!({ "photo": photo("b", false) }).to_string())
        .create_async()
        .await;
    harness.feed.fetch_next_page().await.unwrap();
    let mut events = harness.notifications.subscribe();

    let likes = LikeServiceImpl::new(
        harness.config.clone(),
        harness.client.clone(),
        harness.token_store.clone(),
        harness.feed.clone(),
    );
    let liked = likes.change_like("b", false).await.unwrap();

    assert!(!liked);
    let flags: Vec<bool> = harness.feed.photos().iter().map(|p| p.is_liked).collect();
    assert_eq!(flags, vec![false, false, false]);
    assert_eq!(harness.feed.photo_count(), 3);
    assert_eq!(events.try_recv(), Some(Notification::FeedChanged));
    unlike.assert_async().await;
}
