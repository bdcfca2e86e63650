use super::*;
#[cfg(feature = "live-db-tests")]
use crate::db::live;
use time::Duration;

fn review(user_name: &str, rating: i32, comment: &str, status: ReviewStatus, age_days: i64) -> Review {
    Review {
        id: Uuid::new_v4(),
        hotel_id: Uuid::nil(),
        user_name: user_name.into(),
        rating,
        comment: comment.into(),
        helpful_count: 0,
        not_helpful_count: 0,
        status,
        reply: None,
        replied_at: None,
        created_at: OffsetDateTime::UNIX_EPOCH + Duration::days(1000 - age_days),
    }
}

fn sample() -> Vec<Review> {
    vec![
        review("Ana", 5, "Lovely breakfast", ReviewStatus::Published, 1),
        review("Ben", 2, "Noisy street", ReviewStatus::Pending, 3),
        review("Cara", 4, "Great pool", ReviewStatus::Published, 2),
        review("Dev", 2, "breakfast was cold", ReviewStatus::Rejected, 4),
    ]
}

fn users(reviews: &[Review]) -> Vec<&str> {
    reviews.iter().map(|r| r.user_name.as_str()).collect()
}

// =============================================================================
// ReviewQuery::filter
// =============================================================================

#[test]
fn all_and_blank_status_mean_no_filter() {
    let query = ReviewQuery { status: Some("all".into()), q: Some("  ".into()), ..ReviewQuery::default() };
    let filter = query.filter().unwrap();
    assert_eq!(filter.status, None);
    assert_eq!(filter.search, None);
}

#[test]
fn unknown_status_is_rejected() {
    let query = ReviewQuery { status: Some("hidden".into()), ..ReviewQuery::default() };
    assert!(matches!(query.filter(), Err(ReviewError::Validation(_))));
}

// =============================================================================
// ReviewFilter::apply
// =============================================================================

#[test]
fn default_sort_is_newest_first() {
    let out = ReviewFilter::default().apply(sample());
    assert_eq!(users(&out), vec!["Ana", "Cara", "Ben", "Dev"]);
}

#[test]
fn status_filter_keeps_matching_only() {
    let filter = ReviewFilter { status: Some(ReviewStatus::Published), ..ReviewFilter::default() };
    assert_eq!(users(&filter.apply(sample())), vec!["Ana", "Cara"]);
}

#[test]
fn search_matches_name_or_comment_case_insensitively() {
    let filter = ReviewFilter { search: Some("breakfast".into()), sort: ReviewSort::Oldest, ..ReviewFilter::default() };
    assert_eq!(users(&filter.apply(sample())), vec!["Dev", "Ana"]);

    let by_name = ReviewQuery { q: Some("CARA".into()), ..ReviewQuery::default() }.filter().unwrap();
    assert_eq!(users(&by_name.apply(sample())), vec!["Cara"]);
}

#[test]
fn rating_sorts_are_stable() {
    let lowest = ReviewFilter { sort: ReviewSort::Lowest, ..ReviewFilter::default() };
    // Ben and Dev tie at 2 and keep their input order.
    assert_eq!(users(&lowest.apply(sample())), vec!["Ben", "Dev", "Cara", "Ana"]);

    let highest = ReviewFilter { sort: ReviewSort::Highest, ..ReviewFilter::default() };
    assert_eq!(users(&highest.apply(sample())), vec!["Ana", "Cara", "Ben", "Dev"]);
}

#[test]
fn filtered_results_page_by_five() {
    let many: Vec<Review> = (0..7).map(|i| review("Guest", 3, "ok", ReviewStatus::Published, i)).collect();
    let page = paginate(ReviewFilter::default().apply(many), Some(2), REVIEWS_PER_PAGE);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_pages, 2);
}

#[test]
fn sort_deserializes_lowercase() {
    let query: ReviewQuery = serde_json::from_str(r#"{"sort":"highest","page":2}"#).unwrap();
    assert_eq!(query.sort, ReviewSort::Highest);
    assert_eq!(query.page, Some(2));
}

// =============================================================================
// live database
// =============================================================================

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn moderation_and_reply_round_trip() {
    let pool = live::integration_pool().await;
    let (_, hotel_id) = live::seed_hotel(&pool, "Review Hotel").await;
    let review_id: Uuid = sqlx::query_scalar(
        "INSERT INTO reviews (hotel_id, user_name, rating, comment) VALUES ($1, 'Ana', 5, 'Great') RETURNING id",
    )
    .bind(hotel_id)
    .fetch_one(&pool)
    .await
    .unwrap();

    assert!(list_published_reviews(&pool, hotel_id).await.unwrap().is_empty());

    let published = set_status(&pool, hotel_id, review_id, ReviewStatus::Published).await.unwrap();
    assert_eq!(published.status, ReviewStatus::Published);

    let replied = reply(&pool, hotel_id, review_id, " Thank you! ").await.unwrap();
    assert_eq!(replied.reply.as_deref(), Some("Thank you!"));
    assert!(replied.replied_at.is_some());

    assert!(matches!(reply(&pool, hotel_id, review_id, " ").await, Err(ReviewError::Validation(_))));
    assert_eq!(list_published_reviews(&pool, hotel_id).await.unwrap().len(), 1);
}
