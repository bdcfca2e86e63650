//! Review service: guest reviews, moderation and owner replies.
//!
//! Filtering, searching and sorting run in memory over the hotel's reviews
//! so the list page and its tests share one code path.

use std::fmt;
use std::str::FromStr;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use time::OffsetDateTime;
use uuid::Uuid;

use super::paging::{Page, paginate};
use super::validate::non_blank;

/// Reviews per page on the dashboard.
pub const REVIEWS_PER_PAGE: usize = 5;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("review not found: {0}")]
    NotFound(Uuid),
    #[error("{0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl crate::error::ErrorCode for ReviewError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_REVIEW_NOT_FOUND",
            Self::Validation(_) => "E_VALIDATION",
            Self::Database(_) => "E_DATABASE",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Published,
    Pending,
    Rejected,
}

impl ReviewStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Pending => "pending",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "published" => Ok(Self::Published),
            "pending" => Ok(Self::Pending),
            "rejected" => Ok(Self::Rejected),
            other => Err(ReviewError::Validation(format!("unknown review status '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewSort {
    #[default]
    Newest,
    Oldest,
    Highest,
    Lowest,
}

#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub user_name: String,
    pub rating: i32,
    pub comment: String,
    pub helpful_count: i32,
    pub not_helpful_count: i32,
    pub status: ReviewStatus,
    pub reply: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub replied_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// List controls from the reviews page. `status: None` means all.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReviewQuery {
    pub status: Option<String>,
    pub q: Option<String>,
    pub sort: ReviewSort,
    pub page: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewFilter {
    pub status: Option<ReviewStatus>,
    pub search: Option<String>,
    pub sort: ReviewSort,
}

impl ReviewQuery {
    /// # Errors
    ///
    /// Returns `Validation` for an unknown status other than `all`.
    pub fn filter(&self) -> Result<ReviewFilter, ReviewError> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("" | "all") => None,
            Some(raw) => Some(raw.parse()?),
        };
        Ok(ReviewFilter {
            status,
            search: self.q.as_deref().and_then(non_blank).map(|q| q.to_lowercase()),
            sort: self.sort,
        })
    }
}

// =============================================================================
// FILTER / SORT
// =============================================================================

impl ReviewFilter {
    fn matches(&self, review: &Review) -> bool {
        if self.status.is_some_and(|s| s != review.status) {
            return false;
        }
        match &self.search {
            Some(needle) => {
                review.user_name.to_lowercase().contains(needle.as_str())
                    || review.comment.to_lowercase().contains(needle.as_str())
            }
            None => true,
        }
    }

    /// Keep matching reviews and order them. The sort is stable, so ties keep
    /// their fetched order.
    #[must_use]
    pub fn apply(&self, reviews: Vec<Review>) -> Vec<Review> {
        let mut kept: Vec<Review> = reviews.into_iter().filter(|r| self.matches(r)).collect();
        match self.sort {
            ReviewSort::Newest => kept.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            ReviewSort::Oldest => kept.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            ReviewSort::Highest => kept.sort_by(|a, b| b.rating.cmp(&a.rating)),
            ReviewSort::Lowest => kept.sort_by(|a, b| a.rating.cmp(&b.rating)),
        }
        kept
    }
}

// =============================================================================
// QUERIES
// =============================================================================

const REVIEW_COLUMNS: &str = "id, hotel_id, user_name, rating, comment, helpful_count, not_helpful_count, status, \
     reply, replied_at, created_at";

fn review_from_row(row: &PgRow) -> Result<Review, ReviewError> {
    let status: String = row.get("status");
    Ok(Review {
        id: row.get("id"),
        hotel_id: row.get("hotel_id"),
        user_name: row.get("user_name"),
        rating: row.get("rating"),
        comment: row.get("comment"),
        helpful_count: row.get("helpful_count"),
        not_helpful_count: row.get("not_helpful_count"),
        status: status.parse()?,
        reply: row.get("reply"),
        replied_at: row.get("replied_at"),
        created_at: row.get("created_at"),
    })
}

async fn fetch_reviews(pool: &PgPool, hotel_id: Uuid, published_only: bool) -> Result<Vec<Review>, ReviewError> {
    let rows = sqlx::query(&format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews
         WHERE hotel_id = $1 AND (NOT $2 OR status = 'published')
         ORDER BY created_at DESC"
    ))
    .bind(hotel_id)
    .bind(published_only)
    .fetch_all(pool)
    .await?;
    rows.iter().map(review_from_row).collect()
}

/// Filtered, sorted page of the hotel's reviews.
pub async fn list_reviews(pool: &PgPool, hotel_id: Uuid, query: &ReviewQuery) -> Result<Page<Review>, ReviewError> {
    let filter = query.filter()?;
    let reviews = fetch_reviews(pool, hotel_id, false).await?;
    Ok(paginate(filter.apply(reviews), query.page, REVIEWS_PER_PAGE))
}

/// Published reviews for the public page, newest first.
pub async fn list_published_reviews(pool: &PgPool, hotel_id: Uuid) -> Result<Vec<Review>, ReviewError> {
    fetch_reviews(pool, hotel_id, true).await
}

/// # Errors
///
/// Returns `NotFound` when the review is not the hotel's.
pub async fn set_status(
    pool: &PgPool,
    hotel_id: Uuid,
    review_id: Uuid,
    status: ReviewStatus,
) -> Result<Review, ReviewError> {
    let row = sqlx::query(&format!(
        "UPDATE reviews SET status = $3 WHERE id = $1 AND hotel_id = $2 RETURNING {REVIEW_COLUMNS}"
    ))
    .bind(review_id)
    .bind(hotel_id)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await?
    .ok_or(ReviewError::NotFound(review_id))?;
    tracing::info!(%hotel_id, %review_id, %status, "review moderated");
    review_from_row(&row)
}

/// Store the owner's reply and stamp it.
///
/// # Errors
///
/// Returns `Validation` for a blank reply and `NotFound` for a foreign review.
pub async fn reply(pool: &PgPool, hotel_id: Uuid, review_id: Uuid, text: &str) -> Result<Review, ReviewError> {
    let text = non_blank(text).ok_or_else(|| ReviewError::Validation("reply cannot be empty".into()))?;
    let row = sqlx::query(&format!(
        "UPDATE reviews SET reply = $3, replied_at = now()
         WHERE id = $1 AND hotel_id = $2
         RETURNING {REVIEW_COLUMNS}"
    ))
    .bind(review_id)
    .bind(hotel_id)
    .bind(text)
    .fetch_optional(pool)
    .await?
    .ok_or(ReviewError::NotFound(review_id))?;
    review_from_row(&row)
}

#[cfg(test)]
#[path = "review_test.rs"]
mod tests;
