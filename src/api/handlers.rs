use super::ApiState;
use crate::domain::model::*;
use crate::domain::service::*;
use crate::error::*;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::*;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    page: Option<i64>,
    limit: Option<i64>,
}

impl PageQuery {
    fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.limit)
    }
}

#[derive(Debug, Deserialize)]
pub struct ListUserQuery {
    id: String,
    page: Option<i64>,
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTweetRequest {
    content: String,
    user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    comment: String,
    tweet_id: String,
    user_id: String,
}

// `like` may be sent as well, it carries no meaning
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    tweet_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    tweet_id: String,
    user_id: String,
}

fn bad_query(rejection: QueryRejection) -> ServiceError {
    GeneralError::invalid_payload(rejection.body_text())
}

fn bad_json(rejection: JsonRejection) -> ServiceError {
    GeneralError::invalid_payload(rejection.body_text())
}

pub async fn list(
    State(state): State<ApiState>,
    query: std::result::Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<TweetList>> {
    let Query(query) = query.map_err(bad_query)?;
    Ok(Json(state.tweet.list(query.pagination()).await?))
}

pub async fn user_tweets(
    State(state): State<ApiState>,
    Path(username): Path<String>,
    query: std::result::Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<UserTweets>> {
    let Query(query) = query.map_err(bad_query)?;
    Ok(Json(
        state
            .tweet
            .user_tweets(&username, query.pagination())
            .await?,
    ))
}

pub async fn list_by_user(
    State(state): State<ApiState>,
    query: std::result::Result<Query<ListUserQuery>, QueryRejection>,
) -> Result<Json<TweetList>> {
    let Query(query) = query.map_err(bad_query)?;
    let user = UserID::parse(query.id)
        .map_err(|_| GeneralError::invalid_payload("\"id\" is required"))?;
    let pagination = Pagination::new(query.page, query.limit);
    Ok(Json(state.tweet.list_by_user(user, pagination).await?))
}

/// Failures here answer `{tweet: "..."}` rather than the usual `{message}`.
pub async fn get_one(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    match state.tweet.get_one(&TweetID(id)).await {
        Ok(envelope) => Json(envelope).into_response(),
        Err(err) => (
            err.status_code(),
            Json(json!({ "tweet": err.message().unwrap_or(TWEET_NOT_FOUND) })),
        )
            .into_response(),
    }
}

pub async fn create(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<CreateTweetRequest>, JsonRejection>,
) -> Result<Json<Tweet>> {
    let Json(payload) = payload.map_err(bad_json)?;
    let tweet = state
        .tweet
        .create(payload.content, UserID(payload.user_id))
        .await?;
    Ok(Json(tweet))
}

pub async fn comment(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<CommentRequest>, JsonRejection>,
) -> Result<Json<CommentAdded>> {
    let Json(payload) = payload.map_err(bad_json)?;
    let added = state
        .tweet
        .comment(
            &TweetID(payload.tweet_id),
            payload.comment,
            UserID(payload.user_id),
        )
        .await?;
    Ok(Json(added))
}

pub async fn like(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<LikeRequest>, JsonRejection>,
) -> Result<Json<Ack>> {
    let Json(payload) = payload.map_err(bad_json)?;
    Ok(Json(state.tweet.like(&TweetID(payload.tweet_id)).await?))
}

pub async fn destroy(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Json<Deleted>> {
    let Json(payload) = payload.map_err(bad_json)?;
    let deleted = state
        .tweet
        .delete(&TweetID(payload.tweet_id), &UserID(payload.user_id))
        .await?;
    Ok(Json(deleted))
}

pub async fn external(
    State(state): State<ApiState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<ExternalTweetView>>> {
    Ok(Json(state.tweet.external_tweets(&username).await?))
}
