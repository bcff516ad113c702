use crate::domain::interface::*;
use crate::domain::model::*;
use crate::error::*;
use crate::infra::DBConnector;
use crate::schema::{tweet_comments, tweets};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::dsl::*;
use diesel::prelude::*;
use std::collections::HashMap;

#[derive(Queryable)]
pub struct TweetRecord {
    #[allow(dead_code)]
    seq: i32,
    id: String,
    content: String,
    user_id: String,
    likes: i64,
    created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = tweets)]
pub struct NewTweetRecord {
    id: String,
    content: String,
    user_id: String,
    likes: i64,
    created_at: NaiveDateTime,
}

#[derive(Queryable)]
pub struct CommentRecord {
    #[allow(dead_code)]
    seq: i32,
    tweet_id: String,
    comment: String,
    user_id: String,
}

#[derive(Insertable)]
#[diesel(table_name = tweet_comments)]
pub struct NewCommentRecord {
    tweet_id: String,
    comment: String,
    user_id: String,
}

impl TweetRecord {
    pub fn to_model(self, comments: Vec<Comment>) -> Tweet {
        Tweet {
            id: TweetID(self.id),
            content: self.content,
            user: UserID(self.user_id),
            comments,
            likes: self.likes,
            created_at: DateTime::<Utc>::from_naive_utc_and_offset(self.created_at, Utc),
        }
    }
}

impl NewTweetRecord {
    pub fn from_model(tweet: Tweet) -> Self {
        NewTweetRecord {
            id: tweet.id.0,
            content: tweet.content,
            user_id: tweet.user.0,
            likes: tweet.likes,
            created_at: tweet.created_at.naive_utc(),
        }
    }
}

impl CommentRecord {
    pub fn to_model(self) -> Comment {
        Comment {
            comment: self.comment,
            user: UserID(self.user_id),
        }
    }
}

pub struct TweetRepository {
    db: DBConnector,
}

impl TweetRepository {
    pub fn new(db: DBConnector) -> Self {
        Self { db }
    }

    async fn attach_comments(&self, records: Vec<TweetRecord>) -> Result<Vec<Tweet>> {
        if records.is_empty() {
            return Ok(vec![]);
        }
        let ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
        let comments = self
            .db
            .load::<CommentRecord, _>(
                tweet_comments::table
                    .filter(tweet_comments::tweet_id.eq_any(ids))
                    .order(tweet_comments::seq.asc()),
            )
            .await?;

        let mut by_tweet: HashMap<String, Vec<Comment>> = HashMap::new();
        for record in comments {
            by_tweet
                .entry(record.tweet_id.clone())
                .or_default()
                .push(record.to_model());
        }

        Ok(records
            .into_iter()
            .map(|record| {
                let comments = by_tweet.remove(&record.id).unwrap_or_default();
                record.to_model(comments)
            })
            .collect())
    }
}

#[async_trait]
impl ITweetRepository for TweetRepository {
    async fn find_page(&self, filter: &TweetFilter, pagination: &Pagination) -> Result<Vec<Tweet>> {
        let page = tweets::table
            .order((tweets::created_at.desc(), tweets::seq.asc()))
            .limit(pagination.limit())
            .offset(pagination.skip());

        let records = match filter {
            TweetFilter::All => self.db.load::<TweetRecord, _>(page).await?,
            TweetFilter::ByUser(user) => {
                self.db
                    .load::<TweetRecord, _>(page.filter(tweets::user_id.eq(user.0.clone())))
                    .await?
            }
        };
        self.attach_comments(records).await
    }

    async fn count(&self) -> Result<i64> {
        self.db.first::<i64, _>(tweets::table.count()).await
    }

    async fn find_by_id(&self, id: &TweetID) -> Result<Tweet> {
        let record = self
            .db
            .first::<TweetRecord, _>(tweets::table.filter(tweets::id.eq(id.0.clone())))
            .await?;
        let mut tweets = self.attach_comments(vec![record]).await?;
        tweets
            .pop()
            .ok_or_else(|| ServiceError::only(RepositoryError::RecordNotFound))
    }

    async fn create(&self, tweet: Tweet) -> Result<()> {
        let record = NewTweetRecord::from_model(tweet);
        self.db
            .execute(insert_into(tweets::table).values::<NewTweetRecord>(record))
            .await?;
        Ok(())
    }

    async fn append_comment(&self, id: &TweetID, comment: Comment) -> Result<UpdateOutcome> {
        let record = NewCommentRecord {
            tweet_id: id.0.clone(),
            comment: comment.comment,
            user_id: comment.user.0,
        };

        self.db
            .transaction(move |conn| {
                let found: bool =
                    select(exists(tweets::table.filter(tweets::id.eq(&record.tweet_id))))
                        .get_result(conn)?;
                if !found {
                    return Ok(UpdateOutcome::Unmatched);
                }

                // the unique index turns an exact duplicate into a no-op
                let inserted = insert_or_ignore_into(tweet_comments::table)
                    .values(&record)
                    .execute(conn)?;
                Ok(if inserted == 0 {
                    UpdateOutcome::Unchanged
                } else {
                    UpdateOutcome::Modified
                })
            })
            .await
    }

    async fn increment_likes(&self, id: &TweetID) -> Result<UpdateOutcome> {
        let updated = self
            .db
            .execute(
                update(tweets::table.filter(tweets::id.eq(id.0.clone())))
                    .set(tweets::likes.eq(tweets::likes + 1)),
            )
            .await?;
        Ok(if updated == 0 {
            UpdateOutcome::Unmatched
        } else {
            UpdateOutcome::Modified
        })
    }

    async fn delete_owned(&self, id: &TweetID, owner: &UserID) -> Result<Option<Tweet>> {
        let (id, owner) = (id.0.clone(), owner.0.clone());

        let removed = self
            .db
            .transaction(move |conn| {
                let owned = tweets::table
                    .filter(tweets::id.eq(&id))
                    .filter(tweets::user_id.eq(&owner));
                let record = owned.clone().first::<TweetRecord>(conn).optional()?;
                let record = match record {
                    Some(record) => record,
                    None => return Ok(None),
                };
                let comments = tweet_comments::table
                    .filter(tweet_comments::tweet_id.eq(&id))
                    .order(tweet_comments::seq.asc())
                    .load::<CommentRecord>(conn)?;

                // comments go with it through ON DELETE CASCADE
                delete(owned).execute(conn)?;
                Ok(Some((record, comments)))
            })
            .await?;

        Ok(removed.map(|(record, comments)| {
            record.to_model(comments.into_iter().map(CommentRecord::to_model).collect())
        }))
    }
}
