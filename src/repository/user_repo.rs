use crate::domain::interface::*;
use crate::domain::model::*;
use crate::error::*;
use crate::infra::DBConnector;
use crate::schema::users;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;

#[derive(Queryable, Insertable)]
#[diesel(table_name = users)]
pub struct UserRecord {
    id: String,
    name: String,
    username: String,
    email: String,
    created_at: NaiveDateTime,
}

impl UserRecord {
    pub fn to_model(self) -> User {
        User {
            id: UserID(self.id),
            name: self.name,
            username: self.username,
            email: self.email,
            created_at: DateTime::<Utc>::from_naive_utc_and_offset(self.created_at, Utc),
        }
    }

    pub fn from_model(user: User) -> Self {
        UserRecord {
            id: user.id.0,
            name: user.name,
            username: user.username,
            email: user.email,
            created_at: user.created_at.naive_utc(),
        }
    }
}

pub struct UserRepository {
    db: DBConnector,
}

impl UserRepository {
    pub fn new(db: DBConnector) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IUserRepository for UserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        match self
            .db
            .first::<UserRecord, _>(users::table.filter(users::username.eq(username.to_string())))
            .await
        {
            Ok(record) => Ok(Some(record.to_model())),
            Err(err) if err.is_error_of(RepositoryError::RecordNotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn find_summaries(&self, ids: Vec<UserID>) -> Result<Vec<UserSummary>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let ids: Vec<String> = ids.into_iter().map(String::from).collect();
        let records = self
            .db
            .load::<UserRecord, _>(users::table.filter(users::id.eq_any(ids)))
            .await?;
        Ok(records
            .into_iter()
            .map(|record| record.to_model().summary())
            .collect())
    }

    async fn save(&self, user: User) -> Result<()> {
        let record = UserRecord::from_model(user);
        self.db
            .execute(diesel::insert_into(users::table).values::<UserRecord>(record))
            .await?;
        Ok(())
    }
}
