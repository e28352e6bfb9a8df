use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use serde::Serialize;
use tokio::sync::OnceCell;
use uuid::Uuid;

use super::{NewUser, StoreError, UserRecord, UserStore};

pub const USERS_COLLECTION: &str = "users";

const DUPLICATE_KEY: i32 = 11000;
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: String,
    username: String,
    password: String,
    created_at: String,
}

impl From<&UserRecord> for UserDocument {
    fn from(record: &UserRecord) -> Self {
        UserDocument {
            id: record.id.to_string(),
            username: record.username.to_string(),
            password: record.password.to_string(),
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// MongoDB backed store.
///
/// The driver opens connections on first use and pools them. The unique
/// username index is created once; if the database is unreachable at startup
/// the next write tries again.
pub struct MongoUserStore {
    users: Collection<UserDocument>,
    indexed: OnceCell<()>,
}

impl MongoUserStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(uri).await
            .map_err(|err| {
                log::error!("failed parsing mongodb uri {:?}", err);

                StoreError::Unavailable("invalid MONGODB_URI".into())
            })?;

        if options.server_selection_timeout.is_none() {
            options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
        }

        let client = Client::with_options(options)
            .map_err(|err| {
                log::error!("failed creating mongodb client {:?}", err);

                StoreError::Unavailable("failed creating database client".into())
            })?;

        Ok(MongoUserStore {
            users: client.database(database).collection(USERS_COLLECTION),
            indexed: OnceCell::new(),
        })
    }

    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        self.indexed.get_or_try_init(|| async {
            let index = IndexModel::builder()
                .keys(doc! { "username": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build();

            self.users.create_index(index, None).await
                .map(|_| log::info!("unique username index ready"))
                .map_err(map_error)
        }).await?;

        Ok(())
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn create_user(&self, new_user: NewUser) -> Result<UserRecord, StoreError> {
        self.ensure_indexes().await?;

        let record = UserRecord::create(Uuid::new_v4(), new_user);

        self.users.insert_one(UserDocument::from(&record), None)
            .await
            .map_err(map_error)?;

        Ok(record)
    }
}

fn map_error(err: MongoError) -> StoreError {
    if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = err.kind.as_ref() {
        if write_error.code == DUPLICATE_KEY {
            return StoreError::DuplicateUsername;
        }
    }

    log::error!("mongodb operation failed {:?}", err);

    StoreError::Unavailable("database operation failed".into())
}
