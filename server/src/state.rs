use std::sync::Arc;

use crate::config::Config;
use crate::error::ServerError;
use crate::store::{MongoUserStore, UserStore};

/// The user store as decided at startup.
pub enum Storage {
    Ready(Arc<dyn UserStore>),
    Unavailable {
        reason: Box<str>,
    },
}

impl Storage {
    /// Builds the store once before the server accepts traffic.
    ///
    /// Missing configuration or a store that cannot be created leaves the
    /// server running with registration answering 503.
    pub async fn bootstrap(config: &Config) -> Self {
        let Some(uri) = config.mongodb_uri.as_deref() else {
            let reason = format!(
                "Missing required environment variables: {}",
                config.missing_required().join(", ")
            );

            log::error!("{}", reason);

            return Storage::Unavailable { reason: reason.into_boxed_str() };
        };

        match MongoUserStore::connect(uri, &config.mongodb_db).await {
            Ok(store) => {
                if let Err(err) = store.ensure_indexes().await {
                    log::warn!("could not prepare users collection yet, retrying on first write: {}", err);
                }

                log::info!("user store ready, database \"{}\"", config.mongodb_db);

                Storage::Ready(Arc::new(store))
            },
            Err(err) => {
                log::error!("failed to initialize user store {}", err);

                Storage::Unavailable { reason: err.to_string().into_boxed_str() }
            }
        }
    }

    pub fn ready(&self) -> Result<&Arc<dyn UserStore>, ServerError> {
        match self {
            Storage::Ready(store) => Ok(store),
            Storage::Unavailable { reason } => Err(ServerError::Unavailable(reason.clone())),
        }
    }
}

pub struct AppState {
    pub storage: Storage,
    pub environment: Box<str>,
    pub has_mongo_uri: bool,
    pub has_jwt_secret: bool,
}

impl AppState {
    pub fn new(storage: Storage, config: &Config) -> Self {
        AppState {
            storage,
            environment: config.environment.clone(),
            has_mongo_uri: config.mongodb_uri.is_some(),
            has_jwt_secret: config.jwt_secret.is_some(),
        }
    }
}
