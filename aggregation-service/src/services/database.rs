use crate::config::MongoConfig;
use futures::stream::TryStreamExt;
use metrics::{counter, histogram};
use mongodb::{
    bson::{self, doc, Document},
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client as MongoClient, Collection, Database,
};
use serde::de::DeserializeOwned;
use service_core::error::AppError;
use std::time::Instant;
use tracing::instrument;

pub const USERS_COLLECTION: &str = "users";
pub const MASSIVE_DATA_COLLECTION: &str = "massive-data";

/// Process-wide database handle. Clones share the driver's connection pool.
#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(config: &MongoConfig) -> Result<Self, AppError> {
        tracing::info!(uri = %config.uri, strict_api = config.strict_api, "Connecting to MongoDB");

        let mut options = ClientOptions::parse(&config.uri).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB URI {}: {}", config.uri, e);
            AppError::from(e)
        })?;

        let server_api = if config.strict_api {
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build()
        } else {
            ServerApi::builder().version(ServerApiVersion::V1).build()
        };
        options.server_api = Some(server_api);

        let client = MongoClient::with_options(options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client for {}: {}", config.uri, e);
            AppError::from(e)
        })?;
        let db = client.database(&config.database);
        tracing::info!(database = %config.database, "MongoDB client created");
        Ok(Self { client, db })
    }

    /// Runs `{ ping: 1 }` against `admin`.
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn users(&self) -> Collection<Document> {
        self.db.collection(USERS_COLLECTION)
    }

    pub fn massive_data(&self) -> Collection<Document> {
        self.db.collection(MASSIVE_DATA_COLLECTION)
    }

    /// Runs `pipeline` against `collection` and collects every row.
    #[instrument(skip(self, collection, pipeline), fields(collection = %collection.name()))]
    pub async fn aggregate(
        &self,
        operation: &'static str,
        collection: &Collection<Document>,
        pipeline: Vec<Document>,
    ) -> Result<Vec<Document>, AppError> {
        let start = Instant::now();
        let labels = [
            ("collection", collection.name().to_string()),
            ("operation", operation.to_string()),
        ];

        let result = async {
            let cursor = collection.aggregate(pipeline, None).await?;
            cursor.try_collect::<Vec<_>>().await
        }
        .await;

        histogram!("db_aggregation_duration_seconds", &labels)
            .record(start.elapsed().as_secs_f64());

        let rows = result.map_err(|e| {
            counter!("db_aggregation_errors_total", &labels).increment(1);
            tracing::error!(operation, error = %e, "Aggregation failed");
            AppError::from(e)
        })?;

        histogram!("db_aggregation_rows", &labels).record(rows.len() as f64);
        tracing::debug!(operation, rows = rows.len(), "Aggregation completed");

        Ok(rows)
    }

    /// Same as [`MongoDb::aggregate`], decoding each row into `T`.
    pub async fn aggregate_as<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        collection: &Collection<Document>,
        pipeline: Vec<Document>,
    ) -> Result<Vec<T>, AppError> {
        self.aggregate(operation, collection, pipeline)
            .await?
            .into_iter()
            .map(|row| bson::from_document(row).map_err(AppError::from))
            .collect()
    }

    /// Closes the client. Clones held elsewhere stop working afterwards.
    pub async fn shutdown(self) {
        tracing::info!("Closing MongoDB client");
        self.client.shutdown().await;
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}
