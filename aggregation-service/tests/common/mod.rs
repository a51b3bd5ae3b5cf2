//! Test helper module for aggregation-service integration tests.
//!
//! Each `TestApp` runs against its own throwaway MongoDB database.

#![allow(dead_code)]

use aggregation_service::config::{AggregationConfig, MongoConfig};
use aggregation_service::services::MongoDb;
use aggregation_service::startup::Application;
use mongodb::bson::{doc, Document};
use service_core::config::Config as CoreConfig;
use uuid::Uuid;

/// Get the MongoDB URI for testing from environment or use default.
pub fn get_test_mongodb_uri() -> String {
    std::env::var("TEST_MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string())
}

pub struct TestApp {
    pub http_address: String,
    pub http_port: u16,
    pub db: MongoDb,
    pub db_name: String,
}

impl TestApp {
    /// Spawn a new test application on a random port.
    pub async fn spawn() -> Self {
        let db_name = format!("aggregation_test_{}", Uuid::new_v4().simple());

        let config = AggregationConfig {
            common: CoreConfig { port: 0 },
            mongodb: MongoConfig {
                uri: get_test_mongodb_uri(),
                database: db_name.clone(),
                strict_api: true,
            },
            service_name: "aggregation-service".to_string(),
            log_level: "info".to_string(),
            otlp_endpoint: None,
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let http_port = app.port();
        let db = app.db().clone();
        let http_address = format!("http://127.0.0.1:{}", http_port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", http_address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            http_address,
            http_port,
            db,
            db_name,
        }
    }

    /// GET `path` and decode the JSON body, asserting a 2xx status.
    pub async fn get_json(&self, path: &str) -> serde_json::Value {
        let response = reqwest::Client::new()
            .get(format!("{}{}", self.http_address, path))
            .send()
            .await
            .expect("Failed to execute request");

        assert!(
            response.status().is_success(),
            "GET {} returned {}",
            path,
            response.status()
        );

        response.json().await.expect("Failed to parse JSON")
    }

    pub async fn seed_users(&self, docs: Vec<Document>) {
        self.db
            .users()
            .insert_many(docs, None)
            .await
            .expect("Failed to seed users");
    }

    pub async fn seed_massive_data(&self, docs: Vec<Document>) {
        self.db
            .massive_data()
            .insert_many(docs, None)
            .await
            .expect("Failed to seed massive-data");
    }

    /// Drop the per-test database.
    pub async fn cleanup(&self) {
        let _ = self.db.client().database(&self.db_name).drop(None).await;
    }
}

/// Five records exercising every aggregation endpoint.
pub fn sample_people() -> Vec<Document> {
    vec![
        doc! {
            "name": "Ann", "email": "ann@example.com", "isActive": true,
            "gender": "female", "favoriteFruit": "banana", "age": 22,
            "company": "ACME", "balance": "$1,000.50",
            "friends": [{ "name": "Wade" }, { "name": "Bob" }],
        },
        doc! {
            "name": "Ben", "email": "ben@example.com", "isActive": true,
            "gender": "male", "favoriteFruit": "apple", "age": 30,
            "company": "ACME", "balance": "$2,500.25",
            "friends": [{ "name": "wendy" }, { "name": "Wade" }],
        },
        doc! {
            "name": "Cara", "email": "cara@example.com", "isActive": false,
            "gender": "female", "favoriteFruit": "banana", "age": 41,
            "company": "GLOBEX", "balance": "$12,345.67",
            "friends": [{ "name": "Walter" }],
        },
        doc! {
            "name": "Dan", "email": "dan@example.com", "isActive": true,
            "gender": "male", "favoriteFruit": "strawberry", "age": 65,
            "company": "INITECH", "balance": "$300.00",
            "friends": [],
        },
        doc! {
            "name": "Eve", "email": "eve@example.com", "isActive": true,
            "gender": "female", "favoriteFruit": "apple", "age": 35,
            "company": "GLOBEX", "balance": "$99.99",
            "friends": [{ "name": "Xavier" }],
        },
    ]
}
