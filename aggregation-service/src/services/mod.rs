pub mod database;
pub mod metrics;

pub use database::{MongoDb, MASSIVE_DATA_COLLECTION, USERS_COLLECTION};
pub use self::metrics::{get_metrics, init_metrics};
