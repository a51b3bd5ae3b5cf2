pub mod health;
pub mod users;

pub use health::{health_check, metrics_handler, not_found, readiness_check};
pub use users::{
    active_by_gender, active_favorite, age_range_group, all_users, favorite_average_age,
    total_company_balance, unique_friend_names,
};
