//! Aggregation pipelines served by the HTTP endpoints.
//!
//! Every function here is pure: it only builds the stages. Execution lives in
//! [`crate::services::MongoDb`].

use mongodb::bson::{doc, Document};

/// Fruit matched by `/active-favorite`.
pub const FAVORITE_FRUIT: &str = "banana";

/// Friend names counted by `/unique-friend-names` start with this (any case).
pub const FRIEND_NAME_PREFIX: &str = "W";

/// Ages at or below this go to the `smaller` cohort, above it to `elder`.
pub const COHORT_SPLIT_AGE: i32 = 30;

pub const YOUNGER_BOUNDARIES: [i32; 7] = [0, 5, 10, 15, 20, 25, 30];
pub const ELDER_BOUNDARIES: [i32; 7] = [31, 35, 40, 45, 50, 55, 60];

/// Catch-all bucket labels. `$bucket` upper bounds are exclusive, so age 30
/// lands in `"30+"` and ages of 60 and over land in `"60+"`.
pub const YOUNGER_DEFAULT_BUCKET: &str = "30+";
pub const ELDER_DEFAULT_BUCKET: &str = "60+";

pub fn all_documents() -> Vec<Document> {
    Vec::new()
}

pub fn active_by_gender() -> Vec<Document> {
    vec![
        doc! { "$match": { "isActive": true } },
        doc! { "$group": { "_id": "$gender", "count": { "$sum": 1 } } },
        doc! { "$project": { "_id": 0, "gender": "$_id", "count": 1 } },
        doc! { "$sort": { "gender": -1 } },
    ]
}

pub fn active_favorite() -> Vec<Document> {
    vec![
        doc! { "$match": { "isActive": true, "favoriteFruit": FAVORITE_FRUIT } },
        doc! { "$project": { "_id": 0, "name": 1, "email": 1 } },
    ]
}

pub fn favorite_average_age() -> Vec<Document> {
    vec![
        doc! { "$group": { "_id": "$favoriteFruit", "averageAge": { "$avg": "$age" } } },
        doc! {
            "$project": {
                "_id": 0,
                "favoriteFruit": "$_id",
                "averageAge": { "$round": ["$averageAge", 2] },
            }
        },
        doc! { "$sort": { "averageAge": -1 } },
    ]
}

pub fn unique_friend_names() -> Vec<Document> {
    vec![
        doc! { "$unwind": "$friends" },
        doc! {
            "$match": {
                "friends.name": {
                    "$regex": format!("^{}", FRIEND_NAME_PREFIX),
                    "$options": "i",
                }
            }
        },
        doc! { "$group": { "_id": "$friends.name", "count": { "$sum": 1 } } },
        doc! { "$project": { "_id": 0, "name": "$_id", "count": 1 } },
        doc! { "$sort": { "count": -1 } },
    ]
}

fn age_bucket_stages(cohort_filter: Document, boundaries: &[i32], default: &str) -> Vec<Document> {
    vec![
        doc! { "$match": { "age": cohort_filter } },
        doc! {
            "$bucket": {
                "groupBy": "$age",
                "boundaries": boundaries.to_vec(),
                "default": default,
                "output": {
                    "count": { "$sum": 1 },
                    "users": { "$push": { "name": "$name", "age": "$age" } },
                },
            }
        },
        doc! { "$project": { "_id": 0, "range": "$_id", "count": 1, "users": 1 } },
    ]
}

pub fn age_range_group() -> Vec<Document> {
    vec![doc! {
        "$facet": {
            "smaller": age_bucket_stages(
                doc! { "$lte": COHORT_SPLIT_AGE },
                &YOUNGER_BOUNDARIES,
                YOUNGER_DEFAULT_BUCKET,
            ),
            "elder": age_bucket_stages(
                doc! { "$gt": COHORT_SPLIT_AGE },
                &ELDER_BOUNDARIES,
                ELDER_DEFAULT_BUCKET,
            ),
        }
    }]
}

/// Strips `$` and `,` from `balance` and converts the rest to a double.
///
/// `$` has to go through `$literal`, a bare `"$"` would be read as a field path.
fn numeric_balance() -> Document {
    doc! {
        "$toDouble": {
            "$replaceAll": {
                "input": {
                    "$replaceAll": {
                        "input": "$balance",
                        "find": { "$literal": "$" },
                        "replacement": "",
                    }
                },
                "find": ",",
                "replacement": "",
            }
        }
    }
}

/// `skip` and `limit` beyond `i64::MAX` are clamped to it.
pub fn total_company_balance(skip: u64, limit: u64) -> Vec<Document> {
    let skip = i64::try_from(skip).unwrap_or(i64::MAX);
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    vec![
        doc! { "$project": { "_id": 0, "company": 1, "balance": numeric_balance() } },
        doc! { "$group": { "_id": "$company", "totalBalance": { "$sum": "$balance" } } },
        doc! { "$project": { "_id": 0, "company": "$_id", "totalBalance": 1 } },
        doc! { "$sort": { "totalBalance": -1, "company": 1 } },
        doc! {
            "$facet": {
                "data": [
                    { "$skip": skip },
                    { "$limit": limit },
                ],
                "total": [{ "$count": "total" }],
            }
        },
    ]
}
