use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};

/// `{ data, count }` envelope. `count` is always `data.len()`.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub count: usize,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        let count = data.len();
        Self { data, count }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenderCount {
    pub gender: Option<Bson>,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActiveFavorite {
    pub name: Option<Bson>,
    pub email: Option<Bson>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FruitAverageAge {
    pub favorite_fruit: Option<Bson>,
    pub average_age: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FriendNameCount {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BucketMember {
    pub name: Option<Bson>,
    pub age: Option<Bson>,
}

/// One `$bucket` row. `range` is the inclusive lower boundary, or the
/// default label for values outside the boundaries.
#[derive(Debug, Serialize, Deserialize)]
pub struct AgeBucket {
    pub range: Bson,
    pub count: i64,
    #[serde(default)]
    pub users: Vec<BucketMember>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AgeRanges {
    #[serde(default)]
    pub smaller: Vec<AgeBucket>,
    #[serde(default)]
    pub elder: Vec<AgeBucket>,
}

#[derive(Debug, Serialize)]
pub struct AgeRangeResponse {
    pub data: AgeRanges,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyBalance {
    pub company: Option<Bson>,
    pub total_balance: f64,
}

#[derive(Debug, Deserialize)]
pub struct TotalCount {
    pub total: i64,
}

/// Raw `$facet` output of the company balance pipeline.
#[derive(Debug, Default, Deserialize)]
pub struct CompanyBalancePage {
    #[serde(default)]
    pub data: Vec<CompanyBalance>,
    #[serde(default)]
    pub total: Vec<TotalCount>,
}

impl CompanyBalancePage {
    pub fn total(&self) -> u64 {
        self.total
            .first()
            .map(|t| t.total.max(0) as u64)
            .unwrap_or(0)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyBalanceResponse {
    pub data: Vec<CompanyBalance>,
    pub total: u64,
    pub current_page: u64,
    pub total_page: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, doc};
    use serde_json::json;

    #[test]
    fn test_list_response_count_matches_data() {
        let response = ListResponse::new(vec![1, 2, 3]);
        assert_eq!(response.count, 3);

        let empty: ListResponse<i32> = ListResponse::new(Vec::new());
        assert_eq!(serde_json::to_value(&empty).unwrap(), json!({ "data": [], "count": 0 }));
    }

    #[test]
    fn test_fruit_average_age_uses_camel_case() {
        let row: FruitAverageAge = bson::from_document(doc! {
            "favoriteFruit": "apple",
            "averageAge": 29.57,
        })
        .unwrap();
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            json!({ "favoriteFruit": "apple", "averageAge": 29.57 })
        );
    }

    #[test]
    fn test_gender_count_accepts_int32_counts() {
        let row: GenderCount = bson::from_document(doc! { "gender": "male", "count": 7_i32 }).unwrap();
        assert_eq!(row.count, 7);
        assert_eq!(row.gender, Some(Bson::String("male".to_string())));
    }

    #[test]
    fn test_non_string_fields_pass_through() {
        let gender: GenderCount = bson::from_document(doc! { "gender": 1, "count": 3 }).unwrap();
        assert_eq!(
            serde_json::to_value(&gender).unwrap(),
            json!({ "gender": 1, "count": 3 })
        );

        let favorite: ActiveFavorite =
            bson::from_document(doc! { "name": ["Ann", "Lee"], "email": false }).unwrap();
        assert_eq!(
            serde_json::to_value(&favorite).unwrap(),
            json!({ "name": ["Ann", "Lee"], "email": false })
        );

        let missing: ActiveFavorite = bson::from_document(doc! {}).unwrap();
        assert!(missing.name.is_none());
        assert!(missing.email.is_none());
    }

    #[test]
    fn test_age_ranges_decode_numeric_and_default_buckets() {
        let ranges: AgeRanges = bson::from_document(doc! {
            "smaller": [
                { "range": 25, "count": 1, "users": [{ "name": "Ann", "age": 27 }] },
                { "range": "30+", "count": 1, "users": [{ "name": "Bob", "age": 30 }] },
            ],
            "elder": [],
        })
        .unwrap();

        assert_eq!(ranges.smaller.len(), 2);
        assert_eq!(ranges.smaller[0].range, Bson::Int32(25));
        assert_eq!(ranges.smaller[1].range, Bson::String("30+".to_string()));
        assert!(ranges.elder.is_empty());
    }

    #[test]
    fn test_company_balance_page_total() {
        let page: CompanyBalancePage = bson::from_document(doc! {
            "data": [{ "company": "ACME", "totalBalance": 12.5 }],
            "total": [{ "total": 5 }],
        })
        .unwrap();
        assert_eq!(page.total(), 5);
        assert_eq!(page.data[0].company, Some(Bson::String("ACME".to_string())));

        let empty: CompanyBalancePage = bson::from_document(doc! {
            "data": [],
            "total": [],
        })
        .unwrap();
        assert_eq!(empty.total(), 0);
    }

    #[test]
    fn test_company_balance_response_shape() {
        let response = CompanyBalanceResponse {
            data: Vec::new(),
            total: 3,
            current_page: 1,
            total_page: 2,
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "data": [], "total": 3, "currentPage": 1, "totalPage": 2 })
        );
    }
}
