pub mod aggregations;
pub mod pagination;

pub use aggregations::{
    ActiveFavorite, AgeBucket, AgeRangeResponse, AgeRanges, BucketMember, CompanyBalance,
    CompanyBalancePage, CompanyBalanceResponse, FriendNameCount, FruitAverageAge, GenderCount,
    ListResponse, TotalCount,
};
pub use pagination::{PaginationParams, DEFAULT_LIMIT, DEFAULT_PAGE};
