use crate::dtos::{
    ActiveFavorite, AgeRangeResponse, AgeRanges, CompanyBalancePage, CompanyBalanceResponse,
    FriendNameCount, FruitAverageAge, GenderCount, ListResponse, PaginationParams,
};
use crate::pipelines;
use crate::startup::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use mongodb::bson::{self, Document};
use service_core::error::AppError;

/// Every document of `users`, unfiltered.
pub async fn all_users(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let users: Vec<Document> = state
        .db
        .aggregate("all_users", &state.db.users(), pipelines::all_documents())
        .await?;

    tracing::debug!(count = users.len(), "Fetched users");

    Ok(Json(ListResponse::new(users)))
}

pub async fn active_by_gender(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let rows: Vec<GenderCount> = state
        .db
        .aggregate_as(
            "active_by_gender",
            &state.db.massive_data(),
            pipelines::active_by_gender(),
        )
        .await?;

    Ok(Json(ListResponse::new(rows)))
}

pub async fn active_favorite(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let rows: Vec<ActiveFavorite> = state
        .db
        .aggregate_as(
            "active_favorite",
            &state.db.massive_data(),
            pipelines::active_favorite(),
        )
        .await?;

    Ok(Json(ListResponse::new(rows)))
}

pub async fn favorite_average_age(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let rows: Vec<FruitAverageAge> = state
        .db
        .aggregate_as(
            "favorite_average_age",
            &state.db.massive_data(),
            pipelines::favorite_average_age(),
        )
        .await?;

    Ok(Json(ListResponse::new(rows)))
}

pub async fn unique_friend_names(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let rows: Vec<FriendNameCount> = state
        .db
        .aggregate_as(
            "unique_friend_names",
            &state.db.massive_data(),
            pipelines::unique_friend_names(),
        )
        .await?;

    Ok(Json(ListResponse::new(rows)))
}

pub async fn age_range_group(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    // $facet always yields exactly one document
    let ranges = state
        .db
        .aggregate(
            "age_range_group",
            &state.db.massive_data(),
            pipelines::age_range_group(),
        )
        .await?
        .into_iter()
        .next()
        .map(bson::from_document::<AgeRanges>)
        .transpose()?
        .unwrap_or_default();

    Ok(Json(AgeRangeResponse { data: ranges }))
}

pub async fn total_company_balance(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit();
    let page = params.page();

    let result = state
        .db
        .aggregate(
            "total_company_balance",
            &state.db.massive_data(),
            pipelines::total_company_balance(params.skip(), limit),
        )
        .await?
        .into_iter()
        .next()
        .map(bson::from_document::<CompanyBalancePage>)
        .transpose()?
        .unwrap_or_default();

    let total = result.total();

    tracing::debug!(limit, page, total, "Paginated company balances");

    Ok(Json(CompanyBalanceResponse {
        data: result.data,
        total,
        current_page: page,
        total_page: params.total_pages(total),
    }))
}
