use axum::{extract::State, Json};

use menu_core::services::MenuBrowser;

use crate::dto::CategoriesResponse;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CategoriesResponse>>, ApiError> {
    let items = state.lifecycle.list().await?;
    let catalog = state.lifecycle.catalog();
    Ok(Json(ApiResponse::success(CategoriesResponse {
        categories: catalog.labels().to_vec(),
        filters: catalog.filter_options(),
        in_use: MenuBrowser::categories_present(&items),
    })))
}
