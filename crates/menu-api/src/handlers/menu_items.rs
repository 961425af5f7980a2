// ============================================================================
// Menu API - Menu Item Handlers
// File: crates/menu-api/src/handlers/menu_items.rs
// ============================================================================

use std::future::Future;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::{debug, info};

use menu_core::domain::{AuthUser, CategoryFilter, ImageUpload, MenuItem, MenuItemFields};
use menu_core::error::DomainError;
use menu_core::services::{CategoryGroup, MenuBrowser};
use menu_shared::utils::mask_email;

use crate::dto::{DeleteQuery, ListQuery};
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Multipart body of create/update requests.
struct MenuItemForm {
    fields: MenuItemFields,
    image: Option<ImageUpload>,
    existing_image_path: String,
}

async fn read_form(mut multipart: Multipart) -> Result<MenuItemForm, ApiError> {
    let mut name = String::new();
    let mut price = String::new();
    let mut category = String::new();
    let mut existing_image_path = String::new();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read field: {}", e)))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "image" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read image: {}", e)))?;
                // Browsers send an empty part when no file was picked
                if !(filename.is_empty() && bytes.is_empty()) {
                    image = Some(ImageUpload::new(filename, bytes));
                }
            }
            "name" | "price" | "category" | "existing_image_path" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid {}: {}", field_name, e)))?;
                match field_name.as_str() {
                    "name" => name = text,
                    "price" => price = text,
                    "category" => category = text,
                    _ => existing_image_path = text,
                }
            }
            other => debug!("Ignoring form field '{}'", other),
        }
    }

    Ok(MenuItemForm {
        fields: MenuItemFields::new(name, price, category),
        image,
        existing_image_path,
    })
}

fn log_progress(percent: f64) {
    debug!("Image upload at {:.0}%", percent);
}

/// Runs a mutation on its own task. A dropped connection drops only the
/// wait, never the workflow between its store calls.
async fn run_detached<T, Fut>(operation: Fut) -> Result<T, ApiError>
where
    T: Send + 'static,
    Fut: Future<Output = Result<T, DomainError>> + Send + 'static,
{
    tokio::spawn(operation)
        .await
        .map_err(|e| ApiError::InternalError(format!("Menu item task failed: {}", e)))?
        .map_err(ApiError::from)
}

/// GET /api/v1/menu-items?category=
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<MenuItem>>>, ApiError> {
    let filter = CategoryFilter::from_label(query.category.as_deref());
    let items = state.lifecycle.list_filtered(&filter).await?;
    debug!("Listed {} items for filter '{}'", items.len(), filter);
    Ok(Json(ApiResponse::success(items)))
}

/// GET /api/v1/menu-items/grouped
pub async fn grouped_items(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CategoryGroup>>>, ApiError> {
    let items = state.lifecycle.list().await?;
    let groups = MenuBrowser::group_by_category(&items, state.lifecycle.catalog());
    Ok(Json(ApiResponse::success(groups)))
}

/// POST /api/v1/admin/menu-items
pub async fn create_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<MenuItem>>), ApiError> {
    let form = read_form(multipart).await?;
    info!("Create requested by {}", mask_email(&user.email));

    let lifecycle = state.lifecycle.clone();
    let item = run_detached(async move {
        lifecycle
            .create(form.fields, form.image, log_progress)
            .await
    })
    .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(item))))
}

/// PUT /api/v1/admin/menu-items/{id}
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<MenuItem>>, ApiError> {
    let form = read_form(multipart).await?;
    info!("Update of {} requested by {}", id, mask_email(&user.email));

    let lifecycle = state.lifecycle.clone();
    let item = run_detached(async move {
        lifecycle
            .update(
                &id,
                form.fields,
                form.image,
                &form.existing_image_path,
                log_progress,
            )
            .await
    })
    .await?;
    Ok(Json(ApiResponse::success(item)))
}

/// DELETE /api/v1/admin/menu-items/{id}?image_path=
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    info!("Delete of {} requested by {}", id, mask_email(&user.email));
    let lifecycle = state.lifecycle.clone();
    run_detached(async move { lifecycle.delete(&id, &query.image_path).await }).await?;
    Ok(Json(ApiResponse::success(())))
}
