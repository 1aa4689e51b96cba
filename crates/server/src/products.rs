//! Product API endpoints

use api_types::product::ProductView;
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductView>, ServerError> {
    let product = state.engine.product(&user.store_id, id).await?;
    Ok(Json(ProductView {
        id: product.id,
        name: product.name,
        stock: product.stock,
    }))
}
