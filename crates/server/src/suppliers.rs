//! Supplier API endpoints

use api_types::supplier::SupplierView;
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
) -> Result<Json<SupplierView>, ServerError> {
    let supplier = state.engine.supplier(&user.store_id, id).await?;
    Ok(Json(SupplierView {
        id: supplier.id,
        name: supplier.name,
    }))
}
