use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::run_with_listener;

mod expenses;
mod products;
mod server;
mod suppliers;
mod user;

pub mod types {
    pub mod expense {
        pub use api_types::expense::{
            ExpenseNew, ExpenseUpdate, ExpenseView, ItemNew, ItemUpdate, ItemView,
        };
    }

    pub mod product {
        pub use api_types::product::ProductView;
    }

    pub mod supplier {
        pub use api_types::supplier::SupplierView;
    }

    pub use api_types::Created;
}

pub enum ServerError {
    Engine(EngineError),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_)
        | EngineError::ArrivalReverted(_)
        | EngineError::ItemAlreadyArrived(_)
        | EngineError::ExpenseReimbursed(_)
        | EngineError::ExpenseFullyArrived(_)
        | EngineError::ReimbursementReverted(_)
        | EngineError::ItemsPendingArrival(_)
        | EngineError::AmountManagedByItems(_) => StatusCode::CONFLICT,
        EngineError::InvalidAmount(_)
        | EngineError::InvalidId(_)
        | EngineError::InvalidName(_)
        | EngineError::ArrivalDateMissing(_)
        | EngineError::ArrivalDateWithoutArrival(_)
        | EngineError::PayerMissing(_)
        | EngineError::ReimbursedAtMissing(_)
        | EngineError::ReimbursedAtWithoutReimbursement(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let ServerError::Engine(err) = self;
        let (status, error) = (status_for_engine_error(&err), message_for_engine_error(err));

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::DbErr;

    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn lifecycle_violations_map_to_409() {
        for err in [
            EngineError::ItemAlreadyArrived("price".to_string()),
            EngineError::ExpenseReimbursed("quantity".to_string()),
            EngineError::ReimbursementReverted("x".to_string()),
        ] {
            let res = ServerError::from(err).into_response();
            assert_eq!(res.status(), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn engine_validation_maps_to_422() {
        let res = ServerError::from(EngineError::InvalidAmount("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let res =
            ServerError::from(EngineError::ArrivalDateMissing("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn database_errors_are_opaque() {
        let res = ServerError::from(EngineError::Database(DbErr::Custom("secret".to_string())))
            .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
