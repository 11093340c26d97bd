use uuid::Uuid;

use crate::{
    db::models::api::error_codes,
    db::models::{ShiftType, ShiftTypeChanges},
    db::store::{Store, StoreError},
    error::{AppError, AppResult},
    routes::shift_types::ShiftTypeRequest,
    services::authz::{self, Action},
    services::context::RequestContext,
    validation::shift_type::validate_shift_type,
};

pub struct ShiftTypesService;

impl ShiftTypesService {
    pub async fn list(store: &dyn Store) -> AppResult<Vec<ShiftType>> {
        Ok(store.list_shift_types().await?)
    }

    pub async fn create(
        store: &dyn Store,
        ctx: &RequestContext,
        req: &ShiftTypeRequest,
    ) -> AppResult<ShiftType> {
        authz::require(ctx, Action::ManageShiftTypes)?;
        validate_shift_type(
            &req.code,
            &req.label,
            &req.color,
            &req.default_start_time,
            &req.default_end_time,
        )?;

        let shift_type = ShiftType {
            id: Uuid::new_v4(),
            code: req.code.trim().to_string(),
            label: req.label.trim().to_string(),
            color: req.color.clone(),
            default_start_time: req.default_start_time.clone(),
            default_end_time: req.default_end_time.clone(),
            crosses_midnight: req.crosses_midnight,
        };

        let created = store
            .create_shift_type(shift_type)
            .await
            .map_err(code_conflict)?;
        tracing::info!(shift_type_id = %created.id, code = %created.code, "shift type created");
        Ok(created)
    }

    /// Full replacement of the type's definition.
    pub async fn update(
        store: &dyn Store,
        ctx: &RequestContext,
        shift_type_id: Uuid,
        req: &ShiftTypeRequest,
    ) -> AppResult<ShiftType> {
        authz::require(ctx, Action::ManageShiftTypes)?;
        validate_shift_type(
            &req.code,
            &req.label,
            &req.color,
            &req.default_start_time,
            &req.default_end_time,
        )?;

        let changes = ShiftTypeChanges {
            code: req.code.trim().to_string(),
            label: req.label.trim().to_string(),
            color: req.color.clone(),
            default_start_time: req.default_start_time.clone(),
            default_end_time: req.default_end_time.clone(),
            crosses_midnight: req.crosses_midnight,
        };

        store
            .update_shift_type(shift_type_id, changes)
            .await
            .map_err(code_conflict)?
            .ok_or_else(|| AppError::not_found("Shift type not found"))
    }

    pub async fn delete(
        store: &dyn Store,
        ctx: &RequestContext,
        shift_type_id: Uuid,
    ) -> AppResult<()> {
        authz::require(ctx, Action::ManageShiftTypes)?;
        match store.delete_shift_type(shift_type_id).await {
            Ok(true) => {
                tracing::info!(%shift_type_id, "shift type deleted");
                Ok(())
            }
            Ok(false) => Err(AppError::not_found("Shift type not found")),
            Err(StoreError::InUse(message)) => Err(AppError::conflict_with_code(
                message,
                None,
                error_codes::SHIFT_TYPE_IN_USE,
            )),
            Err(e) => Err(e.into()),
        }
    }
}

fn code_conflict(err: StoreError) -> AppError {
    match err {
        StoreError::Duplicate(message) => AppError::conflict_with_code(
            message,
            Some("code".to_string()),
            error_codes::SHIFT_TYPE_CODE_EXISTS,
        ),
        other => other.into(),
    }
}
