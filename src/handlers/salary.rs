use axum::{response::IntoResponse, Extension, Json};

use crate::{
    auth::{permissions::Permission, token::Claims},
    authz,
    error::Result,
    services::export as export_service,
};

/// Parses an uploaded tabular document (CSV) into key→value records for
/// the salary-slip print view. Schema-agnostic: the columns of the
/// document become the record keys.
pub async fn import_salary_slips(
    Extension(claims): Extension<Claims>,
    document: String,
) -> Result<impl IntoResponse> {
    authz::require_permission(&claims, Permission::Read)?;

    let records = export_service::import_salary_slips(&document)?;
    tracing::debug!(count = records.len(), "Salary slips imported");
    Ok(Json(records))
}
