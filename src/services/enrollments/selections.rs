use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::errors::EduAdminError;
use crate::models::ApiResponse;
use crate::services::principal;

pub async fn handle_list_my_selections(
    service: &EnrollmentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let student = principal::current_student(storage.as_ref(), request).await?;

    let items = storage.list_student_selections(&student.student_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        items,
        "Selections retrieved successfully",
    )))
}

pub async fn handle_get_my_selection(
    service: &EnrollmentService,
    selection_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let student = principal::current_student(storage.as_ref(), request).await?;

    let detail = storage
        .get_selection_detail(selection_id)
        .await?
        .ok_or_else(|| EduAdminError::not_found(format!("selection {selection_id}")))?;

    if !detail.selection.selection.is_owned_by(&student.student_id) {
        return Err(EduAdminError::not_owner(format!(
            "selection {selection_id} does not belong to student {}",
            student.student_id
        ))
        .into());
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        detail,
        "Selection retrieved successfully",
    )))
}
