use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::errors::EduAdminError;
use crate::models::ApiResponse;
use crate::models::assignments::requests::AssignmentListParams;

pub async fn list_assignments(
    service: &AssignmentService,
    query: AssignmentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let response = storage.list_assignments(query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Assignments retrieved successfully",
    )))
}

pub async fn get_assignment(
    service: &AssignmentService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let view = storage
        .get_assignment_view(id)
        .await?
        .ok_or_else(|| EduAdminError::not_found(format!("assignment {id}")))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        view,
        "Assignment retrieved successfully",
    )))
}
