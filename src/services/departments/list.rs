use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DepartmentService;
use crate::errors::EduAdminError;
use crate::models::ApiResponse;
use crate::models::departments::requests::DepartmentListParams;

pub async fn list_departments(
    service: &DepartmentService,
    query: DepartmentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let response = storage.list_departments(query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Departments retrieved successfully",
    )))
}

pub async fn get_department(
    service: &DepartmentService,
    dept_id: &str,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let department = storage
        .get_department(dept_id)
        .await?
        .ok_or_else(|| EduAdminError::not_found(format!("department {dept_id}")))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        department,
        "Department retrieved successfully",
    )))
}
