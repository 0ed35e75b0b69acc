use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::{
    errors::EduAdminError,
    middlewares::RequireJWT,
    models::{ApiResponse, ErrorCode},
};

pub async fn delete_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let current_user_id = RequireJWT::extract_user_id(request)
        .ok_or_else(|| EduAdminError::authentication("Unauthorized access, please login"))?;
    // 禁止删除当前用户
    if user_id == current_user_id {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CanNotDeleteCurrentUser,
            "Cannot delete current user",
        )));
    }

    // 仍关联教师/学生档案时存储层返回 StoreConflict
    if storage.delete_user(user_id).await? {
        RequireJWT::evict_cached_user(request, user_id).await;
        tracing::info!("User {} deleted", user_id);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deleted successfully")))
    } else {
        Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheResult, ObjectCache, object_cache::MokaCacheWrapper};
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::*;
    use actix_web::{HttpMessage, http::StatusCode, test, web};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_delete_evicts_cached_user() {
        let storage = Arc::new(memory_storage().await);
        let admin = create_user(storage.as_ref(), "admin", UserRole::Admin).await;
        let user = create_user(storage.as_ref(), "bob", UserRole::Student).await;

        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_capacity(100, 300));
        let key = format!("user:{}", user.id);
        cache
            .insert_raw(key.clone(), serde_json::to_string(&user).unwrap(), 0)
            .await;

        let request = test::TestRequest::default()
            .app_data(web::Data::new(cache.clone()))
            .to_http_request();
        request.extensions_mut().insert(admin.clone());

        let service = UserService::with_storage(storage.clone());
        let resp = delete_user(&service, user.id, &request).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(cache.get_raw(&key).await, CacheResult::NotFound);
        assert!(storage.get_user_by_id(user.id).await.unwrap().is_none());

        // 不能删除自己
        let resp = delete_user(&service, admin.id, &request).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
