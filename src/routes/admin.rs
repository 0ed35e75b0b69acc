use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::assignments::requests::{
    AssignmentListParams, CreateAssignmentRequest, UpdateAssignmentRequest,
};
use crate::models::courses::requests::{CourseListParams, CreateCourseRequest, UpdateCourseRequest};
use crate::models::departments::requests::{
    CreateDepartmentRequest, DepartmentListParams, UpdateDepartmentRequest,
};
use crate::models::students::requests::{
    CreateStudentRequest, StudentListParams, UpdateStudentRequest,
};
use crate::models::teachers::requests::{
    CreateTeacherRequest, TeacherListParams, UpdateTeacherRequest,
};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::UserListParams;
use crate::services::{
    AssignmentService, CourseService, DepartmentService, StudentService, TeacherService,
    UserService,
};
use crate::utils::{SafeCode, SafeIDI64};

// 懒加载的全局服务实例
static DEPARTMENT_SERVICE: Lazy<DepartmentService> = Lazy::new(DepartmentService::new_lazy);
static TEACHER_SERVICE: Lazy<TeacherService> = Lazy::new(TeacherService::new_lazy);
static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);
static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);
static USER_SERVICE: Lazy<UserService> = Lazy::new(UserService::new_lazy);

// 系部
pub async fn list_departments(
    req: HttpRequest,
    query: web::Query<DepartmentListParams>,
) -> ActixResult<HttpResponse> {
    DEPARTMENT_SERVICE.list_departments(query.into_inner(), &req).await
}

pub async fn create_department(
    req: HttpRequest,
    body: web::Json<CreateDepartmentRequest>,
) -> ActixResult<HttpResponse> {
    DEPARTMENT_SERVICE.create_department(body.into_inner(), &req).await
}

pub async fn get_department(req: HttpRequest, code: SafeCode) -> ActixResult<HttpResponse> {
    DEPARTMENT_SERVICE.get_department(&code.0, &req).await
}

pub async fn update_department(
    req: HttpRequest,
    code: SafeCode,
    body: web::Json<UpdateDepartmentRequest>,
) -> ActixResult<HttpResponse> {
    DEPARTMENT_SERVICE
        .update_department(&code.0, body.into_inner(), &req)
        .await
}

pub async fn delete_department(req: HttpRequest, code: SafeCode) -> ActixResult<HttpResponse> {
    DEPARTMENT_SERVICE.delete_department(&code.0, &req).await
}

// 教师
pub async fn list_teachers(
    req: HttpRequest,
    query: web::Query<TeacherListParams>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.list_teachers(query.into_inner(), &req).await
}

pub async fn create_teacher(
    req: HttpRequest,
    body: web::Json<CreateTeacherRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.create_teacher(body.into_inner(), &req).await
}

pub async fn get_teacher(req: HttpRequest, code: SafeCode) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.get_teacher(&code.0, &req).await
}

pub async fn update_teacher(
    req: HttpRequest,
    code: SafeCode,
    body: web::Json<UpdateTeacherRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .update_teacher(&code.0, body.into_inner(), &req)
        .await
}

pub async fn delete_teacher(req: HttpRequest, code: SafeCode) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.delete_teacher(&code.0, &req).await
}

// 学生
pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentListParams>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_students(query.into_inner(), &req).await
}

pub async fn create_student(
    req: HttpRequest,
    body: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.create_student(body.into_inner(), &req).await
}

pub async fn get_student(req: HttpRequest, code: SafeCode) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(&code.0, &req).await
}

pub async fn update_student(
    req: HttpRequest,
    code: SafeCode,
    body: web::Json<UpdateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .update_student(&code.0, body.into_inner(), &req)
        .await
}

pub async fn delete_student(req: HttpRequest, code: SafeCode) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.delete_student(&code.0, &req).await
}

// 课程
pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseListParams>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_courses(query.into_inner(), &req).await
}

pub async fn create_course(
    req: HttpRequest,
    body: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.create_course(body.into_inner(), &req).await
}

pub async fn get_course(req: HttpRequest, code: SafeCode) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course(&code.0, &req).await
}

pub async fn update_course(
    req: HttpRequest,
    code: SafeCode,
    body: web::Json<UpdateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_course(&code.0, body.into_inner(), &req)
        .await
}

pub async fn delete_course(req: HttpRequest, code: SafeCode) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.delete_course(&code.0, &req).await
}

// 教学任务
pub async fn list_assignments(
    req: HttpRequest,
    query: web::Query<AssignmentListParams>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.list_assignments(query.into_inner(), &req).await
}

pub async fn create_assignment(
    req: HttpRequest,
    body: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.create_assignment(body.into_inner(), &req).await
}

pub async fn get_assignment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.get_assignment(id.0, &req).await
}

pub async fn update_assignment(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .update_assignment(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_assignment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.delete_assignment(id.0, &req).await
}

// 用户
pub async fn list_users(
    req: HttpRequest,
    query: web::Query<UserListParams>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.list_users(query.into_inner(), &req).await
}

pub async fn get_user(req: HttpRequest, user_id: SafeIDI64) -> ActixResult<HttpResponse> {
    USER_SERVICE.get_user(user_id.0, &req).await
}

pub async fn toggle_user_status(req: HttpRequest, user_id: SafeIDI64) -> ActixResult<HttpResponse> {
    USER_SERVICE.toggle_status(user_id.0, &req).await
}

pub async fn delete_user(req: HttpRequest, user_id: SafeIDI64) -> ActixResult<HttpResponse> {
    USER_SERVICE.delete_user(user_id.0, &req).await
}

// 配置路由
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/admin")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("/departments", web::get().to(list_departments))
                    .route("/departments", web::post().to(create_department))
                    .route("/departments/{code}", web::get().to(get_department))
                    .route("/departments/{code}", web::put().to(update_department))
                    .route("/departments/{code}", web::delete().to(delete_department))
                    .route("/teachers", web::get().to(list_teachers))
                    .route("/teachers", web::post().to(create_teacher))
                    .route("/teachers/{code}", web::get().to(get_teacher))
                    .route("/teachers/{code}", web::put().to(update_teacher))
                    .route("/teachers/{code}", web::delete().to(delete_teacher))
                    .route("/students", web::get().to(list_students))
                    .route("/students", web::post().to(create_student))
                    .route("/students/{code}", web::get().to(get_student))
                    .route("/students/{code}", web::put().to(update_student))
                    .route("/students/{code}", web::delete().to(delete_student))
                    .route("/courses", web::get().to(list_courses))
                    .route("/courses", web::post().to(create_course))
                    .route("/courses/{code}", web::get().to(get_course))
                    .route("/courses/{code}", web::put().to(update_course))
                    .route("/courses/{code}", web::delete().to(delete_course))
                    .route("/assignments", web::get().to(list_assignments))
                    .route("/assignments", web::post().to(create_assignment))
                    .route("/assignments/{id}", web::get().to(get_assignment))
                    .route("/assignments/{id}", web::put().to(update_assignment))
                    .route("/assignments/{id}", web::delete().to(delete_assignment))
                    .route("/users", web::get().to(list_users))
                    .route("/users/{id}", web::get().to(get_user))
                    .route("/users/{id}/status", web::put().to(toggle_user_status))
                    .route("/users/{id}", web::delete().to(delete_user)),
            ),
    );
}
