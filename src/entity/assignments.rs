//! 教学任务实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: String,
    pub teacher_id: String,
    pub academic_year: String,
    pub semester: String,
    pub class_time: Option<String>,
    pub location: Option<String>,
    pub exam_time: Option<i64>,
    pub enrollment_limit: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::CourseId"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::teachers::Entity",
        from = "Column::TeacherId",
        to = "super::teachers::Column::TeacherId"
    )]
    Teacher,
    #[sea_orm(has_many = "super::selections::Entity")]
    Selections,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::teachers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::selections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Selections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_assignment(self) -> crate::models::assignments::entities::Assignment {
        use crate::models::assignments::entities::{Assignment, Semester};

        Assignment {
            id: self.id,
            course_id: self.course_id,
            teacher_id: self.teacher_id,
            academic_year: self.academic_year,
            semester: self.semester.parse::<Semester>().unwrap_or(Semester::First),
            class_time: self.class_time,
            location: self.location,
            exam_time: self.exam_time.map(super::from_timestamp),
            enrollment_limit: self.enrollment_limit,
            created_at: super::from_timestamp(self.created_at),
            updated_at: super::from_timestamp(self.updated_at),
        }
    }
}
