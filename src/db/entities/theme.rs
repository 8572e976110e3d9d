//! Theme entity: one discussion topic

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "themes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub url: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub rev: i32,
    pub created: DateTime,
    pub created_by: i32,
    pub updated: DateTime,
    pub updated_by: i32,
    pub current_at: DateTime,
    pub discussed_at: DateTime,
    pub status: String, // "c", "r", "d"
    pub priority: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    Creator,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
