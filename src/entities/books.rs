use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    pub description: Option<String>,

    pub image_url: Option<String>,

    /// Constrained to 1980..=2024 by a CHECK in the schema
    pub release_year: i32,

    pub price: i32,

    pub total_page: i32,

    /// Derived from `total_page`, see [`crate::domain::Thickness`]
    pub thickness: String,

    pub category_id: Option<i32>,

    pub created_at: DateTimeUtc,

    pub created_by: Option<String>,

    pub modified_at: Option<DateTimeUtc>,

    pub modified_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Category,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
