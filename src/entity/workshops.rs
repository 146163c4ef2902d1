use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "workshops")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub workshop_date: Date,
    pub workshop_time: String,
    pub instructor: String,
    pub level: String,
    pub image_url: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::workshop_registrations::Entity")]
    WorkshopRegistrations,
}

impl Related<super::workshop_registrations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkshopRegistrations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
