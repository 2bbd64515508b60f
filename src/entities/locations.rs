use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: i64,
    pub latitude: f64,
    pub longitude: f64,
    #[sea_orm(unique)]
    pub search_query: String,
    pub formatted_query: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::weathers::Entity")]
    Weathers,
    #[sea_orm(has_many = "super::events::Entity")]
    Events,
    #[sea_orm(has_many = "super::movies::Entity")]
    Movies,
    #[sea_orm(has_many = "super::yelps::Entity")]
    Yelps,
}

impl Related<super::weathers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Weathers.def()
    }
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl Related<super::movies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movies.def()
    }
}

impl Related<super::yelps::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Yelps.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
