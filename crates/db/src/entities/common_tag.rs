//! Common tag entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-user frequency-counted label extracted from prompts.
///
/// Unique per `(user_id, name)`; `count` is incremented each time the tag
/// is observed in a prompt.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "common_tag")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning user ID.
    #[sea_orm(indexed)]
    pub user_id: String,

    /// The tag text (lowercase, trimmed).
    pub name: String,

    /// Number of times this tag has been observed.
    #[sea_orm(default_value = 0)]
    pub count: i32,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
