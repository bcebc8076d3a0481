//! Entry entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::user::Tier;

/// Entry entity - one generated-image record with prompt and parameters.
///
/// Immutable once created except by the owning user. The metadata blob is
/// parsed once at ingestion; `generation_params` holds the structured map
/// and is never re-parsed on read.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "entry")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning user ID.
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Calendar date acting as the directory key for this entry.
    #[sea_orm(indexed)]
    pub date: Date,

    /// Generation seed. Entries sharing a seed are variants of one
    /// generation and collapse into a group when listed.
    pub seed: i64,

    /// Prompt text.
    #[sea_orm(column_type = "Text")]
    pub prompt: String,

    /// Negative prompt text.
    #[sea_orm(column_type = "Text")]
    pub negative_prompt: String,

    /// Structured generation parameters (key -> value).
    #[sea_orm(column_type = "JsonBinary")]
    pub generation_params: Json,

    /// Raw metadata blob as submitted, kept for reference.
    #[sea_orm(column_type = "Text")]
    pub raw_metadata: String,

    /// Minimum subscription tier required to view this entry.
    pub visibility: Tier,

    /// Path of the image on the asset host, relative to the media base URL.
    pub image_path: String,

    pub created_at: DateTimeWithTimeZone,
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
