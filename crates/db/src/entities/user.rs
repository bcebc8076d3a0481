//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Subscription tiers, ordered from least to most privileged.
///
/// The same type doubles as an entry's visibility requirement: an entry
/// marked `premium` is only visible to premium-or-above requesters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[sea_orm(string_value = "free")]
    Free,
    #[sea_orm(string_value = "premium")]
    Premium,
}

impl Tier {
    /// Explicit numeric ranking used for access comparisons.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Free => 0,
            Self::Premium => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub username: String,

    /// Access token, looked up on every authenticated request.
    #[sea_orm(unique)]
    pub token: String,

    /// Subscription tier deciding which entries this user may view.
    pub subscription_tier: Tier,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::entry::Entity")]
    Entries,
    #[sea_orm(has_many = "super::common_tag::Entity")]
    CommonTags,
}

impl Related<super::entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl Related<super::common_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CommonTags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
