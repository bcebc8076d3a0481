//! Entry visibility checks.

use promptstash_common::{AppError, AppResult};
use promptstash_db::entities::{entry, user};

/// Check whether `requester` may view `entry`.
///
/// The owning user always has access. Anyone else needs a subscription
/// tier at or above the entry's visibility tier. A mismatch is an expected
/// outcome surfaced as `Forbidden`, not an internal error.
pub fn check_visibility(requester: &user::Model, entry: &entry::Model) -> AppResult<()> {
    if requester.id == entry.user_id {
        return Ok(());
    }

    if requester.subscription_tier.level() >= entry.visibility.level() {
        return Ok(());
    }

    Err(AppError::Forbidden(
        "Subscription tier does not allow viewing this entry".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use promptstash_db::entities::user::Tier;
    use serde_json::json;

    fn create_test_user(id: &str, tier: Tier) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: format!("user-{id}"),
            token: format!("token-{id}"),
            subscription_tier: tier,
            created_at: Utc::now().into(),
        }
    }

    fn create_test_entry(id: &str, user_id: &str, visibility: Tier) -> entry::Model {
        entry::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            seed: 1,
            prompt: String::new(),
            negative_prompt: String::new(),
            generation_params: json!({}),
            raw_metadata: String::new(),
            visibility,
            image_path: "x.png".to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn owner_always_has_access() {
        let owner = create_test_user("u1", Tier::Free);
        let entry = create_test_entry("e1", "u1", Tier::Premium);

        assert!(check_visibility(&owner, &entry).is_ok());
    }

    #[test]
    fn premium_entry_rejects_free_requester() {
        let requester = create_test_user("u2", Tier::Free);
        let entry = create_test_entry("e1", "u1", Tier::Premium);

        let result = check_visibility(&requester, &entry);
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn premium_requester_sees_premium_entry() {
        let requester = create_test_user("u2", Tier::Premium);
        let entry = create_test_entry("e1", "u1", Tier::Premium);

        assert!(check_visibility(&requester, &entry).is_ok());
    }

    #[test]
    fn free_entry_visible_to_free_requester() {
        let requester = create_test_user("u2", Tier::Free);
        let entry = create_test_entry("e1", "u1", Tier::Free);

        assert!(check_visibility(&requester, &entry).is_ok());
    }
}
