use uuid::Uuid;

/// Plan a premium post is gated behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredPlan {
    /// No plan attached; any active subscription to the creator unlocks it.
    AnySubscription,
    Price(i64),
    /// The attached plan no longer exists. Only the owner sees the post.
    Unresolved,
}

impl RequiredPlan {
    pub fn from_lookup(plan_attached: bool, price: Option<i64>) -> Self {
        match (plan_attached, price) {
            (false, _) => RequiredPlan::AnySubscription,
            (true, Some(price)) => RequiredPlan::Price(price),
            (true, None) => RequiredPlan::Unresolved,
        }
    }
}

/// Access-relevant facts about a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostAccess {
    pub owner_id: Uuid,
    pub is_premium: bool,
    pub required_plan: RequiredPlan,
}

/// Evaluates whether `viewer` may see the post contents.
///
/// `active_plan_prices` are the prices of the viewer's currently active
/// subscriptions to the post's creator.
pub fn can_view(access: &PostAccess, viewer: Option<Uuid>, active_plan_prices: &[i64]) -> bool {
    if !access.is_premium {
        return true;
    }

    let Some(viewer_id) = viewer else {
        return false;
    };

    if viewer_id == access.owner_id {
        return true;
    }

    let Some(best_price) = active_plan_prices.iter().copied().max() else {
        return false;
    };

    match access.required_plan {
        RequiredPlan::AnySubscription => true,
        RequiredPlan::Price(required) => best_price >= required,
        RequiredPlan::Unresolved => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn premium(owner_id: Uuid, required_plan: RequiredPlan) -> PostAccess {
        PostAccess {
            owner_id,
            is_premium: true,
            required_plan,
        }
    }

    #[test]
    fn free_post_is_visible_to_everyone() {
        let access = PostAccess {
            owner_id: Uuid::new_v4(),
            is_premium: false,
            required_plan: RequiredPlan::Price(50_000),
        };

        assert!(can_view(&access, None, &[]));
        assert!(can_view(&access, Some(Uuid::new_v4()), &[]));
    }

    #[test]
    fn owner_always_sees_premium_post() {
        let owner = Uuid::new_v4();
        assert!(can_view(&premium(owner, RequiredPlan::Price(10_000)), Some(owner), &[]));
    }

    #[test]
    fn premium_post_requires_plan_at_least_as_expensive() {
        let access = premium(Uuid::new_v4(), RequiredPlan::Price(20_000));
        let viewer = Some(Uuid::new_v4());

        assert!(!can_view(&access, viewer, &[]));
        assert!(!can_view(&access, viewer, &[19_999]));
        assert!(can_view(&access, viewer, &[20_000]));
        assert!(can_view(&access, viewer, &[5_000, 30_000]));
    }

    #[test]
    fn anonymous_viewer_cannot_see_premium_post() {
        assert!(!can_view(&premium(Uuid::new_v4(), RequiredPlan::AnySubscription), None, &[100]));
    }

    #[test]
    fn premium_post_without_plan_needs_any_subscription() {
        let access = premium(Uuid::new_v4(), RequiredPlan::AnySubscription);
        let viewer = Some(Uuid::new_v4());

        assert!(!can_view(&access, viewer, &[]));
        assert!(can_view(&access, viewer, &[0]));
    }

    #[test]
    fn premium_post_with_missing_plan_stays_locked() {
        let owner = Uuid::new_v4();
        let access = premium(owner, RequiredPlan::from_lookup(true, None));

        assert!(!can_view(&access, Some(Uuid::new_v4()), &[1_000_000]));
        assert!(can_view(&access, Some(owner), &[]));
    }
}
