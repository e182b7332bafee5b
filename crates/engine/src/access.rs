//! Client-side guards for a storefront collection's access list. They
//! mirror the backend procedures so the optimistic state never shows
//! something the backend would refuse: exactly one owner, ownership moving
//! only by transfer, and revenue shares within 100%.

use storefront_core::access::FULL_SHARE_BPS;
use storefront_core::{AccessChange, AccessGrant, AccessRole, MutationId, UserId};

use crate::error::EngineError;
use crate::mutation::MutationEngine;

pub trait AccessMutations {
    fn owner(&self) -> Option<&AccessGrant>;

    /// Sum of all revenue shares, in basis points.
    fn total_revenue_share(&self) -> u32;

    fn grant_access(&mut self, grant: AccessGrant) -> Result<MutationId, EngineError>;

    fn change_role(&mut self, user: &UserId, role: AccessRole) -> Result<MutationId, EngineError>;

    fn set_revenue_share(&mut self, user: &UserId, bps: u16) -> Result<MutationId, EngineError>;

    fn revoke_access(&mut self, user: &UserId) -> Result<MutationId, EngineError>;

    /// Demote the current owner to editor and promote `new_owner`. Returns
    /// the demotion and promotion tokens, in that order.
    fn transfer_ownership(&mut self, new_owner: &UserId) -> Result<[MutationId; 2], EngineError>;
}

impl AccessMutations for MutationEngine<AccessGrant> {
    fn owner(&self) -> Option<&AccessGrant> {
        self.iter().find(|g| g.role == AccessRole::Owner)
    }

    fn total_revenue_share(&self) -> u32 {
        self.iter().map(|g| u32::from(g.revenue_share_bps)).sum()
    }

    fn grant_access(&mut self, grant: AccessGrant) -> Result<MutationId, EngineError> {
        if grant.role == AccessRole::Owner {
            return Err(EngineError::AccessViolation(
                "ownership can only be transferred".into(),
            ));
        }
        check_share_total(self.total_revenue_share() + u32::from(grant.revenue_share_bps))?;
        self.add_item(grant)
    }

    fn change_role(&mut self, user: &UserId, role: AccessRole) -> Result<MutationId, EngineError> {
        let current = require_grant(self, user)?;
        if role == AccessRole::Owner {
            return Err(EngineError::AccessViolation(
                "ownership can only be transferred".into(),
            ));
        }
        if current.role == AccessRole::Owner {
            return Err(EngineError::AccessViolation(format!(
                "{user} owns the collection; transfer ownership first"
            )));
        }
        self.update_item(user.clone(), AccessChange::Role(role))
    }

    fn set_revenue_share(&mut self, user: &UserId, bps: u16) -> Result<MutationId, EngineError> {
        let current = u32::from(require_grant(self, user)?.revenue_share_bps);
        check_share_total(self.total_revenue_share() - current + u32::from(bps))?;
        self.update_item(user.clone(), AccessChange::RevenueShare(bps))
    }

    fn revoke_access(&mut self, user: &UserId) -> Result<MutationId, EngineError> {
        if require_grant(self, user)?.role == AccessRole::Owner {
            return Err(EngineError::AccessViolation(format!(
                "{user} owns the collection and cannot be removed"
            )));
        }
        self.remove_item(user.clone())
    }

    fn transfer_ownership(&mut self, new_owner: &UserId) -> Result<[MutationId; 2], EngineError> {
        if require_grant(self, new_owner)?.role == AccessRole::Owner {
            return Err(EngineError::AccessViolation(format!(
                "{new_owner} already owns the collection"
            )));
        }
        let previous = self
            .owner()
            .map(|g| g.user_id.clone())
            .ok_or_else(|| EngineError::AccessViolation("collection has no owner".into()))?;

        let demoted = self.update_item(previous, AccessChange::Role(AccessRole::Editor))?;
        match self.update_item(new_owner.clone(), AccessChange::Role(AccessRole::Owner)) {
            Ok(promoted) => Ok([demoted, promoted]),
            Err(e) => {
                self.rollback(demoted)?;
                Err(e)
            }
        }
    }
}

fn require_grant<'a>(
    engine: &'a MutationEngine<AccessGrant>,
    user: &UserId,
) -> Result<&'a AccessGrant, EngineError> {
    engine
        .get(user)
        .ok_or_else(|| EngineError::EntityNotFound(user.to_string()))
}

fn check_share_total(total: u32) -> Result<(), EngineError> {
    if total > FULL_SHARE_BPS {
        return Err(EngineError::AccessViolation(format!(
            "revenue shares would total {total} bps (max {FULL_SHARE_BPS})"
        )));
    }
    Ok(())
}
