use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::CoreError;
use crate::ids::{CollectionId, UserId};

/// Revenue shares are expressed in basis points; the whole is 100%.
pub const FULL_SHARE_BPS: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessRole {
    Owner,
    Editor,
    Viewer,
}

impl AccessRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "owner" => Ok(Self::Owner),
            "editor" => Ok(Self::Editor),
            "viewer" => Ok(Self::Viewer),
            _ => Err(CoreError::InvalidData(format!("unknown access role: {s}"))),
        }
    }

    pub fn can_edit(&self) -> bool {
        matches!(self, Self::Owner | Self::Editor)
    }
}

/// A user's access to one storefront collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    pub user_id: UserId,
    pub collection_id: CollectionId,
    pub role: AccessRole,
    pub revenue_share_bps: u16,
}

impl AccessGrant {
    pub fn new(
        user_id: impl Into<UserId>,
        collection_id: impl Into<CollectionId>,
        role: AccessRole,
        revenue_share_bps: u16,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            collection_id: collection_id.into(),
            role,
            revenue_share_bps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessChange {
    Role(AccessRole),
    RevenueShare(u16),
}

impl Entity for AccessGrant {
    type Id = UserId;
    type Patch = AccessChange;

    fn id(&self) -> &UserId {
        &self.user_id
    }

    fn merge(&self, patch: &AccessChange) -> Self {
        let mut next = self.clone();
        match patch {
            AccessChange::Role(role) => next.role = *role,
            AccessChange::RevenueShare(bps) => next.revenue_share_bps = *bps,
        }
        next
    }
}
