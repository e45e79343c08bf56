use async_trait::async_trait;
use nftrader_core::UserId;

use crate::error::PortResult;

/// Port for session resolution
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, or `None` when there is no session
    async fn current_user(&self) -> PortResult<Option<UserId>>;
}
