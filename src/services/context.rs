use crate::db::enums::UserRole;
use uuid::Uuid;

/// Authenticated caller, resolved once per request by the identity provider.
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub user_id: Uuid,
    pub team_id: Uuid,
    pub role: UserRole,
}

