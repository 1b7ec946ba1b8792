use crate::domain::OwnerId;

/// Supplies the identity of the connected user, if any.
pub trait IdentityProvider: Send + Sync {
    fn current_owner(&self) -> Option<OwnerId>;
}

/// Identity fixed at construction, e.g. from a command-line flag.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(Option<OwnerId>);

impl StaticIdentity {
    pub fn connected(owner: impl Into<OwnerId>) -> Self {
        Self(Some(owner.into()))
    }

    pub fn disconnected() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_owner(&self) -> Option<OwnerId> {
        self.0.clone().filter(|owner| !owner.is_blank())
    }
}
