//! Identity capability. Sign-in itself lives with an external provider; the
//! client only asks whether someone is signed in.

pub trait Identity: Send + Sync {
    fn is_authenticated(&self) -> bool;
}

/// Fixed answer, for the terminal client and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticIdentity {
    signed_in: bool,
}

impl StaticIdentity {
    pub fn signed_in() -> Self {
        Self { signed_in: true }
    }

    pub fn anonymous() -> Self {
        Self { signed_in: false }
    }
}

impl Identity for StaticIdentity {
    fn is_authenticated(&self) -> bool {
        self.signed_in
    }
}
