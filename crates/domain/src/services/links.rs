//! Shareable invitation links.

/// Builds `<base_origin>/invite/<token>` links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteLinks {
    base_origin: String,
}

impl InviteLinks {
    pub const DEVELOPMENT_ORIGIN: &'static str = "http://localhost:8081";
    pub const PRODUCTION_ORIGIN: &'static str = "https://bandly.app";

    /// A trailing slash on `base_origin` is ignored.
    pub fn new(base_origin: impl Into<String>) -> Self {
        let mut base_origin = base_origin.into();
        while base_origin.ends_with('/') {
            base_origin.pop();
        }
        Self { base_origin }
    }

    pub fn development() -> Self {
        Self::new(Self::DEVELOPMENT_ORIGIN)
    }

    pub fn production() -> Self {
        Self::new(Self::PRODUCTION_ORIGIN)
    }

    pub fn base_origin(&self) -> &str {
        &self.base_origin
    }

    pub fn url_for(&self, token: &str) -> String {
        format!("{}/invite/{}", self.base_origin, token)
    }
}
