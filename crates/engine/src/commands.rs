//! Command structs for engine operations.
//!
//! These types group parameters for write operations (new project, project
//! edit, new donation), keeping call sites readable and avoiding long
//! argument lists.

/// Create a charity project. Superuser only.
#[derive(Clone, Debug)]
pub struct ProjectNew {
    pub name: String,
    pub description: String,
    pub full_amount: i64,
    pub user_id: String,
}

impl ProjectNew {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        full_amount: i64,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            full_amount,
            user_id: user_id.into(),
        }
    }
}

/// Edit a charity project. Superuser only.
///
/// Fields left to `None` are not changed.
#[derive(Clone, Debug, Default)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub full_amount: Option<i64>,
    pub user_id: String,
}

impl ProjectUpdate {
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn full_amount(mut self, full_amount: i64) -> Self {
        self.full_amount = Some(full_amount);
        self
    }

    /// Returns `true` if nothing would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.full_amount.is_none()
    }
}

/// Create a donation on behalf of `user_id`.
#[derive(Clone, Debug)]
pub struct DonationNew {
    pub full_amount: i64,
    pub comment: Option<String>,
    pub user_id: String,
}

impl DonationNew {
    #[must_use]
    pub fn new(user_id: impl Into<String>, full_amount: i64) -> Self {
        Self {
            full_amount,
            comment: None,
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}
