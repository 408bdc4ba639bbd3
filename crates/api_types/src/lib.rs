use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod project {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct ProjectNew {
        pub name: String,
        pub description: String,
        pub full_amount: i64,
    }

    /// Request body for editing a project. Missing fields are left unchanged.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct ProjectUpdate {
        pub name: Option<String>,
        pub description: Option<String>,
        pub full_amount: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectView {
        /// Project id (UUID).
        ///
        /// This is serialized as a string in JSON.
        pub id: Uuid,
        pub name: String,
        pub description: String,
        pub full_amount: i64,
        pub invested_amount: i64,
        pub fully_invested: bool,
        pub create_date: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub close_date: Option<DateTime<Utc>>,
    }
}

pub mod donation {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct DonationNew {
        pub full_amount: i64,
        pub comment: Option<String>,
    }

    /// A donation as seen by its contributor.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DonationView {
        pub id: Uuid,
        pub full_amount: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub comment: Option<String>,
        pub create_date: DateTime<Utc>,
    }

    /// A donation with its allocation state. Superuser only.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DonationDetail {
        pub id: Uuid,
        pub user_id: String,
        pub full_amount: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub comment: Option<String>,
        pub invested_amount: i64,
        pub fully_invested: bool,
        pub create_date: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub close_date: Option<DateTime<Utc>>,
    }
}

pub mod report {
    use super::*;

    /// One closed project, `duration` rendered as `"N days, H:MM:SS"`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReportRow {
        pub name: String,
        pub duration: String,
        pub description: String,
        /// Same duration, in seconds.
        pub duration_seconds: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReportResponse {
        pub generated_at: DateTime<Utc>,
        pub projects: Vec<ReportRow>,
    }
}
