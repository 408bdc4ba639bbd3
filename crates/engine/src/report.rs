//! Report of closed projects ranked by how fast they were funded.

use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use crate::Project;

/// One line of the closed projects report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
    /// Time between creation and closing.
    pub duration: TimeDelta,
}

/// Keep the fully funded projects and sort them fastest first.
///
/// Ties are broken by creation time, then by id.
pub fn rank_by_funding_speed(projects: impl IntoIterator<Item = Project>) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = projects
        .into_iter()
        .filter(|project| project.funding.fully_invested)
        .filter_map(|project| {
            let closed_at = project.funding.closed_at?;
            Some(ReportRow {
                id: project.id,
                duration: closed_at - project.funding.created_at,
                created_at: project.funding.created_at,
                closed_at,
                name: project.name,
                description: project.description,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        a.duration
            .cmp(&b.duration)
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    });
    rows
}

/// Render a duration as `"N days, H:MM:SS"`, dropping the days when zero.
pub fn format_duration(duration: TimeDelta) -> String {
    let total = duration.num_seconds().max(0);
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    match days {
        0 => format!("{hours}:{minutes:02}:{seconds:02}"),
        1 => format!("1 day, {hours}:{minutes:02}:{seconds:02}"),
        _ => format!("{days} days, {hours}:{minutes:02}:{seconds:02}"),
    }
}
