//! Dashboard counters

use crate::adapters::store::AppointmentRepository;
use crate::core::schedule::DayRange;
use crate::domain::{Result, UserId};
use chrono::{NaiveDate, TimeZone};
use serde::Serialize;

/// Appointment counts shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Appointments on `today`
    pub today: usize,
    /// Appointments in the Sunday-to-Saturday week containing `today`
    pub this_week: usize,
}

/// Counts the owner's appointments for today and the current week
pub async fn dashboard_stats<S, Tz>(
    store: &S,
    owner: &UserId,
    today: NaiveDate,
    tz: &Tz,
) -> Result<DashboardStats>
where
    S: AppointmentRepository + ?Sized,
    Tz: TimeZone,
{
    let day = DayRange::for_date(today, tz);
    let week = DayRange::week_of(today, tz);

    let in_week = store.list_appointments_in_range(owner, &week).await?;
    let today_count = in_week
        .iter()
        .filter(|appointment| {
            appointment
                .starts_at()
                .is_some_and(|instant| day.contains(&instant))
        })
        .count();

    let stats = DashboardStats {
        today: today_count,
        this_week: in_week.len(),
    };
    tracing::debug!(
        user_id = %owner,
        today = stats.today,
        this_week = stats.this_week,
        "Dashboard stats computed"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use chrono::Utc;

    #[tokio::test]
    async fn test_counts_today_and_week() {
        let store = MemoryStore::new();
        let owner = UserId::new("u-1").unwrap();
        let patient = store.add_patient(&owner, "Ana").await;

        for (d, h) in [(14, 9), (14, 10), (10, 9), (16, 9)] {
            store
                .seed_appointment(
                    &owner,
                    &patient.id,
                    Utc.with_ymd_and_hms(2025, 3, d, h, 0, 0).unwrap(),
                    None,
                )
                .await;
        }

        let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let stats = dashboard_stats(&store, &owner, today, &Utc).await.unwrap();
        assert_eq!(stats, DashboardStats { today: 2, this_week: 3 });
    }
}
