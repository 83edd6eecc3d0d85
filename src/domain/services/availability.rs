//! Interval-overlap checking and the read-only room availability query.
//!
//! Two stays [a, b) and [c, d) collide iff a < d && c < b, so a checkout on
//! the same day a new guest checks in never conflicts.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::domain::ports::{AssignmentRepository, BedRepository};
use crate::error::AppError;

pub fn intervals_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Beds of `room_id` free for the whole of [check_in, check_out), ascending
/// by bed id. The stable order makes repeated allocation against the same
/// state deterministic.
pub async fn available_beds(
    bed_repo: &dyn BedRepository,
    assignment_repo: &dyn AssignmentRepository,
    room_id: i64,
    check_in: NaiveDate,
    check_out: NaiveDate,
    exclude_booking_id: Option<i64>,
) -> Result<Vec<i64>, AppError> {
    let beds = bed_repo.list_by_room(room_id).await?;
    let mut bed_ids: Vec<i64> = beds.iter().map(|b| b.bed_id).collect();
    bed_ids.sort_unstable();

    if bed_ids.is_empty() {
        return Ok(Vec::new());
    }

    let occupied: HashSet<i64> = assignment_repo
        .occupied_beds(&bed_ids, check_in, check_out, exclude_booking_id)
        .await?
        .into_iter()
        .collect();

    Ok(bed_ids.into_iter().filter(|id| !occupied.contains(id)).collect())
}

pub async fn available_bed_count(
    bed_repo: &dyn BedRepository,
    assignment_repo: &dyn AssignmentRepository,
    room_id: i64,
    check_in: NaiveDate,
    check_out: NaiveDate,
    exclude_booking_id: Option<i64>,
) -> Result<i64, AppError> {
    let free = available_beds(
        bed_repo,
        assignment_repo,
        room_id,
        check_in,
        check_out,
        exclude_booking_id,
    )
    .await?;
    Ok(free.len() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_half_open_boundary() {
        // Checkout day == check-in day of the next stay: no conflict.
        assert!(!intervals_overlap(d("2025-01-01"), d("2025-01-03"), d("2025-01-03"), d("2025-01-05")));
        assert!(intervals_overlap(d("2025-01-01"), d("2025-01-03"), d("2025-01-02"), d("2025-01-04")));
        assert!(intervals_overlap(d("2025-01-01"), d("2025-01-10"), d("2025-01-04"), d("2025-01-05")));
    }
}
