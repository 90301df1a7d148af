//! Workflow rules shared by the scheduler and the review ledger.
//!
//! Everything here is a pure function over ids already loaded from storage, so each rule
//! can be checked before a transaction writes anything.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::error::{Error, Result};
use crate::models::application::ApplicationStatus;
use crate::models::interview::InterviewType;

pub fn validate<T: Validate>(val: &T) -> Result<()> {
    val.validate()?;
    Ok(())
}

/// Drops repeated ids while keeping first-seen order.
pub fn dedup_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Ids from `requested` that are absent from `found`, in request order.
pub fn missing_ids(requested: &[Uuid], found: &[Uuid]) -> Vec<Uuid> {
    let found: HashSet<&Uuid> = found.iter().collect();
    dedup_ids(requested)
        .into_iter()
        .filter(|id| !found.contains(id))
        .collect()
}

/// Fails with `NotFound` naming every unresolved id at once.
pub fn ensure_all_found(entity: &str, requested: &[Uuid], found: &[Uuid]) -> Result<()> {
    let missing = missing_ids(requested, found);
    if missing.is_empty() {
        return Ok(());
    }
    let listed = missing
        .iter()
        .map(Uuid::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Err(Error::NotFound(format!("{} not found: {}", entity, listed)))
}

/// Either bound may be open; when both are given the range must not be inverted.
pub fn ensure_date_range(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Result<()> {
    match (start, end) {
        (Some(start), Some(end)) if start > end => Err(Error::BadRequest(
            "start_date must not be after end_date".to_string(),
        )),
        _ => Ok(()),
    }
}

pub fn ensure_interview_cardinality(
    interview_type: InterviewType,
    application_ids: &[Uuid],
) -> Result<()> {
    if interview_type == InterviewType::Individual && dedup_ids(application_ids).len() > 1 {
        return Err(Error::BadRequest(
            "An INDIVIDUAL interview accepts exactly one application".to_string(),
        ));
    }
    Ok(())
}

/// Applications the scheduler moves forward when they are booked into an interview.
pub fn applications_to_promote(current: &[(Uuid, ApplicationStatus)]) -> Vec<Uuid> {
    current
        .iter()
        .filter(|(_, status)| *status == ApplicationStatus::Applied)
        .map(|(id, _)| *id)
        .collect()
}

/// Participants of one interview, as loaded for review checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Participants {
    pub interviewer_ids: Vec<Uuid>,
    pub application_ids: Vec<Uuid>,
}

impl Participants {
    pub fn has_interviewer(&self, employee_id: Uuid) -> bool {
        self.interviewer_ids.contains(&employee_id)
    }

    pub fn has_application(&self, application_id: Uuid) -> bool {
        self.application_ids.contains(&application_id)
    }
}

/// A reviewer must sit on the interview and the application must be part of it.
pub fn ensure_review_participation(
    participants: &Participants,
    interview_id: Uuid,
    employee_id: Uuid,
    application_id: Uuid,
) -> Result<()> {
    if !participants.has_interviewer(employee_id) {
        return Err(Error::Conflict(format!(
            "Employee {} is not an interviewer for interview {}",
            employee_id, interview_id
        )));
    }
    if !participants.has_application(application_id) {
        return Err(Error::Conflict(format!(
            "Application {} is not part of interview {}",
            application_id, interview_id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn missing_ids_reports_every_unresolved_id_in_order() {
        let all = ids(4);
        let found = vec![all[1], all[3]];
        assert_eq!(missing_ids(&all, &found), vec![all[0], all[2]]);
    }

    #[test]
    fn missing_ids_ignores_duplicates_in_request() {
        let a = Uuid::new_v4();
        assert_eq!(missing_ids(&[a, a], &[]), vec![a]);
    }

    #[test]
    fn ensure_all_found_lists_all_missing_ids() {
        let all = ids(3);
        let err = ensure_all_found("Applications", &all, &all[..1]).unwrap_err();
        match err {
            Error::NotFound(msg) => {
                assert!(msg.contains(&all[1].to_string()));
                assert!(msg.contains(&all[2].to_string()));
                assert!(!msg.contains(&all[0].to_string()));
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
        assert!(ensure_all_found("Applications", &all, &all).is_ok());
    }

    #[test]
    fn date_range_may_be_open_on_either_side() {
        let now = Utc::now();
        let earlier = now - chrono::Duration::days(1);
        assert!(ensure_date_range(None, None).is_ok());
        assert!(ensure_date_range(Some(now), None).is_ok());
        assert!(ensure_date_range(None, Some(now)).is_ok());
        assert!(ensure_date_range(Some(earlier), Some(now)).is_ok());
        assert!(matches!(
            ensure_date_range(Some(now), Some(earlier)),
            Err(Error::BadRequest(_))
        ));
    }

    #[test]
    fn individual_interview_takes_a_single_application() {
        let two = ids(2);
        assert!(matches!(
            ensure_interview_cardinality(InterviewType::Individual, &two),
            Err(Error::BadRequest(_))
        ));
        assert!(ensure_interview_cardinality(InterviewType::Individual, &two[..1]).is_ok());
        assert!(ensure_interview_cardinality(InterviewType::Group, &two).is_ok());
    }

    #[test]
    fn individual_interview_tolerates_a_repeated_id() {
        let a = Uuid::new_v4();
        assert!(ensure_interview_cardinality(InterviewType::Individual, &[a, a]).is_ok());
    }

    #[test]
    fn only_applied_rows_are_promoted() {
        let all = ids(4);
        let current = vec![
            (all[0], ApplicationStatus::Applied),
            (all[1], ApplicationStatus::InProgress),
            (all[2], ApplicationStatus::Hired),
            (all[3], ApplicationStatus::Rejected),
        ];
        assert_eq!(applications_to_promote(&current), vec![all[0]]);
    }

    #[test]
    fn review_requires_interviewer_then_application() {
        let interview = Uuid::new_v4();
        let (e1, e2) = (Uuid::new_v4(), Uuid::new_v4());
        let (a1, a2) = (Uuid::new_v4(), Uuid::new_v4());
        let participants = Participants {
            interviewer_ids: vec![e1],
            application_ids: vec![a1],
        };

        assert!(ensure_review_participation(&participants, interview, e1, a1).is_ok());

        let not_interviewer =
            ensure_review_participation(&participants, interview, e2, a1).unwrap_err();
        assert!(matches!(not_interviewer, Error::Conflict(ref m) if m.contains("not an interviewer")));

        let not_linked = ensure_review_participation(&participants, interview, e1, a2).unwrap_err();
        assert!(matches!(not_linked, Error::Conflict(ref m) if m.contains("not part of")));
    }
}
