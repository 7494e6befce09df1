use chrono::NaiveDate;
use serde::Serialize;

use crate::parser::types::TicketRecord;

/// SLA compliance of one ticket. Always derived, never read from input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SlaStatus {
    WithinSla,
    CrossedSla,
}

impl SlaStatus {
    pub fn label(self) -> &'static str {
        match self {
            SlaStatus::WithinSla => "Within SLA",
            SlaStatus::CrossedSla => "Crossed SLA",
        }
    }

    pub fn is_crossed(self) -> bool {
        self == SlaStatus::CrossedSla
    }
}

/// Which evidence the classifier looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlaBasis {
    /// GitLab due date against today, then the overdue flag, then within.
    /// Used for tickets still open.
    DueDateChain,
    /// Overdue flag only, then within. Used for closed tickets, judged on
    /// what the tracker recorded at closure.
    OverdueFlag,
}

/// Classifier bound to one run: `today` is captured once.
#[derive(Debug, Clone, Copy)]
pub struct SlaClassifier {
    today: NaiveDate,
    basis: SlaBasis,
}

impl SlaClassifier {
    pub fn new(today: NaiveDate, basis: SlaBasis) -> Self {
        SlaClassifier { today, basis }
    }

    /// Fallback chain: GitLab due date → overdue flag → within.
    /// Unparsable values were already dropped by the record model, so a
    /// bad cell simply falls through to the next rule.
    pub fn classify(&self, ticket: &TicketRecord) -> SlaStatus {
        if self.basis == SlaBasis::DueDateChain {
            if let Some(due) = ticket.gitlab_due_date {
                return if self.today > due {
                    SlaStatus::CrossedSla
                } else {
                    SlaStatus::WithinSla
                };
            }
        }

        match ticket.overdue {
            Some(true) => SlaStatus::CrossedSla,
            _ => SlaStatus::WithinSla,
        }
    }

    /// True when the GitLab due date is exactly today.
    pub fn due_today(&self, ticket: &TicketRecord) -> bool {
        ticket.gitlab_due_date == Some(self.today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn ticket(due: Option<NaiveDate>, overdue: Option<bool>) -> TicketRecord {
        TicketRecord {
            gitlab_due_date: due,
            overdue,
            ..Default::default()
        }
    }

    #[test]
    fn test_due_yesterday_is_crossed() {
        let c = SlaClassifier::new(today(), SlaBasis::DueDateChain);
        let t = ticket(Some(today() - Duration::days(1)), Some(false));
        assert_eq!(c.classify(&t), SlaStatus::CrossedSla);
    }

    #[test]
    fn test_due_tomorrow_is_within_even_if_flagged() {
        let c = SlaClassifier::new(today(), SlaBasis::DueDateChain);
        let t = ticket(Some(today() + Duration::days(1)), Some(true));
        assert_eq!(c.classify(&t), SlaStatus::WithinSla);
    }

    #[test]
    fn test_due_today_is_within() {
        let c = SlaClassifier::new(today(), SlaBasis::DueDateChain);
        let t = ticket(Some(today()), None);
        assert_eq!(c.classify(&t), SlaStatus::WithinSla);
        assert!(c.due_today(&t));
    }

    #[test]
    fn test_falls_back_to_overdue_flag() {
        let c = SlaClassifier::new(today(), SlaBasis::DueDateChain);
        assert_eq!(c.classify(&ticket(None, Some(true))), SlaStatus::CrossedSla);
        assert_eq!(c.classify(&ticket(None, Some(false))), SlaStatus::WithinSla);
    }

    #[test]
    fn test_no_evidence_is_within() {
        let c = SlaClassifier::new(today(), SlaBasis::DueDateChain);
        assert_eq!(c.classify(&ticket(None, None)), SlaStatus::WithinSla);
    }

    #[test]
    fn test_overdue_basis_ignores_due_date() {
        let c = SlaClassifier::new(today(), SlaBasis::OverdueFlag);
        let past = Some(today() - Duration::days(30));
        assert_eq!(c.classify(&ticket(past, Some(false))), SlaStatus::WithinSla);
        assert_eq!(c.classify(&ticket(past, None)), SlaStatus::WithinSla);
        assert_eq!(c.classify(&ticket(None, Some(true))), SlaStatus::CrossedSla);
    }

    #[test]
    fn test_labels() {
        assert_eq!(SlaStatus::WithinSla.label(), "Within SLA");
        assert_eq!(SlaStatus::CrossedSla.label(), "Crossed SLA");
        assert!(SlaStatus::CrossedSla.is_crossed());
    }
}
