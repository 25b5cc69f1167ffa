//! What happened while loading: counts plus the notices worth showing a user.
//!
//! A badly damaged file can produce thousands of errors. The report keeps
//! every count but only a few notices: the first two malformed lines are
//! described individually, the third becomes a single
//! [`Notice::NumerousErrors`], and the rest are counted silently. Only the
//! first referential error is described.

use serde::Serialize;

use crate::ManifestError;

/// Malformed lines described individually before the summary notice.
pub const MALFORMED_NOTICE_LIMIT: usize = 2;

/// A user-facing message produced during a load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum Notice {
    /// A line that could not be parsed and was ignored.
    Malformed { line: usize, message: String },
    /// Replaces further malformed-line notices.
    NumerousErrors,
    /// A line that linked to an object that does not exist. Objects may be
    /// missing from the loaded world.
    DanglingReference { line: usize, message: String },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed { line, message } => {
                write!(f, "error on line {line}, line ignored: {message}")
            }
            Self::NumerousErrors => f.write_str(
                "numerous errors found; the loaded world may not reflect the intended layout",
            ),
            Self::DanglingReference { line, message } => write!(
                f,
                "line {line} links to an object that does not exist ({message}); objects may be missing"
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Lines read, including blanks and comments.
    pub lines: usize,
    /// Records accepted by the engine.
    pub records: usize,
    /// Lines that could not be parsed.
    pub malformed: usize,
    /// Lines that parsed but were refused by the engine.
    pub rejected: usize,
    pub notices: Vec<Notice>,
}

impl LoadReport {
    /// Returns `true` if every non-blank line was loaded.
    pub fn is_clean(&self) -> bool {
        self.malformed == 0 && self.rejected == 0
    }

    pub(crate) fn record_error(&mut self, err: &ManifestError) {
        if err.is_malformed() {
            self.record_malformed(err);
        } else {
            self.record_rejected(err);
        }
    }

    fn record_malformed(&mut self, err: &ManifestError) {
        self.malformed += 1;
        let line = err.line().unwrap_or(0);
        if self.malformed <= MALFORMED_NOTICE_LIMIT {
            tracing::warn!(line, error = %err, "malformed line ignored");
            self.notices.push(Notice::Malformed {
                line,
                message: err.to_string(),
            });
        } else if self.malformed == MALFORMED_NOTICE_LIMIT + 1 {
            tracing::warn!(line, "numerous errors in world description; further ones are only counted");
            self.notices.push(Notice::NumerousErrors);
        } else {
            tracing::debug!(line, error = %err, "malformed line ignored");
        }
    }

    fn record_rejected(&mut self, err: &ManifestError) {
        self.rejected += 1;
        let line = err.line().unwrap_or(0);
        if self.rejected == 1 {
            tracing::warn!(line, error = %err, "line links to a missing object; continuing");
            let message = match err {
                ManifestError::Reference { source, .. } => source.to_string(),
                other => other.to_string(),
            };
            self.notices.push(Notice::DanglingReference { line, message });
        } else {
            tracing::debug!(line, error = %err, "line rejected");
        }
    }
}

#[cfg(test)]
mod tests {
    use harbor::{HarborError, PortId};

    use super::*;

    fn malformed(line: usize) -> ManifestError {
        ManifestError::UnknownKeyword {
            line,
            keyword: "bogus".into(),
        }
    }

    fn dangling(line: usize) -> ManifestError {
        ManifestError::Reference {
            line,
            source: HarborError::UnknownPort(PortId::new(9)),
        }
    }

    #[test]
    fn malformed_notices_stop_after_the_summary() {
        let mut report = LoadReport::default();
        for line in 1..=6 {
            report.record_error(&malformed(line));
        }
        assert_eq!(report.malformed, 6);
        assert_eq!(report.notices.len(), 3);
        assert!(matches!(report.notices[0], Notice::Malformed { line: 1, .. }));
        assert!(matches!(report.notices[1], Notice::Malformed { line: 2, .. }));
        assert_eq!(report.notices[2], Notice::NumerousErrors);
        assert!(!report.is_clean());
    }

    #[test]
    fn only_the_first_dangling_reference_is_described() {
        let mut report = LoadReport::default();
        report.record_error(&dangling(4));
        report.record_error(&dangling(8));
        assert_eq!(report.rejected, 2);
        assert_eq!(
            report.notices,
            vec![Notice::DanglingReference {
                line: 4,
                message: "Unknown port 9".into()
            }]
        );
    }

    #[test]
    fn the_two_kinds_are_throttled_independently() {
        let mut report = LoadReport::default();
        report.record_error(&dangling(1));
        for line in 2..=4 {
            report.record_error(&malformed(line));
        }
        report.record_error(&dangling(5));
        assert_eq!((report.malformed, report.rejected), (3, 2));
        assert_eq!(report.notices.len(), 4);
    }

    #[test]
    fn notices_render_for_humans() {
        let text = Notice::Malformed {
            line: 12,
            message: "boom".into(),
        }
        .to_string();
        assert_eq!(text, "error on line 12, line ignored: boom");
    }
}
