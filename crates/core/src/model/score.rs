/// Final outcome of a submitted exam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamScore {
    pub correct: usize,
    pub total: usize,
    pub score: u32,
    pub max_marks: u32,
    pub pass_marks: u32,
}

impl ExamScore {
    #[must_use]
    pub fn wrong(&self) -> usize {
        self.total.saturating_sub(self.correct)
    }

    /// Score as a percentage of the maximum marks.
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.max_marks == 0 {
            return 0.0;
        }
        f64::from(self.score) / f64::from(self.max_marks) * 100.0
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.score >= self.pass_marks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_wrong_percent_and_pass() {
        let score = ExamScore {
            correct: 7,
            total: 10,
            score: 70,
            max_marks: 100,
            pass_marks: 70,
        };
        assert_eq!(score.wrong(), 3);
        assert!((score.percent() - 70.0).abs() < f64::EPSILON);
        assert!(score.passed());

        let failing = ExamScore {
            correct: 6,
            score: 60,
            ..score
        };
        assert!(!failing.passed());
    }
}
