use chrono::{DateTime, Utc};

use exam_core::model::{ExamConfig, ExamScore};
use exam_core::{ExamProgress, ExamSession};

/// Which screen the rendering layer should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamPage {
    Landing,
    Quiz,
    Result,
}

/// Formats seconds as `m:ss`.
#[must_use]
pub fn format_remaining(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Exam details shown before the attempt starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamDetailsView {
    pub question_count: usize,
    pub duration_minutes: u32,
    pub max_marks: u32,
    pub pass_marks: u32,
    pub pass_percent: u32,
}

impl ExamDetailsView {
    #[must_use]
    pub fn from_config(config: &ExamConfig) -> Self {
        Self {
            question_count: config.question_count(),
            duration_minutes: config.total_duration_secs().div_ceil(60),
            max_marks: config.max_marks(),
            pass_marks: config.pass_marks(),
            pass_percent: config.pass_percent(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub key: String,
    pub text: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackView {
    pub correct: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizView {
    pub index: usize,
    pub number: usize,
    pub total: usize,
    pub qid: String,
    pub prompt: String,
    pub options: Vec<OptionView>,
    pub selected: Option<String>,
    pub checked: bool,
    pub feedback: Option<FeedbackView>,
    pub remaining_secs: u32,
    pub remaining_label: String,
    pub paused: bool,
    pub prev_disabled: bool,
    pub next_disabled: bool,
    pub progress: ExamProgress,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub correct: usize,
    pub wrong: usize,
    pub score: u32,
    pub max_marks: u32,
    pub percent: f64,
    pub percent_label: String,
    pub pass_marks: u32,
    pub passed: bool,
}

impl ResultView {
    #[must_use]
    pub fn from_score(score: &ExamScore) -> Self {
        let percent = score.percent();
        Self {
            correct: score.correct,
            wrong: score.wrong(),
            score: score.score,
            max_marks: score.max_marks,
            percent,
            percent_label: format!("{percent:.2}%"),
            pass_marks: score.pass_marks,
            passed: score.passed(),
        }
    }
}

/// Everything the rendering layer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ExamView {
    Landing(ExamDetailsView),
    Quiz(QuizView),
    Result(ResultView),
}

impl ExamView {
    #[must_use]
    pub fn landing(config: &ExamConfig) -> Self {
        Self::Landing(ExamDetailsView::from_config(config))
    }

    /// Assemble the frame for a session.
    ///
    /// Reads only; callers run the time-up check (`ExamSession::tick`) first.
    #[must_use]
    pub fn for_session(session: &ExamSession, now: DateTime<Utc>) -> Self {
        if let Some(score) = session.score() {
            return Self::Result(ResultView::from_score(score));
        }

        let index = session.current_index();
        let question = session.current_question();
        let selected = session.answer(index).map(ToString::to_string);
        let options = question
            .options()
            .iter()
            .map(|option| OptionView {
                key: option.key().to_string(),
                text: option.text().to_string(),
                selected: selected.as_deref() == Some(option.key().as_str()),
            })
            .collect();
        let feedback = session.feedback(index).map(|feedback| FeedbackView {
            correct: feedback.correct,
            message: feedback.message.clone(),
        });
        let remaining_secs = session.remaining_seconds(now);

        Self::Quiz(QuizView {
            index,
            number: index + 1,
            total: session.len(),
            qid: question.id().to_string(),
            prompt: question.prompt().to_string(),
            options,
            selected,
            checked: session.is_checked(index),
            feedback,
            remaining_secs,
            remaining_label: format_remaining(remaining_secs),
            paused: session.is_paused(),
            prev_disabled: !session.has_previous(),
            next_disabled: !session.has_next(),
            progress: session.progress(),
        })
    }

    #[must_use]
    pub fn page(&self) -> ExamPage {
        match self {
            Self::Landing(_) => ExamPage::Landing,
            Self::Quiz(_) => ExamPage::Quiz,
            Self::Result(_) => ExamPage::Result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use exam_core::model::{AnswerKey, AnswerOption, OptionKey, Question, QuestionId};
    use exam_core::time::fixed_now;

    fn build_session() -> ExamSession {
        let questions = ["B", "A"]
            .iter()
            .enumerate()
            .map(|(i, correct)| {
                Question::new(
                    QuestionId::new(format!("q{i}")).unwrap(),
                    format!("Prompt {i}"),
                    vec![
                        AnswerOption::new(OptionKey::new("A").unwrap(), "first"),
                        AnswerOption::new(OptionKey::new("B").unwrap(), "second"),
                    ],
                    AnswerKey::Single(OptionKey::new(*correct).unwrap()),
                )
                .unwrap()
            })
            .collect();
        let config = ExamConfig::new(1200, 2, 10, 0.7).unwrap();
        ExamSession::start(config, questions, fixed_now()).unwrap()
    }

    #[test]
    fn formats_remaining_time() {
        assert_eq!(format_remaining(1200), "20:00");
        assert_eq!(format_remaining(65), "1:05");
        assert_eq!(format_remaining(0), "0:00");
    }

    #[test]
    fn landing_lists_exam_details() {
        let ExamView::Landing(details) = ExamView::landing(&ExamConfig::default()) else {
            panic!("expected landing");
        };
        assert_eq!(details.question_count, 10);
        assert_eq!(details.duration_minutes, 20);
        assert_eq!(details.max_marks, 100);
        assert_eq!(details.pass_marks, 70);
    }

    #[test]
    fn quiz_view_reflects_selection_and_bounds() {
        let mut session = build_session();
        let now = fixed_now() + Duration::seconds(75);
        session.select_option(0, "B", now).unwrap();
        session.check_answer(0, now).unwrap();

        let view = ExamView::for_session(&session, now);
        assert_eq!(view.page(), ExamPage::Quiz);
        let ExamView::Quiz(quiz) = view else {
            panic!("expected quiz");
        };
        assert_eq!(quiz.number, 1);
        assert_eq!(quiz.selected.as_deref(), Some("B"));
        assert!(quiz.options[1].selected);
        assert!(!quiz.options[0].selected);
        assert!(quiz.checked);
        assert!(quiz.feedback.unwrap().correct);
        assert_eq!(quiz.remaining_label, "18:45");
        assert!(quiz.prev_disabled);
        assert!(!quiz.next_disabled);
    }

    #[test]
    fn result_view_after_submit() {
        let mut session = build_session();
        let now = fixed_now() + Duration::seconds(10);
        session.select_option(0, "B", now).unwrap();
        session.submit(now);

        let ExamView::Result(result) = ExamView::for_session(&session, now) else {
            panic!("expected result");
        };
        assert_eq!(result.correct, 1);
        assert_eq!(result.wrong, 1);
        assert_eq!(result.score, 10);
        assert_eq!(result.percent_label, "50.00%");
        assert_eq!(result.pass_marks, 14);
        assert!(!result.passed);
    }
}
