use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng, rng};

use exam_core::model::{ExamConfig, Question};

use crate::error::ExamError;

/// Sample `count` distinct questions from `bank`.
///
/// The result is in random order and is fully determined by `seed` when one is given.
///
/// # Errors
///
/// Returns `ExamError::BankTooSmall` if the bank holds fewer than `count` questions.
pub fn sample_questions(
    bank: &[Question],
    count: usize,
    seed: Option<u64>,
) -> Result<Vec<Question>, ExamError> {
    if bank.len() < count {
        return Err(ExamError::BankTooSmall {
            available: bank.len(),
            requested: count,
        });
    }

    let picked = match seed {
        Some(seed) => pick(&mut StdRng::seed_from_u64(seed), bank, count),
        None => pick(&mut rng(), bank, count),
    };
    Ok(picked)
}

fn pick<R: Rng + ?Sized>(rng: &mut R, bank: &[Question], count: usize) -> Vec<Question> {
    index::sample(rng, bank.len(), count)
        .into_iter()
        .map(|i| bank[i].clone())
        .collect()
}

/// Selection result for an exam build.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamPlan {
    pub questions: Vec<Question>,
    pub bank_size: usize,
    pub seed: Option<u64>,
}

/// Builds the question set of one attempt from the loaded bank.
pub struct ExamPlanBuilder<'a> {
    config: &'a ExamConfig,
    seed: Option<u64>,
}

impl<'a> ExamPlanBuilder<'a> {
    #[must_use]
    pub fn new(config: &'a ExamConfig) -> Self {
        Self { config, seed: None }
    }

    /// Fix the RNG seed for a reproducible selection.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// # Errors
    ///
    /// Returns `ExamError::BankTooSmall` if the bank cannot fill the exam.
    pub fn build(self, bank: &[Question]) -> Result<ExamPlan, ExamError> {
        let questions = sample_questions(bank, self.config.question_count(), self.seed)?;
        Ok(ExamPlan {
            questions,
            bank_size: bank.len(),
            seed: self.seed,
        })
    }
}
