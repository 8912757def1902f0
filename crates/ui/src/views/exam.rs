mod advisory;
mod attempt;
mod quiz;
mod result;

pub use attempt::AttemptView;
#[cfg(test)]
pub(crate) use advisory::AdvisoryTestHandles;
#[cfg(test)]
pub(crate) use attempt::ExamTestHandles;
