mod exam_vm;
mod markdown_vm;
mod time_fmt;

pub use exam_vm::{ExamIntent, ExamVm, start_exam};
pub use markdown_vm::{inline_markdown_to_html, markdown_to_html, sanitize_html};
pub use time_fmt::{LOW_TIME_SECS, timer_label};
