use services::exams::format_remaining;

/// Countdown label shown in the exam sidebar.
#[must_use]
pub fn timer_label(remaining_secs: u32) -> String {
    format!("Time Remaining: {}", format_remaining(remaining_secs))
}

/// Below this many seconds the timer is highlighted.
pub const LOW_TIME_SECS: u32 = 60;
