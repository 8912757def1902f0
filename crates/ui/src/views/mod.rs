mod exam;
mod landing;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use exam::AttemptView;
pub use landing::LandingView;
pub use state::{ViewError, ViewState, view_state_from_resource};
