mod message;
mod mood;
mod reading;
mod vital;

pub use message::BiblicalMessage;
pub use mood::Mood;
pub use reading::Reading;
pub use vital::{has_systolic, unit_for, VitalType};
