mod attendee;
pub mod lunch;
mod presence;
mod service;

pub use attendee::{
    Attendee, Presence, RosterSummary, find_by_lunch_token, find_by_lunch_token_mut, find_by_token,
    find_by_token_mut, lunch_token_for,
};
pub use presence::{Passage, PresenceMachine};
pub use service::{CheckinService, ScanOutcome, ScanReply};
