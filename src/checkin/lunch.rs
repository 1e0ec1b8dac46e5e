use crate::error::Rejection;

use super::attendee::Attendee;

/// Marks the attendee's lunch as redeemed. A lunch can be claimed once;
/// every later attempt is rejected and leaves the record untouched.
pub fn claim(attendee: &mut Attendee) -> Result<(), Rejection> {
    if attendee.lunch_claimed() {
        return Err(Rejection::AlreadyClaimed);
    }
    attendee.lunch_scanned = Some(true);
    Ok(())
}

pub fn claimed_message(name: &str) -> String {
    format!("Lunch claimed for {name}")
}
