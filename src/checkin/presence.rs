use super::attendee::{Attendee, Presence};

/// What a scan at the gate recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passage {
    Entry,
    Exit,
}

impl Passage {
    pub fn message(self, name: &str) -> String {
        match self {
            Passage::Entry => format!("Entry allowed for {name}"),
            Passage::Exit => format!("Exit recorded for {name}"),
        }
    }
}

/// Toggles attendees between `Outside` and `Inside`.
pub struct PresenceMachine;

impl PresenceMachine {
    /// Apply one gate scan to the attendee.
    ///
    /// - `Outside` becomes `Inside` (an entry).
    /// - `NotScanned` and `Inside` both become `Outside` (an exit), so the
    ///   first scan of a fresh ticket is recorded as an exit.
    pub fn scan(attendee: &mut Attendee) -> Passage {
        match attendee.status {
            Presence::Outside => {
                attendee.status = Presence::Inside;
                Passage::Entry
            }
            Presence::NotScanned | Presence::Inside => {
                attendee.status = Presence::Outside;
                Passage::Exit
            }
        }
    }
}
