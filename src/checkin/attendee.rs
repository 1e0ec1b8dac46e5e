use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const LUNCH_TOKEN_PREFIX: &str = "lunch_";

/// Presence of an attendee at the venue.
///
/// `NotScanned` is only ever the initial value; scanning moves an attendee
/// between `Outside` and `Inside` from then on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Presence {
    #[default]
    #[serde(rename = "Not Scanned")]
    NotScanned,
    #[serde(rename = "inside")]
    Inside,
    #[serde(rename = "outside")]
    Outside,
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Presence::NotScanned => write!(f, "Not Scanned"),
            Presence::Inside => write!(f, "inside"),
            Presence::Outside => write!(f, "outside"),
        }
    }
}

/// One row of the attendee data file.
///
/// Keys this crate does not know about are kept in `extra` and written back
/// after the known fields, so a load/save cycle never drops data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub token: String,
    #[serde(default)]
    pub status: Presence,
    #[serde(default)]
    pub paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lunch_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lunch_scanned: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Attendee {
    pub fn new(id: u32, name: String, email: String, token: String, paid: bool) -> Self {
        Self {
            id,
            name,
            email,
            token,
            status: Presence::NotScanned,
            paid,
            lunch_token: None,
            lunch_scanned: None,
            extra: Map::new(),
        }
    }

    pub fn lunch_claimed(&self) -> bool {
        self.lunch_scanned.unwrap_or(false)
    }
}

/// Derives the lunch token for an entry token.
pub fn lunch_token_for(token: &str) -> String {
    format!("{LUNCH_TOKEN_PREFIX}{token}")
}

pub fn find_by_token<'a>(attendees: &'a [Attendee], token: &str) -> Option<&'a Attendee> {
    attendees.iter().find(|a| a.token == token)
}

pub fn find_by_token_mut<'a>(
    attendees: &'a mut [Attendee],
    token: &str,
) -> Option<&'a mut Attendee> {
    attendees.iter_mut().find(|a| a.token == token)
}

pub fn find_by_lunch_token<'a>(
    attendees: &'a [Attendee],
    lunch_token: &str,
) -> Option<&'a Attendee> {
    attendees
        .iter()
        .find(|a| a.lunch_token.as_deref() == Some(lunch_token))
}

pub fn find_by_lunch_token_mut<'a>(
    attendees: &'a mut [Attendee],
    lunch_token: &str,
) -> Option<&'a mut Attendee> {
    attendees
        .iter_mut()
        .find(|a| a.lunch_token.as_deref() == Some(lunch_token))
}

/// Headcount figures shown on the dashboard and by `checkpoint status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RosterSummary {
    pub total: usize,
    pub paid: usize,
    pub inside: usize,
    pub outside: usize,
    pub not_scanned: usize,
    pub lunch_issued: usize,
    pub lunch_claimed: usize,
}

impl RosterSummary {
    pub fn from_attendees(attendees: &[Attendee]) -> Self {
        attendees.iter().fold(Self::default(), |mut s, a| {
            s.total += 1;
            if a.paid {
                s.paid += 1;
            }
            match a.status {
                Presence::Inside => s.inside += 1,
                Presence::Outside => s.outside += 1,
                Presence::NotScanned => s.not_scanned += 1,
            }
            if a.lunch_token.is_some() {
                s.lunch_issued += 1;
            }
            if a.lunch_claimed() {
                s.lunch_claimed += 1;
            }
            s
        })
    }
}
