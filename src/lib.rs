//! Event check-in and lunch-voucher tracker.
//!
//! Attendees live in a single JSON file. Paid attendees get an entry QR code
//! and, later, a lunch QR code. Scanning the entry code toggles the attendee
//! between outside and inside; scanning the lunch code redeems the voucher
//! once. Operator pages sit behind an admin login.

pub mod auth;
pub mod checkin;
pub mod cli;
pub mod config;
pub mod error;
pub mod issuance;
pub mod roster;
pub mod store;
pub mod ui;
pub mod web;
