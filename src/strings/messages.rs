//! # Messages
//!
//! Contains constant strings and format functions for user-facing messages.

pub const WORKING: &str = "One moment...";
pub const SCHEDULED_SCRAPE: &str = "Performing scheduled scrape...";
pub const SCRAPE_FAILED: &str = "Error scraping ads (see console)";

pub fn new_ads_header(count: usize) -> String {
    format!("~~~ {count} ads since last scrape ~~~")
}

pub fn last_ads_header(count: usize) -> String {
    format!("~~~ last ads scraped ({count}) ~~~")
}

pub fn unknown_command(command: &str) -> String {
    format!("unknown command '{command}'")
}

pub fn property_value(key: &str, value: &str) -> String {
    format!("{key}: {value}")
}

pub fn property_changed(key: &str, old: &str, new: &str) -> String {
    format!("{key}: {old} -> {new}")
}

pub fn section(title: &str) -> String {
    format!("~~~ {title} ~~~")
}
