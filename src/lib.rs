#![doc(test(attr(deny(warnings))))]

//! Vehicle leasing inquiry assistant: walks a customer from a vehicle category
//! to a completed inquiry and relays it to the leasing desk by email.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod confirmation;
pub mod errors;
pub mod i18n;
pub mod inquiry;
pub mod mail;
pub mod session;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Leasing inquiry tracing initialized.");
    });
}
