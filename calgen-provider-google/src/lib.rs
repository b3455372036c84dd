//! calgen-provider-google - Google Calendar backend for calgen
//!
//! Signs in through the OAuth installed-app flow (browser consent plus a
//! local callback listener) and talks to the Calendar v3 API through the
//! `google-calendar` client.

mod calendar;
mod convert;
mod credentials;
mod session;

pub use calendar::GoogleCalendar;
pub use credentials::Credentials;
pub use session::{OAuthFlow, Session};
