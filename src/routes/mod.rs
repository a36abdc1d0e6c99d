//! Route handlers
//!
//! - items: the method+action dispatch endpoint
//! - health: liveness/uptime check

pub mod health;
pub mod items;

pub use health::*;
pub use items::*;
