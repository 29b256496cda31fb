pub mod intent;
pub mod resolve;
pub mod rules;

pub use intent::{Intent, IntentContext};
pub use rules::{fields_response, interpret};
