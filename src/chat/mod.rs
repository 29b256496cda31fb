pub mod controller;
pub mod message;
pub mod operations;
pub mod session;
pub mod transcript;

pub use controller::ChatController;
pub use message::ChatMessage;
pub use operations::RenderSettings;
