//! Embassy async tasks
//!
//! Each task owns the GPIO it was handed and talks to the others through
//! the signals in `channels`.

pub mod button;
pub mod encoder;
pub mod relay;
pub mod status;

pub use button::button_task;
pub use encoder::encoder_task;
pub use relay::relay_task;
pub use status::status_task;
