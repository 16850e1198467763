//! Remote API access
//!
//! [`Transport`] is the raw request/response seam; [`VkTransport`] speaks the
//! VK HTTP API. [`UserRecorder`] chains the two calls made per user with the
//! sink write, and is what workers run for each item.

pub mod api;
pub mod recorder;
pub mod traits;
pub mod vk;

pub use recorder::{RecorderSettings, UserRecorder, DEFAULT_FIELDS, DEFAULT_WALL_LIMIT};
pub use traits::{Params, Transport};
pub use vk::{VkSettings, VkTransport, DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
