//! Remote API

pub use crate::remote::recorder::{RecorderSettings, UserRecorder};
pub use crate::remote::traits::{Params, Transport};
pub use crate::remote::vk::{VkSettings, VkTransport};
