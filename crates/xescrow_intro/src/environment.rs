//! Rendering environment capability
//!
//! A page can be rendered ahead of time on a server and later hydrated on the
//! client. Randomized layout must only be produced on the client, otherwise the
//! two renders disagree and the page flashes on hydration.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderingEnvironment {
    /// Pre-rendered output: static, deterministic, no timers
    Server,
    /// Live view: generates particles and drives the intro timer
    Client,
}

impl RenderingEnvironment {
    pub fn is_client(self) -> bool {
        self == RenderingEnvironment::Client
    }

    /// Whether randomized, time-driven output may be produced
    pub fn allows_generation(self) -> bool {
        self.is_client()
    }
}
