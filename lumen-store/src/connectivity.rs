//! Connectivity context.
//!
//! Whoever knows about the network builds one of these and hands it to the
//! code that needs it (see [`Outbox::flush`](crate::outbox::Outbox::flush)).
//! There is no process-wide online flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connectivity {
    online: bool,
    observed_at: DateTime<Utc>,
}

impl Connectivity {
    pub fn online(observed_at: DateTime<Utc>) -> Self {
        Self { online: true, observed_at }
    }

    pub fn offline(observed_at: DateTime<Utc>) -> Self {
        Self { online: false, observed_at }
    }

    pub fn from_flag(online: bool, observed_at: DateTime<Utc>) -> Self {
        Self { online, observed_at }
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    /// When the state was last observed.
    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }
}
