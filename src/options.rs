use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::PackError;

/// What to do with a box that is wider or taller than the bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OversizePolicy {
    /// Leave it out and list it in `Packing::dropped`.
    #[default]
    Drop,
    /// Fail the whole call with `PackError::Oversized`.
    Reject,
}

#[derive(Debug, Clone, Default)]
pub struct PackOptions {
    pub oversize: OversizePolicy,
    /// Wall-clock budget for one engine call.
    pub time_limit: Option<Duration>,
    /// Shared flag; setting it makes a running call return `PackError::Cancelled`.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl PackOptions {
    pub fn with_oversize(mut self, oversize: OversizePolicy) -> Self {
        self.oversize = oversize;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Installs a fresh cancel flag and returns a handle to it.
    pub fn cancel_handle(&mut self) -> Arc<AtomicBool> {
        self.cancel
            .get_or_insert_with(|| Arc::new(AtomicBool::new(false)))
            .clone()
    }

    /// Starts the clock for one call.
    pub fn interrupt(&self) -> Interrupt {
        Interrupt {
            cancel: self.cancel.clone(),
            deadline: self.time_limit.map(|limit| Instant::now() + limit),
        }
    }
}

/// Cooperative cancellation hook polled by the placement loops.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    cancel: Option<Arc<AtomicBool>>,
    deadline: Option<Instant>,
}

impl Interrupt {
    pub fn never() -> Self {
        Self::default()
    }

    pub fn check(&self) -> Result<(), PackError> {
        if let Some(flag) = &self.cancel
            && flag.load(Ordering::Relaxed)
        {
            return Err(PackError::Cancelled);
        }
        if let Some(deadline) = self.deadline
            && Instant::now() >= deadline
        {
            return Err(PackError::DeadlineExceeded);
        }
        Ok(())
    }
}
