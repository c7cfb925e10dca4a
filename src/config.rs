/// How often a transaction is repeated while the bus reports transient contention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RetryPolicy {
    /// Retry for as long as the bus keeps reporting transient errors.
    ///
    /// A bus that never recovers blocks the caller forever.
    #[default]
    Unbounded,
    /// Give up after `attempts` tries in total (a value of zero still makes one attempt).
    ///
    /// Running out is reported as a peripheral fault.
    Bounded { attempts: u32 },
}

impl RetryPolicy {
    /// Whether another attempt is allowed after `attempts` have already failed.
    pub(crate) fn allows(self, attempts: u32) -> bool {
        match self {
            RetryPolicy::Unbounded => true,
            RetryPolicy::Bounded { attempts: max } => attempts < max.max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub retry: RetryPolicy,
}

impl Config {
    pub const fn new() -> Self {
        Self {
            retry: RetryPolicy::Unbounded,
        }
    }

    pub const fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
