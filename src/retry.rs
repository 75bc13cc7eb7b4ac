//! Token budget policy for retrying truncated generations

use log::debug;

/// Hard ceiling on Google output tokens
pub const GOOGLE_MAX_OUTPUT_TOKENS: u32 = 8192;

/// Bounded retry policy: grow the token budget after a truncation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy
{   pub max_attempts: usize
  , pub ceiling: u32
}

impl RetryPolicy
{   pub fn new(max_attempts: usize, ceiling: u32) -> Self
    {   RetryPolicy
        {   max_attempts
          , ceiling
        }
    }

    /// Budget for the first attempt
    pub fn initial_budget(&self, requested: u32) -> u32
    {   requested.min(self.ceiling)
    }

    /// Budget for the attempt after a truncation, `None` once the
    /// ceiling is reached
    pub fn next_budget(&self, current: u32) -> Option<u32>
    {   if current >= self.ceiling
        {   debug!("Budget {} already at ceiling", current);
            return None;
        }
        let next = current.saturating_mul(2).min(self.ceiling);
        debug!("Growing token budget {} -> {}", current, next);
        Some(next)
    }
}

impl Default for RetryPolicy
{   fn default() -> Self
    {   RetryPolicy::new(2, GOOGLE_MAX_OUTPUT_TOKENS)
    }
}
