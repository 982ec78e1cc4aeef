//! Tip sources.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use thiserror::Error;

/// Advisory fetch errors.
#[derive(Error, Debug)]
pub enum AdvisoryError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("unexpected response shape: {0}")]
    BadResponse(String),

    #[error("empty tip returned")]
    Empty,
}

pub type AdvisoryResult<T> = Result<T, AdvisoryError>;

/// Something that can produce one advisory line for the ticker.
#[async_trait]
pub trait TipSource: Send + Sync {
    /// Fetch the next tip. May fail or time out; callers keep their last
    /// good line when it does.
    async fn fetch_tip(&self) -> AdvisoryResult<String>;
}

/// Offline rotating source of canned guidance lines.
///
/// The default when no remote model is configured, and the test stand-in.
pub struct StaticTips {
    tips: Vec<String>,
    next: AtomicUsize,
}

impl StaticTips {
    pub fn new(tips: Vec<String>) -> Self {
        Self {
            tips,
            next: AtomicUsize::new(0),
        }
    }
}

impl Default for StaticTips {
    fn default() -> Self {
        Self::new(vec![
            "Stay hydrated and reach out to the help desk if you need assistance.".into(),
            "Please keep corridors clear for patient trolleys.".into(),
            "Phones on silent help keep the recovery area calm.".into(),
            "Wash or sanitize your hands before entering the ward.".into(),
        ])
    }
}

#[async_trait]
impl TipSource for StaticTips {
    async fn fetch_tip(&self) -> AdvisoryResult<String> {
        if self.tips.is_empty() {
            return Err(AdvisoryError::Empty);
        }
        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.tips.len();
        Ok(self.tips[index].clone())
    }
}
