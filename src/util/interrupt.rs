use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{AptdepsError, Result};

/// Set by Ctrl-C. Batches poll it between units, so a unit that has started
/// (including a running fetch command) is allowed to finish.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes SIGINT to this flag instead of terminating the process.
    pub fn install() -> std::result::Result<Self, ctrlc::Error> {
        let interrupt = Self::new();
        let handle = interrupt.clone();
        ctrlc::set_handler(move || handle.trigger())?;
        Ok(interrupt)
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> Result<()> {
        if self.is_triggered() {
            Err(AptdepsError::Interrupted)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::AptdepsError;
    use crate::util::interrupt::Interrupt;

    #[test]
    fn check_fails_once_triggered_from_any_clone() {
        let interrupt = Interrupt::new();
        interrupt.check().expect("not interrupted yet");

        interrupt.clone().trigger();
        assert!(interrupt.is_triggered());
        let err = interrupt.check().expect_err("interrupted");
        assert!(matches!(err, AptdepsError::Interrupted));
        assert_eq!(err.exit_code(), 130);
    }
}
