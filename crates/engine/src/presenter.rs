//! Seam towards the presentation surface.
//!
//! The engine never renders anything. When it needs the user (a
//! confirmation before a destructive operation, or a notice that something
//! went wrong) it goes through a [`Presenter`].

use std::sync::atomic::{AtomicBool, Ordering};

use bookpath_core::IdentityId;
use parking_lot::Mutex;

/// A user-facing notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The operation needs a signed-in (or otherwise resolved) identity.
    IdentityRequired,
    /// The remote snapshot could not be loaded; the local mirror is shown.
    LoadFailed {
        /// Identity whose tree failed to load.
        identity: IdentityId,
        /// Error text.
        reason: String,
    },
}

/// Presentation callbacks used by the engine.
pub trait Presenter: Send + Sync {
    /// Show a notice to the user.
    fn notify(&self, notice: Notice);

    /// Ask the user to confirm `prompt`. Returns true on yes.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Presenter that records notices and answers confirmations with a fixed
/// value. Useful for headless runs and tests.
#[derive(Debug)]
pub struct RecordingPresenter {
    notices: Mutex<Vec<Notice>>,
    prompts: Mutex<Vec<String>>,
    answer: AtomicBool,
}

impl RecordingPresenter {
    /// Presenter answering every confirmation with `answer`.
    pub fn new(answer: bool) -> Self {
        Self {
            notices: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
            answer: AtomicBool::new(answer),
        }
    }

    /// Change the confirmation answer.
    pub fn set_answer(&self, answer: bool) {
        self.answer.store(answer, Ordering::Release);
    }

    /// Notices received so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    /// Prompts asked so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

impl Default for RecordingPresenter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Presenter for RecordingPresenter {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().push(prompt.to_string());
        self.answer.load(Ordering::Acquire)
    }
}
