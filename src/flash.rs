//! State for the "invalid input" flash shown by a UI adapter.
//!
//! When an edit is refused the host may briefly change some visual value
//! (say, the text colour) and restore it afterwards. Flashes can overlap: a
//! second refusal may arrive while the first flash is still showing. Only
//! the value saved by the first `begin` is the real original, and only the
//! most recent flash may restore it.
//!
//! # Example
//!
//! ```
//! use card_input::InvalidFlash;
//!
//! let mut flash = InvalidFlash::new();
//! let mut colour = "black";
//!
//! let first = flash.begin(colour);
//! colour = "red";
//! let second = flash.begin(colour);
//!
//! // The first flash ends while the second is still showing
//! assert_eq!(flash.finish(first), None);
//! // The second restores the original
//! assert_eq!(flash.finish(second), Some("black"));
//! ```

/// Identifies one `begin` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlashTicket(u64);

/// One saved value plus the generation of the latest flash.
#[derive(Debug, Clone, Default)]
pub struct InvalidFlash<C> {
    saved: Option<C>,
    generation: u64,
}

impl<C> InvalidFlash<C> {
    /// Creates an idle flash.
    pub fn new() -> Self {
        Self {
            saved: None,
            generation: 0,
        }
    }

    /// Starts a flash, saving `current` unless a flash is already showing.
    pub fn begin(&mut self, current: C) -> FlashTicket {
        if self.saved.is_none() {
            self.saved = Some(current);
        }
        self.generation = self.generation.wrapping_add(1);
        FlashTicket(self.generation)
    }

    /// Ends a flash.
    ///
    /// Returns the value to restore when `ticket` belongs to the latest
    /// flash, and goes idle. Stale tickets return `None`.
    pub fn finish(&mut self, ticket: FlashTicket) -> Option<C> {
        if ticket.0 != self.generation {
            return None;
        }
        self.saved.take()
    }

    /// Abandons any flash in flight, returning the saved value.
    pub fn cancel(&mut self) -> Option<C> {
        self.generation = self.generation.wrapping_add(1);
        self.saved.take()
    }

    /// Returns true while a flash is showing.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.saved.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_flash() {
        let mut flash = InvalidFlash::new();
        assert!(!flash.is_active());
        let ticket = flash.begin(1);
        assert!(flash.is_active());
        assert_eq!(flash.finish(ticket), Some(1));
        assert!(!flash.is_active());
        assert_eq!(flash.finish(ticket), None);
    }

    #[test]
    fn test_overlapping_flashes_keep_original() {
        let mut flash = InvalidFlash::new();
        let a = flash.begin("normal");
        let b = flash.begin("flash");
        let c = flash.begin("flash");
        assert_eq!(flash.finish(a), None);
        assert_eq!(flash.finish(b), None);
        assert!(flash.is_active());
        assert_eq!(flash.finish(c), Some("normal"));
    }

    #[test]
    fn test_cancel() {
        let mut flash = InvalidFlash::new();
        let ticket = flash.begin('x');
        assert_eq!(flash.cancel(), Some('x'));
        assert_eq!(flash.finish(ticket), None);
        assert_eq!(flash.cancel(), None);
    }

    #[test]
    fn test_restart_after_finish() {
        let mut flash = InvalidFlash::new();
        let first = flash.begin(1);
        flash.finish(first);
        let second = flash.begin(2);
        assert_ne!(first, second);
        assert_eq!(flash.finish(second), Some(2));
    }
}
