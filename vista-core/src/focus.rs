//! Single-slot pointer focus for an ordered collection

/// Index of the item currently under the pointer, if any.
///
/// A leave only clears the slot when it comes from the item that holds it, so
/// a late leave from a previously focused item cannot clobber a newer enter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusIndex {
    current: Option<usize>,
}

impl FocusIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_enter(&mut self, index: usize) {
        self.current = Some(index);
    }

    pub fn on_leave(&mut self, index: usize) {
        if self.current == Some(index) {
            self.current = None;
        }
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn is_focused(&self, index: usize) -> bool {
        self.current == Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_leave_is_ignored() {
        let mut focus = FocusIndex::new();
        focus.on_enter(3);
        focus.on_leave(2);
        assert_eq!(focus.current(), Some(3));
    }

    #[test]
    fn test_matching_leave_clears() {
        let mut focus = FocusIndex::new();
        focus.on_enter(3);
        focus.on_leave(3);
        assert_eq!(focus.current(), None);
    }

    #[test]
    fn test_enter_overwrites() {
        let mut focus = FocusIndex::new();
        focus.on_enter(1);
        focus.on_enter(4);
        assert!(focus.is_focused(4));
        assert!(!focus.is_focused(1));

        // Leave events arriving out of order after a fast sweep
        focus.on_leave(1);
        assert_eq!(focus.current(), Some(4));
    }
}
