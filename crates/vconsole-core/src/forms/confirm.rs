//! Confirmation dialogs for destructive or outgoing user actions.

/// Yes/no dialog holding the record an action will apply to.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation<T> {
    target: Option<T>,
}

impl<T> Default for Confirmation<T> {
    fn default() -> Self {
        Self { target: None }
    }
}

impl<T> Confirmation<T> {
    pub fn ask(&mut self, target: T) {
        self.target = Some(target);
    }

    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    /// Closes the dialog, returning what was confirmed.
    pub fn take(&mut self) -> Option<T> {
        self.target.take()
    }

    pub fn cancel(&mut self) {
        self.target = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_closes() {
        let mut confirm = Confirmation::default();
        confirm.ask(5);
        assert_eq!(confirm.target(), Some(&5));
        assert_eq!(confirm.take(), Some(5));
        assert!(!confirm.is_open());
        confirm.ask(6);
        confirm.cancel();
        assert_eq!(confirm.take(), None);
    }
}
