/// Which record, if any, the edit dialog is showing. Exactly one target at a time: opening
/// another record replaces the current one.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalState<T> {
    target: Option<T>,
}

impl<T> Default for ModalState<T> {
    fn default() -> Self {
        Self { target: None }
    }
}

impl<T> ModalState<T> {
    pub fn open(&mut self, target: T) {
        self.target = Some(target);
    }

    pub fn close(&mut self) -> Option<T> {
        self.target.take()
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_target_at_a_time() {
        let mut modal = ModalState::default();
        modal.open(1);
        modal.open(2);
        assert_eq!(modal.target(), Some(&2));
        assert_eq!(modal.close(), Some(2));
        assert!(!modal.is_open());
    }
}
