use serde::Serialize;

/// Input events the modal dialog reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalEvent {
    Open,
    Close,
    /// Click on the dimmed backdrop outside the dialog body
    BackdropClick,
    /// Click inside the dialog body
    ContentClick,
    EscapeKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ModalState {
    pub open: bool,
}

impl ModalState {
    pub fn handle(&mut self, event: ModalEvent) {
        self.open = match event {
            ModalEvent::Open => true,
            ModalEvent::Close | ModalEvent::BackdropClick | ModalEvent::EscapeKey => false,
            ModalEvent::ContentClick => self.open,
        };
    }
}
