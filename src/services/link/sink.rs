use tokio::sync::mpsc;

use crate::models::link::LinkEvent;

/// Where the engine delivers events. Implementations decide what "closed" means.
pub trait ProgressSink {
    /// Delivers one event. Returns `false` once nobody is listening.
    fn emit(&mut self, event: LinkEvent) -> bool;

    /// Checked before every item; a closed sink cancels the rest of the batch.
    fn is_closed(&self) -> bool {
        false
    }
}

impl ProgressSink for Vec<LinkEvent> {
    fn emit(&mut self, event: LinkEvent) -> bool {
        self.push(event);
        true
    }
}

/// Must be driven from a blocking thread, not from inside the runtime.
impl ProgressSink for mpsc::Sender<LinkEvent> {
    fn emit(&mut self, event: LinkEvent) -> bool {
        self.blocking_send(event).is_ok()
    }

    fn is_closed(&self) -> bool {
        mpsc::Sender::is_closed(self)
    }
}
