/// An event stamped with its dispatch position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequenced<E> {
    pub seq: u64,
    pub event: E,
}

/// Append-only, ordered event log.
///
/// Events are numbered in emission order starting at 0; numbering survives
/// `drain` so consumers can detect gaps.
#[derive(Debug)]
pub struct EventBus<E> {
    next_seq: u64,
    events: Vec<Sequenced<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            next_seq: 0,
            events: Vec::new(),
        }
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: E) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Sequenced { seq, event });
        seq
    }

    pub fn events(&self) -> &[Sequenced<E>] {
        &self.events
    }

    pub fn last(&self) -> Option<&E> {
        self.events.last().map(|s| &s.event)
    }

    pub fn drain(&mut self) -> Vec<Sequenced<E>> {
        std::mem::take(&mut self.events)
    }
}
