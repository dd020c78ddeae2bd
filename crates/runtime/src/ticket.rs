/// Identifies one issued query.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub u64);

/// Latest-wins gate for query results.
///
/// Every new query takes a ticket; a result is only accepted if its ticket
/// is still the most recently issued one. Results for superseded queries
/// are dropped on arrival.
#[derive(Debug, Default, Clone)]
pub struct TicketGate {
    issued: u64,
}

impl TicketGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    pub fn latest(&self) -> Option<Ticket> {
        (self.issued > 0).then_some(Ticket(self.issued))
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }

    pub fn accept<T>(&self, ticket: Ticket, result: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(result)
        } else {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.issued,
                "discarding stale result"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TicketGate;

    #[test]
    fn only_latest_ticket_is_accepted() {
        let mut gate = TicketGate::new();
        assert_eq!(gate.latest(), None);

        let first = gate.issue();
        let second = gate.issue();
        assert_eq!(gate.accept(first, "old"), None);
        assert_eq!(gate.accept(second, "new"), Some("new"));
        assert_eq!(gate.latest(), Some(second));
    }
}
