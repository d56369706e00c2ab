// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pending application events.
//!
//! Scheduler hooks raise events; the main loop drains them after each scheduler pass. Draining
//! takes a snapshot and clears it, so an event raised while a handler runs is kept for the next
//! pass instead of being lost.

/// Application events, in dispatch order.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Event {
    /// Read the sensor and report.
    SampleDue = 0,
    /// Another minute of uptime has elapsed.
    MinuteMark = 1,
}

impl Event {
    const ALL: [Event; 2] = [Event::SampleDue, Event::MinuteMark];

    #[inline]
    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of raised-but-not-yet-handled events.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct EventFlags {
    bits: u8,
}

impl EventFlags {
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Raising an already pending event is a no-op.
    #[inline]
    pub fn raise(&mut self, event: Event) {
        self.bits |= event.bit();
    }

    #[inline]
    pub fn is_pending(&self, event: Event) -> bool {
        self.bits & event.bit() != 0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Take every pending event, leaving the set empty.
    pub fn drain(&mut self) -> Pending {
        let bits = core::mem::take(&mut self.bits);
        Pending { bits, next: 0 }
    }
}

/// Events taken by [`EventFlags::drain`], yielded in dispatch order.
#[derive(Clone, Debug)]
pub struct Pending {
    bits: u8,
    next: usize,
}

impl Iterator for Pending {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        while let Some(&event) = Event::ALL.get(self.next) {
            self.next += 1;
            if self.bits & event.bit() != 0 {
                return Some(event);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_and_query() {
        let mut flags = EventFlags::new();
        assert!(flags.is_empty());

        flags.raise(Event::MinuteMark);
        assert!(flags.is_pending(Event::MinuteMark));
        assert!(!flags.is_pending(Event::SampleDue));

        flags.raise(Event::MinuteMark);
        assert_eq!(flags.drain().count(), 1);
    }

    #[test]
    fn drain_yields_in_dispatch_order_and_clears() {
        let mut flags = EventFlags::new();
        flags.raise(Event::MinuteMark);
        flags.raise(Event::SampleDue);

        let drained: Vec<Event> = flags.drain().collect();
        assert_eq!(drained, [Event::SampleDue, Event::MinuteMark]);
        assert!(flags.is_empty());
        assert_eq!(flags.drain().next(), None);
    }

    #[test]
    fn raise_during_dispatch_survives_to_next_pass() {
        let mut flags = EventFlags::new();
        flags.raise(Event::SampleDue);

        let mut handled = 0;
        for event in flags.drain() {
            assert_eq!(event, Event::SampleDue);
            handled += 1;
            // Handler blocks long enough for the next second to elapse.
            flags.raise(Event::SampleDue);
        }

        assert_eq!(handled, 1);
        assert!(flags.is_pending(Event::SampleDue));
    }
}
