use async_channel::{Receiver, Sender, TryRecvError};
use derive_more::{Display, From, Into};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
pub struct ListenerId(u64);

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(ListenerId, Sender<Viewport>)>,
}

/// The host's window resize channel, shared by every mounted chart.
///
/// Each chart holds its own [`ResizeSubscription`]; dropping it removes exactly
/// that listener and nothing else.
#[derive(Clone, Default)]
pub struct ResizeBus {
    registry: Arc<Mutex<Registry>>,
}

impl ResizeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> ResizeSubscription {
        let (tx, rx) = async_channel::unbounded();
        let mut registry = self.registry.lock();
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        registry.listeners.push((id, tx));
        log::trace!("resize listener {} registered", id);

        ResizeSubscription {
            id,
            rx,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Delivers a resize to every registered listener, returning how many got it.
    pub fn notify(&self, viewport: Viewport) -> usize {
        self.registry
            .lock()
            .listeners
            .iter()
            .filter(|(_, tx)| tx.try_send(viewport).is_ok())
            .count()
    }

    pub fn listener_count(&self) -> usize {
        self.registry.lock().listeners.len()
    }

    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.registry
            .lock()
            .listeners
            .iter()
            .any(|(listener, _)| *listener == id)
    }
}

pub struct ResizeSubscription {
    id: ListenerId,
    rx: Receiver<Viewport>,
    registry: Weak<Mutex<Registry>>,
}

impl ResizeSubscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Takes every pending notification without blocking.
    pub fn drain(&self) -> Vec<Viewport> {
        let mut pending = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(viewport) => pending.push(viewport),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        pending
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .listeners
                .retain(|(listener, _)| *listener != self.id);
            log::trace!("resize listener {} removed", self.id);
        }
    }
}
