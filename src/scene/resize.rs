use crossbeam::channel::{self, Receiver, Sender};

use crate::scene::surface::SurfaceSize;

/// Sending side handed to whoever watches the host window.
#[derive(Clone, Debug)]
pub struct ResizeNotifier {
    tx: Sender<SurfaceSize>,
}

impl ResizeNotifier {
    /// Queues a size change. Returns `false` once the observing scene is gone.
    pub fn notify(&self, size: SurfaceSize) -> bool {
        self.tx.try_send(size).is_ok()
    }
}

/// Receiving side owned by the scene; dropping it detaches every notifier.
#[derive(Debug)]
pub struct ResizeObserver {
    tx: Sender<SurfaceSize>,
    rx: Receiver<SurfaceSize>,
}

impl ResizeObserver {
    pub fn new() -> Self {
        let (tx, rx) = channel::unbounded();
        Self { tx, rx }
    }

    pub fn notifier(&self) -> ResizeNotifier {
        ResizeNotifier {
            tx: self.tx.clone(),
        }
    }

    /// Drains pending notifications, keeping only the newest.
    pub fn latest(&self) -> Option<SurfaceSize> {
        self.rx.try_iter().last()
    }
}

impl Default for ResizeObserver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_latest_size() {
        let obs = ResizeObserver::new();
        let n = obs.notifier();
        assert!(n.notify(SurfaceSize::new(10, 10)));
        assert!(n.notify(SurfaceSize::new(20, 15)));
        assert_eq!(obs.latest(), Some(SurfaceSize::new(20, 15)));
        assert_eq!(obs.latest(), None);
    }

    #[test]
    fn detached_after_drop() {
        let obs = ResizeObserver::new();
        let n = obs.notifier();
        drop(obs);
        assert!(!n.notify(SurfaceSize::new(1, 1)));
    }
}
