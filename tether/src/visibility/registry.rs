use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use memdom::{Document, IntersectionCallback, IntersectionEntry, NodeId, ObserverId};

use super::factory::ObserverFactory;
use super::{VisibilityCallback, WatchOptions};

/// Identity of a `WatchOptions` allocation. The registry holds a clone of
/// the `Rc` for as long as the key is in use, so the address cannot be
/// recycled by a different allocation meanwhile.
type OptionsKey = usize;

fn options_key(options: &Rc<WatchOptions>) -> OptionsKey {
    Rc::as_ptr(options) as usize
}

/// A target's callback and the number of live observations of it.
struct TargetSlot {
    callback: VisibilityCallback,
    watchers: usize,
}

struct Registration {
    /// Keeps the allocation behind the key alive.
    _options: Rc<WatchOptions>,
    observer: ObserverId,
    targets: HashMap<NodeId, TargetSlot>,
}

#[derive(Default)]
struct RegistryInner {
    entries: HashMap<OptionsKey, Registration>,
}

/// One live observation made through a [`VisibilityRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Observation {
    key: OptionsKey,
    target: NodeId,
}

impl Observation {
    pub fn target(&self) -> NodeId {
        self.target
    }
}

/// Shares intersection observers between watchers.
///
/// There is at most one observer per options allocation: watchers passing
/// clones of the same `Rc<WatchOptions>` share it, while two separately
/// built but equal options get separate observers, since an observer's
/// configuration is fixed when it is created. An observer is disconnected
/// and forgotten when its last target is unobserved.
///
/// Several watchers may observe the same target with the same options. The
/// target stays observed until the last of them is gone.
///
/// Cloning the registry yields another handle to the same registrations.
/// It is `!Send` and so stays on the thread that owns the document.
#[derive(Clone, Default)]
pub struct VisibilityRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl VisibilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe `target` with `options`, creating the observer on first use.
    pub fn observe<F: ObserverFactory>(
        &self,
        platform: &mut F,
        target: NodeId,
        options: &Rc<WatchOptions>,
    ) -> Observation {
        let key = options_key(options);
        let existing = self.inner.borrow().entries.get(&key).map(|r| r.observer);

        let observer = match existing {
            Some(observer) => observer,
            None => {
                let observer = platform.create_observer(options.init(), self.fan_out(key));
                self.inner.borrow_mut().entries.insert(
                    key,
                    Registration {
                        _options: Rc::clone(options),
                        observer,
                        targets: HashMap::new(),
                    },
                );
                log::debug!("visibility: new observer {observer:?} for options {key:#x}");
                observer
            }
        };

        let first = match self.inner.borrow_mut().entries.get_mut(&key) {
            Some(registration) => {
                let slot = registration.targets.entry(target).or_insert_with(|| TargetSlot {
                    callback: Rc::clone(&options.callback),
                    watchers: 0,
                });
                slot.watchers += 1;
                slot.watchers == 1
            }
            None => false,
        };
        if first {
            platform.observe(observer, target);
        }

        Observation { key, target }
    }

    /// Stop an observation. The target is unobserved once no watcher uses
    /// it, and the observer is disconnected once it has no targets.
    pub fn unobserve<F: ObserverFactory>(&self, platform: &mut F, observation: Observation) {
        let (observer, last) = {
            let mut inner = self.inner.borrow_mut();
            let Some(registration) = inner.entries.get_mut(&observation.key) else {
                return;
            };
            let Some(slot) = registration.targets.get_mut(&observation.target) else {
                return;
            };
            slot.watchers -= 1;
            if slot.watchers > 0 {
                return;
            }
            registration.targets.remove(&observation.target);
            (registration.observer, registration.targets.is_empty())
        };

        platform.unobserve(observer, observation.target);
        if last {
            let removed = self.inner.borrow_mut().entries.remove(&observation.key);
            if let Some(registration) = removed {
                log::debug!(
                    "visibility: last target gone, disconnecting {:?}",
                    registration.observer
                );
                platform.disconnect(registration.observer);
            }
        }
    }

    /// Observer callback routing each entry to its target's callback.
    fn fan_out(&self, key: OptionsKey) -> IntersectionCallback {
        let inner: Weak<RefCell<RegistryInner>> = Rc::downgrade(&self.inner);
        Rc::new(move |doc: &mut Document, entries: &[IntersectionEntry]| {
            let Some(inner) = inner.upgrade() else {
                return;
            };
            for entry in entries {
                let callback = inner
                    .borrow()
                    .entries
                    .get(&key)
                    .and_then(|r| r.targets.get(&entry.target))
                    .map(|slot| Rc::clone(&slot.callback));
                if let Some(callback) = callback {
                    callback(doc, entry);
                }
            }
        })
    }

    /// Number of live observers.
    pub fn observer_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Observer serving `options`, if any target currently uses it.
    pub fn observer_for(&self, options: &Rc<WatchOptions>) -> Option<ObserverId> {
        self.inner
            .borrow()
            .entries
            .get(&options_key(options))
            .map(|r| r.observer)
    }

    /// Distinct targets observed with `options`.
    pub fn target_count(&self, options: &Rc<WatchOptions>) -> usize {
        self.inner
            .borrow()
            .entries
            .get(&options_key(options))
            .map_or(0, |r| r.targets.len())
    }
}

impl fmt::Debug for VisibilityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisibilityRegistry")
            .field("observers", &self.observer_count())
            .finish()
    }
}
