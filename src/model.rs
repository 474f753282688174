use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Model field that changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelField {
    /// The command string, owned by the backend side
    Command,
    /// Cosmetic theme, not part of the protocol state machine
    Theme,
}

type Listener = Box<dyn FnMut(ModelField, &str)>;

struct ListenerEntry {
    alive: Rc<Cell<bool>>,
    callback: Listener,
}

struct ModelInner {
    command: String,
    theme: String,
    listeners: Vec<ListenerEntry>,
}

/// Host-synchronized model fields shared between widget and host binding.
///
/// Single-threaded by design: one logical control thread services UI events,
/// protocol messages and refresh ticks, so a shared handle with interior
/// mutability is sufficient. Listeners are notified synchronously on change.
///
/// A callback may subscribe new listeners or drop its own [`Subscription`];
/// either takes effect from the next notification onwards.
#[derive(Clone)]
pub struct SharedModel {
    inner: Rc<RefCell<ModelInner>>,
}

impl SharedModel {
    pub fn new(command: impl Into<String>, theme: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ModelInner {
                command: command.into(),
                theme: theme.into(),
                listeners: Vec::new(),
            })),
        }
    }

    pub fn command(&self) -> String {
        self.inner.borrow().command.clone()
    }

    pub fn theme(&self) -> String {
        self.inner.borrow().theme.clone()
    }

    /// Update the command field, notifying listeners when the value changed
    pub fn set_command(&self, value: impl Into<String>) {
        let value = value.into();
        {
            let mut inner = self.inner.borrow_mut();
            if inner.command == value {
                return;
            }
            inner.command = value.clone();
        }
        self.notify(ModelField::Command, &value);
    }

    /// Update the theme field, notifying listeners when the value changed
    pub fn set_theme(&self, value: impl Into<String>) {
        let value = value.into();
        {
            let mut inner = self.inner.borrow_mut();
            if inner.theme == value {
                return;
            }
            inner.theme = value.clone();
        }
        self.notify(ModelField::Theme, &value);
    }

    /// Register a change listener.
    ///
    /// The returned [`Subscription`] removes the listener when dropped, so
    /// every registration has a matching removal path tied to the owner's
    /// lifetime.
    #[must_use]
    pub fn subscribe(&self, listener: impl FnMut(ModelField, &str) + 'static) -> Subscription {
        let alive = Rc::new(Cell::new(true));
        let mut inner = self.inner.borrow_mut();
        inner.listeners.retain(|entry| entry.alive.get());
        inner.listeners.push(ListenerEntry {
            alive: Rc::clone(&alive),
            callback: Box::new(listener),
        });
        Subscription { alive }
    }

    fn notify(&self, field: ModelField, value: &str) {
        // Take the listener list out so callbacks may use the model without
        // hitting a RefCell re-borrow. Dropping a `Subscription` only flips
        // its alive flag, so it stays safe while the list is detached; new
        // subscriptions land in the fresh list and are merged back afterwards.
        let mut taken = std::mem::take(&mut self.inner.borrow_mut().listeners);
        for entry in &mut taken {
            if entry.alive.get() {
                (entry.callback)(field, value);
            }
        }
        let mut inner = self.inner.borrow_mut();
        let added = std::mem::take(&mut inner.listeners);
        inner.listeners = taken;
        inner.listeners.extend(added);
        inner.listeners.retain(|entry| entry.alive.get());
    }

    #[cfg(test)]
    fn live_listeners(&self) -> usize {
        self.inner
            .borrow()
            .listeners
            .iter()
            .filter(|entry| entry.alive.get())
            .count()
    }

    #[cfg(test)]
    fn listener_slots(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Scoped handle for a registered model listener; unsubscribes on drop
pub struct Subscription {
    alive: Rc<Cell<bool>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.alive.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_model_exposes_initial_fields() {
        let model = SharedModel::new("echo hi", "dark");
        assert_eq!(model.command(), "echo hi");
        assert_eq!(model.theme(), "dark");
    }

    #[test]
    fn shared_model_notifies_listeners_on_change() {
        let model = SharedModel::new("echo hi", "dark");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let _sub = model.subscribe(move |field, value| {
            seen_clone.borrow_mut().push((field, value.to_string()));
        });

        model.set_theme("light");
        model.set_command("ls");

        assert_eq!(
            *seen.borrow(),
            vec![
                (ModelField::Theme, "light".to_string()),
                (ModelField::Command, "ls".to_string()),
            ]
        );
    }

    #[test]
    fn shared_model_skips_notification_when_value_unchanged() {
        let model = SharedModel::new("echo hi", "dark");
        let count = Rc::new(RefCell::new(0));
        let count_clone = Rc::clone(&count);
        let _sub = model.subscribe(move |_, _| *count_clone.borrow_mut() += 1);

        model.set_theme("dark");
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn subscription_drop_removes_listener() {
        let model = SharedModel::new("echo hi", "dark");
        let count = Rc::new(RefCell::new(0));
        let count_clone = Rc::clone(&count);
        let sub = model.subscribe(move |_, _| *count_clone.borrow_mut() += 1);
        assert_eq!(model.live_listeners(), 1);

        drop(sub);
        assert_eq!(model.live_listeners(), 0);

        model.set_theme("light");
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn subscription_dropped_inside_callback_stays_removed() {
        let model = SharedModel::new("echo hi", "dark");
        let holder: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let count = Rc::new(Cell::new(0));
        let holder_clone = Rc::clone(&holder);
        let count_clone = Rc::clone(&count);
        let sub = model.subscribe(move |_, _| {
            count_clone.set(count_clone.get() + 1);
            holder_clone.borrow_mut().take();
        });
        *holder.borrow_mut() = Some(sub);

        model.set_theme("light");
        model.set_theme("solarized");

        assert_eq!(count.get(), 1);
        assert_eq!(model.live_listeners(), 0);
    }

    #[test]
    fn subscribe_inside_callback_takes_effect_on_next_change() {
        let model = SharedModel::new("echo hi", "dark");
        let inner_count = Rc::new(Cell::new(0));
        let subs: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));
        let model_clone = model.clone();
        let inner_clone = Rc::clone(&inner_count);
        let subs_clone = Rc::clone(&subs);
        let _sub = model.subscribe(move |_, _| {
            if subs_clone.borrow().is_empty() {
                let count = Rc::clone(&inner_clone);
                let sub = model_clone.subscribe(move |_, _| count.set(count.get() + 1));
                subs_clone.borrow_mut().push(sub);
            }
        });

        model.set_theme("light");
        // registered mid-notification, so it missed that change
        assert_eq!(inner_count.get(), 0);

        model.set_theme("solarized");
        assert_eq!(inner_count.get(), 1);
    }

    #[test]
    fn dead_listener_slots_are_swept() {
        let model = SharedModel::new("echo hi", "dark");
        for _ in 0..10 {
            let sub = model.subscribe(|_, _| {});
            drop(sub);
        }
        assert!(model.listener_slots() <= 1);

        model.set_theme("light");
        assert_eq!(model.listener_slots(), 0);
    }

    #[test]
    fn subscription_drop_after_model_is_gone_is_harmless() {
        let model = SharedModel::new("echo hi", "dark");
        let sub = model.subscribe(|_, _| {});
        drop(model);
        drop(sub);
    }

    #[test]
    fn shared_model_clones_share_state() {
        let model = SharedModel::new("echo hi", "dark");
        let clone = model.clone();

        clone.set_command("pwd");
        assert_eq!(model.command(), "pwd");
    }
}
