use std::sync::mpsc::{self, Receiver, Sender};

use serde::{Deserialize, Serialize};

use crate::config::Settings;

/// Message sent to other running contexts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Message {
    SettingsUpdated { settings: Settings },
}

/// Outcome of a fire-and-forget notification.
#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Delivery {
    Delivered,
    /// Nobody listens. Not an error.
    NoListener,
}

pub fn channel() -> (Notifier, Listener) {
    let (sender, receiver) = mpsc::channel();
    (
        Notifier {
            sender: Some(sender),
        },
        Listener { receiver },
    )
}

#[derive(Debug, Clone)]
pub struct Notifier {
    sender: Option<Sender<Message>>,
}

impl Notifier {
    /// A notifier with no listener attached.
    pub fn detached() -> Self {
        Self { sender: None }
    }

    pub fn notify(&self, message: Message) -> Delivery {
        match &self.sender {
            Some(sender) if sender.send(message).is_ok() => Delivery::Delivered,
            _ => Delivery::NoListener,
        }
    }
}

#[derive(Debug)]
pub struct Listener {
    receiver: Receiver<Message>,
}

impl Listener {
    /// Takes every message received so far without blocking.
    pub fn drain(&self) -> Vec<Message> {
        self.receiver.try_iter().collect()
    }
}
