//! Command dispatch to synthetic media keys
//!
//! Injection is best effort: a failed tap is logged and dropped, never
//! retried, and never stops the pipeline.

mod injector;

pub use injector::{CommandInjector, KeyInjector, LogInjector};

use crate::gesture::Command;

/// Logical media keys the injector understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKey {
    VolumeUp,
    VolumeDown,
    Mute,
    PlayPause,
}

impl MediaKey {
    pub const ALL: [Self; 4] = [Self::VolumeUp, Self::VolumeDown, Self::Mute, Self::PlayPause];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::VolumeUp => "volume-up",
            Self::VolumeDown => "volume-down",
            Self::Mute => "mute",
            Self::PlayPause => "play-pause",
        }
    }
}

impl From<Command> for MediaKey {
    fn from(command: Command) -> Self {
        match command {
            Command::VolumeUp => Self::VolumeUp,
            Command::VolumeDown => Self::VolumeDown,
            Command::Mute => Self::Mute,
            // Media keys toggle; play and pause share one key
            Command::PlayPause(_) => Self::PlayPause,
        }
    }
}

/// Maps commands to key taps on an injector
#[derive(Debug)]
pub struct ActionDispatcher<I> {
    injector: I,
    failures: u64,
}

impl<I: KeyInjector> ActionDispatcher<I> {
    #[must_use]
    pub const fn new(injector: I) -> Self {
        Self {
            injector,
            failures: 0,
        }
    }

    /// Tap the key for `command`
    pub fn dispatch(&mut self, command: Command) {
        let key = MediaKey::from(command);
        if let Err(e) = self.injector.tap(key) {
            self.failures += 1;
            tracing::warn!(command = %command, key = key.name(), error = %e, "key dispatch failed");
        }
    }

    /// Taps that could not be delivered
    #[must_use]
    pub const fn failures(&self) -> u64 {
        self.failures
    }

    #[must_use]
    pub const fn injector(&self) -> &I {
        &self.injector
    }
}
