//! Key injection backends

use std::path::PathBuf;
use std::process::{Command, Stdio};

use super::MediaKey;
use crate::config::InjectorConfig;
use crate::{Error, Result};

/// Delivers one synthetic key tap (press and release) to the OS
pub trait KeyInjector {
    /// Tap `key`
    ///
    /// # Errors
    ///
    /// Returns error if the OS rejects or cannot deliver the input
    fn tap(&mut self, key: MediaKey) -> Result<()>;
}

impl<I: KeyInjector + ?Sized> KeyInjector for Box<I> {
    fn tap(&mut self, key: MediaKey) -> Result<()> {
        (**self).tap(key)
    }
}

/// Logs taps without touching the OS
#[derive(Debug, Default)]
pub struct LogInjector;

impl KeyInjector for LogInjector {
    fn tap(&mut self, key: MediaKey) -> Result<()> {
        tracing::info!(key = key.name(), "dry run: key tap");
        Ok(())
    }
}

/// Taps keys by running an external program (xdotool, ydotool, ...)
#[derive(Debug)]
pub struct CommandInjector {
    program: PathBuf,
    config: InjectorConfig,
}

impl CommandInjector {
    /// Resolve the configured program on `PATH`
    ///
    /// # Errors
    ///
    /// Returns error if the program cannot be found
    pub fn new(config: &InjectorConfig) -> Result<Self> {
        let program = which::which(&config.program)
            .map_err(|e| Error::Dispatch(format!("{}: {e}", config.program)))?;

        tracing::debug!(program = %program.display(), "key injector ready");

        Ok(Self {
            program,
            config: config.clone(),
        })
    }

    /// Resolved program path
    #[must_use]
    pub const fn program(&self) -> &PathBuf {
        &self.program
    }
}

impl KeyInjector for CommandInjector {
    fn tap(&mut self, key: MediaKey) -> Result<()> {
        let args = self.config.args_for(key);

        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| Error::Dispatch(format!("failed to run injector: {e}")))?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Dispatch(format!(
                "injector exited with code {code}: {}",
                stderr.trim()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program() {
        let config = InjectorConfig {
            program: "handcue-no-such-injector".to_string(),
            ..InjectorConfig::default()
        };
        assert!(matches!(
            CommandInjector::new(&config),
            Err(Error::Dispatch(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_program_with_key_args() {
        let config = InjectorConfig {
            program: "true".to_string(),
            ..InjectorConfig::default()
        };
        let mut injector = CommandInjector::new(&config).unwrap();
        assert!(injector.tap(MediaKey::VolumeUp).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program_is_dispatch_error() {
        let config = InjectorConfig {
            program: "false".to_string(),
            ..InjectorConfig::default()
        };
        let mut injector = CommandInjector::new(&config).unwrap();
        assert!(matches!(
            injector.tap(MediaKey::Mute),
            Err(Error::Dispatch(_))
        ));
    }

    #[test]
    fn test_log_injector() {
        assert!(LogInjector.tap(MediaKey::PlayPause).is_ok());
    }
}
