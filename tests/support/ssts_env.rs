use std::{
    path::PathBuf,
    sync::{Mutex, OnceLock},
};

const CONFIG_HOME: &str = "SSTS_CONFIG_HOME";
const DISABLE_KEYRING: &str = "SSTS_DISABLE_KEYRING";
const SERVER: &str = "SSTS_SERVER";

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Points the client at a scratch config home with the keyring disabled,
/// restoring the previous environment on drop.
pub struct SstsEnvGuard {
    previous: Vec<(&'static str, Option<String>)>,
    _lock: std::sync::MutexGuard<'static, ()>,
}

impl SstsEnvGuard {
    pub fn set_config_home(path: PathBuf) -> Self {
        let lock = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        let previous = [CONFIG_HOME, DISABLE_KEYRING, SERVER]
            .into_iter()
            .map(|key| (key, std::env::var(key).ok()))
            .collect();
        // SAFETY: tests run under a global lock to prevent concurrent env mutations.
        unsafe {
            std::env::set_var(CONFIG_HOME, path);
            std::env::set_var(DISABLE_KEYRING, "1");
            std::env::remove_var(SERVER);
        }
        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for SstsEnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            // SAFETY: tests run under a global lock to prevent concurrent env mutations.
            unsafe {
                match value {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}
