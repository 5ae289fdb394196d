//! Access-code gate for remote snapshot sync.
//!
//! Codes are lower-cased and ROT13-rotated before lookup. This is obfuscation
//! only: the binding table ships inside the binary and anyone can read it.
//! Nothing here authenticates or authorizes anybody.

use crate::domain::ports::KeyValueStore;
use crate::utils::error::Result;

pub const ACCESS_CODE_KEY: &str = "access_code";

pub const DEFAULT_GIST_API_BASE: &str = "https://api.github.com";

/// Rotated code -> gist id. Fixed at build time.
const BUILTIN_BINDINGS: &[(&str, &str)] = &[("nybbtbouv123", "05bc3de9d00ceaf8d9505ec513a57ccd")];

/// Rotate ASCII letters by 13 positions, preserving case; everything else passes through.
pub fn rot13(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'a'..='z' => (((c as u8 - b'a' + 13) % 26) + b'a') as char,
            'A'..='Z' => (((c as u8 - b'A' + 13) % 26) + b'A') as char,
            _ => c,
        })
        .collect()
}

/// Case-fold then rotate, giving the table key for a user-entered code.
pub fn normalize_code(code: &str) -> String {
    rot13(&code.trim().to_lowercase())
}

#[derive(Debug, Clone)]
pub struct AccessBindings {
    gist_api_base: String,
    table: &'static [(&'static str, &'static str)],
}

impl AccessBindings {
    pub fn builtin(gist_api_base: impl Into<String>) -> Self {
        Self {
            gist_api_base: gist_api_base.into().trim_end_matches('/').to_string(),
            table: BUILTIN_BINDINGS,
        }
    }

    pub fn locator_for(&self, code: &str) -> Option<String> {
        let key = normalize_code(code);
        self.table
            .iter()
            .find(|(rotated, _)| *rotated == key)
            .map(|(_, gist_id)| format!("{}/gists/{}", self.gist_api_base, gist_id))
    }
}

impl Default for AccessBindings {
    fn default() -> Self {
        Self::builtin(DEFAULT_GIST_API_BASE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveCode {
    code: String,
    locator: String,
}

#[derive(Debug, Clone, Default)]
pub struct AccessCodeGate {
    bindings: AccessBindings,
    active: Option<ActiveCode>,
    snapshot: Option<Vec<String>>,
}

impl AccessCodeGate {
    pub fn new(bindings: AccessBindings) -> Self {
        Self {
            bindings,
            active: None,
            snapshot: None,
        }
    }

    /// Accepts the code and turns sync mode on only on an exact table match.
    /// A rejected code leaves the current state untouched.
    pub fn validate(&mut self, code: &str) -> bool {
        match self.bindings.locator_for(code) {
            Some(locator) => {
                tracing::info!("Access code accepted, remote sync enabled");
                self.active = Some(ActiveCode {
                    code: code.trim().to_string(),
                    locator,
                });
                self.snapshot = None;
                true
            }
            None => {
                tracing::debug!("Access code rejected");
                false
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn locator(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.locator.as_str())
    }

    pub fn active_code(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.code.as_str())
    }

    pub fn snapshot(&self) -> Option<&[String]> {
        self.snapshot.as_deref()
    }

    pub(crate) fn hold_snapshot(&mut self, visited: Vec<String>) {
        self.snapshot = Some(visited);
    }

    /// Re-activate from a previously saved code, if one exists and still matches.
    pub async fn restore<S: KeyValueStore>(&mut self, store: &S) -> Result<bool> {
        match store.get(ACCESS_CODE_KEY).await? {
            Some(saved) => {
                let accepted = self.validate(&saved);
                if !accepted {
                    tracing::warn!("Saved access code no longer matches any binding");
                }
                Ok(accepted)
            }
            None => Ok(false),
        }
    }

    pub async fn save<S: KeyValueStore>(&self, store: &S) -> Result<()> {
        if let Some(code) = self.active_code() {
            store.set(ACCESS_CODE_KEY, code).await?;
        }
        Ok(())
    }

    /// Leave sync mode: forget the code, the locator and any held snapshot.
    pub async fn clear<S: KeyValueStore>(&mut self, store: &S) -> Result<()> {
        self.active = None;
        self.snapshot = None;
        store.remove(ACCESS_CODE_KEY).await?;
        tracing::info!("Access code removed, using local storage only");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStorage;

    #[test]
    fn test_rot13() {
        assert_eq!(rot13("allogobhi123"), "nybbtbouv123");
        assert_eq!(rot13("Hello, World!"), "Uryyb, Jbeyq!");
        assert_eq!(rot13(&rot13("round trip")), "round trip");
    }

    #[test]
    fn test_valid_code_activates_sync() {
        let mut gate = AccessCodeGate::new(AccessBindings::builtin("https://api.github.com/"));

        assert!(gate.validate("ALLOGOBHI123"));
        assert!(gate.is_active());
        assert_eq!(
            gate.locator(),
            Some("https://api.github.com/gists/05bc3de9d00ceaf8d9505ec513a57ccd")
        );
    }

    #[test]
    fn test_invalid_code_leaves_state_unchanged() {
        let mut gate = AccessCodeGate::default();
        assert!(!gate.validate("nybbtbouv123"));
        assert!(!gate.validate(""));
        assert!(!gate.is_active());

        assert!(gate.validate("allogobhi123"));
        let locator = gate.locator().map(str::to_string);
        assert!(!gate.validate("wrong"));
        assert!(gate.is_active());
        assert_eq!(gate.locator().map(str::to_string), locator);
    }

    #[test]
    fn test_validate_is_deterministic() {
        let mut gate = AccessCodeGate::default();
        let first: Vec<(bool, Option<String>)> = ["allogobhi123", "nope", "AlloGobhi123"]
            .iter()
            .map(|code| (gate.validate(code), gate.locator().map(str::to_string)))
            .collect();
        let second: Vec<(bool, Option<String>)> = ["allogobhi123", "nope", "AlloGobhi123"]
            .iter()
            .map(|code| (gate.validate(code), gate.locator().map(str::to_string)))
            .collect();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_save_restore_and_clear() {
        let store = MemoryStorage::new();

        let mut gate = AccessCodeGate::default();
        assert!(gate.validate("allogobhi123"));
        gate.save(&store).await.unwrap();
        gate.hold_snapshot(vec!["Petra".to_string()]);
        assert_eq!(
            store.get(ACCESS_CODE_KEY).await.unwrap().as_deref(),
            Some("allogobhi123")
        );

        let mut restored = AccessCodeGate::default();
        assert!(restored.restore(&store).await.unwrap());
        assert_eq!(restored.locator(), gate.locator());

        gate.clear(&store).await.unwrap();
        assert!(!gate.is_active());
        assert!(gate.snapshot().is_none());
        assert_eq!(store.get(ACCESS_CODE_KEY).await.unwrap(), None);

        let mut after_clear = AccessCodeGate::default();
        assert!(!after_clear.restore(&store).await.unwrap());
    }

    #[tokio::test]
    async fn test_stale_saved_code_is_ignored() {
        let store = MemoryStorage::new();
        store.set(ACCESS_CODE_KEY, "retired-code").await.unwrap();

        let mut gate = AccessCodeGate::default();
        assert!(!gate.restore(&store).await.unwrap());
        assert!(!gate.is_active());
    }
}
