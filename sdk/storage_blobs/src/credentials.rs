/// The well-known account used by Azurite and the legacy Azure Storage
/// Emulator; handy for tests.
pub const EMULATOR_ACCOUNT: &str = "devstoreaccount1";

/// The well-known account key matching [`EMULATOR_ACCOUNT`].
pub const EMULATOR_ACCOUNT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";

/// Credential material for the storage data plane.
#[derive(Clone)]
pub enum StorageCredentials {
    /// Account name and base64-encoded account key.
    Key(String, String),
}

impl StorageCredentials {
    pub fn emulator() -> Self {
        Self::Key(EMULATOR_ACCOUNT.to_string(), EMULATOR_ACCOUNT_KEY.to_string())
    }
}

impl std::fmt::Debug for StorageCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageCredentials::Key(account, _) => f
                .debug_struct("StorageCredentials")
                .field("credential", &"Key")
                .field("account", account)
                .finish(),
        }
    }
}
