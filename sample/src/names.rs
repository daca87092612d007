use rand::distributions::Alphanumeric;
use rand::Rng;

/// Random resource name: `prefix` followed by `suffix_len` alphanumeric
/// characters. Not cryptographically strong; collisions are left for the
/// service to reject.
pub fn random_name(prefix: &str, suffix_len: usize) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..suffix_len)
        .map(|_| rng.sample(Alphanumeric) as char)
        .collect();
    format!("{prefix}{suffix}")
}

/// Storage account names must be lowercase alphanumeric.
pub fn random_storage_account_name(prefix: &str, suffix_len: usize) -> String {
    random_name(prefix, suffix_len).to_lowercase()
}
