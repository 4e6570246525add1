// src/translate/relocate.rs

//! Path relocation for rpm-ostree
//!
//! rpm-ostree refuses package files under some prefixes but links other
//! locations back into place at deploy time. Files destined for a refused
//! prefix are moved to the location that gets linked back.

use tracing::debug;

/// Refused prefix and the location rpm-ostree links back into it
const RELOCATIONS: &[(&str, &str)] = &[("/usr/local/", "/var/usrlocal/")];

/// Rewrite `path` if it falls under a refused prefix
///
/// The longest matching prefix wins, and only that prefix is replaced.
pub fn relocate(path: &str) -> String {
    let matched = RELOCATIONS
        .iter()
        .filter(|(prefix, _)| path.starts_with(prefix))
        .max_by_key(|(prefix, _)| prefix.len());

    match matched {
        Some((prefix, target)) => {
            let relocated = format!("{target}{}", &path[prefix.len()..]);
            debug!("Relocating {} to {}", path, relocated);
            relocated
        }
        None => path.to_string(),
    }
}
