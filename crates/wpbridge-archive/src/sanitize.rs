use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Where Playground exports keep their SQLite database. It is a dotfile but
/// is the backup's only copy of the database, so it is never hidden.
pub const PLAYGROUND_DATABASE: &str = "wp-content/database/.ht.sqlite";

/// Platform metadata and dotfiles that never belong to a site backup's content.
///
/// Matches a `__MACOSX/` tree, a dotfile at the root, or any path component
/// below the root that starts with `.`, except [`PLAYGROUND_DATABASE`].
pub fn is_hidden_entry(path: &str) -> bool {
    if path == PLAYGROUND_DATABASE {
        return false;
    }
    path.starts_with("__MACOSX/") || path.starts_with('.') || path.contains("/.")
}

/// Normalize an archive entry name: forward slashes, no leading `./`.
pub fn normalize_entry_name(raw: &str) -> String {
    let mut name = raw.replace('\\', "/");
    while let Some(rest) = name.strip_prefix("./") {
        name = rest.to_owned();
    }
    name
}

/// Normalize raw entry names and drop hidden ones, keeping archive order.
pub fn visible_entries<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|s| normalize_entry_name(s.as_ref()))
        .filter(|name| !name.is_empty() && name != "." && !is_hidden_entry(name))
        .collect()
}

/// Resolve `entry` beneath `base`, refusing anything that would land outside it.
pub fn resolve_entry(base: &Path, entry: &str) -> Result<PathBuf> {
    let mut relative = PathBuf::new();
    let mut depth = 0usize;

    for component in Path::new(entry).components() {
        match component {
            Component::Normal(part) => {
                relative.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir if depth > 0 => {
                relative.pop();
                depth -= 1;
            }
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(Error::ZipSlip {
                    entry: entry.to_owned(),
                });
            }
        }
    }

    Ok(base.join(relative))
}
