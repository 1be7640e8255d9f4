use serde::{Deserialize, Serialize};

/// A single cookie with the attributes it was written with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CookieEntry {
    pub name: String,
    pub value: String,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub secure: bool,
    /// Raw `Expires` attribute, if the server sent one. Kept verbatim; the
    /// jar itself does no expiry bookkeeping (the server controls it).
    pub expires: Option<String>,
}

impl CookieEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            domain: None,
            secure: false,
            expires: None,
        }
    }

    /// Wire footprint of this entry in a `Cookie` header: name, value, and
    /// the `=` plus separator overhead.
    pub fn size(&self) -> usize {
        self.name.len() + self.value.len() + 2
    }

    fn identity_matches(&self, other: &CookieEntry) -> bool {
        self.name == other.name && self.path == other.path && self.domain == other.domain
    }
}

/// In-memory cookie jar for a single API origin.
///
/// Entries are keyed by (name, path, domain) — the full write identity —
/// which is what makes [`CookieJar::remove`] reliable where the original
/// blind path-variant deletion was best-effort.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CookieJar {
    entries: Vec<CookieEntry>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry with the same write identity.
    pub fn set(&mut self, entry: CookieEntry) {
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|e| e.identity_matches(&entry))
        {
            *existing = entry;
        } else {
            self.entries.push(entry);
        }
    }

    /// First entry with the given name, regardless of path/domain.
    pub fn get(&self, name: &str) -> Option<&CookieEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn get_value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|e| e.value.as_str())
    }

    /// Remove every entry with the given name. Returns how many were
    /// removed.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.name != name);
        before - self.entries.len()
    }

    /// Parse one `Set-Cookie` response header into the jar. A `Max-Age`
    /// of zero or less deletes the matching entry, mirroring browser
    /// behaviour.
    pub fn apply_set_cookie(&mut self, header: &str) {
        let Some((name, rest)) = header.split_once('=') else {
            return;
        };

        let mut entry = CookieEntry::new(name.trim(), "");
        let mut max_age: Option<i64> = None;
        let mut first = true;

        for part in rest.split(';') {
            let part = part.trim();
            if first {
                entry.value = part.to_string();
                first = false;
                continue;
            }

            if let Some((k, v)) = part.split_once('=') {
                match k.trim().to_ascii_lowercase().as_str() {
                    "path" => entry.path = Some(v.trim().to_string()),
                    "domain" => entry.domain = Some(v.trim().trim_start_matches('.').to_string()),
                    "expires" => entry.expires = Some(v.trim().to_string()),
                    "max-age" => max_age = v.trim().parse().ok(),
                    _ => {}
                }
            } else if part.eq_ignore_ascii_case("secure") {
                entry.secure = true;
            }
        }

        if matches!(max_age, Some(age) if age <= 0) {
            self.entries.retain(|e| !e.identity_matches(&entry));
            return;
        }

        self.set(entry);
    }

    /// Serialize the jar into a `Cookie` request header value, or `None`
    /// when the jar is empty.
    pub fn request_header(&self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }
        Some(
            self.entries
                .iter()
                .map(|e| format!("{}={}", e.name, e.value))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Aggregate wire footprint of the jar.
    pub fn total_size(&self) -> usize {
        self.entries.iter().map(CookieEntry::size).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CookieEntry> {
        self.entries.iter()
    }

    pub(crate) fn entries_mut(&mut self) -> &mut Vec<CookieEntry> {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
