use super::codec::{encode_value, COMPRESSED_MARKER};
use super::jar::CookieJar;
use storefront_types::CookiePolicy;

/// Keeps the cookie jar under the backend's request-header limits.
///
/// Three passes, each safe to run at any time:
/// - [`cleanup`](Self::cleanup) drops non-essential cookies when the jar is
///   oversized as a whole
/// - [`compress_large`](Self::compress_large) shrinks individual oversized
///   values through the reversible codec
/// - [`prune_route_cookies`](Self::prune_route_cookies) bounds the count of
///   per-navigation route markers
#[derive(Debug, Clone)]
pub struct CookieGovernor {
    policy: CookiePolicy,
}

impl CookieGovernor {
    pub fn new(policy: CookiePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &CookiePolicy {
        &self.policy
    }

    /// If the jar's aggregate size exceeds the threshold, delete every
    /// non-essential cookie. Essential cookies (CSRF, session, anything
    /// matching the essential markers) always survive. Returns the number
    /// of cookies removed.
    pub fn cleanup(&self, jar: &mut CookieJar) -> usize {
        let total = jar.total_size();
        if total <= self.policy.max_total_bytes {
            return 0;
        }

        let before = jar.len();
        let policy = &self.policy;
        jar.entries_mut().retain(|e| policy.is_essential(&e.name));
        let removed = before - jar.len();

        tracing::warn!(
            total_bytes = total,
            limit = policy.max_total_bytes,
            removed,
            "cookie jar oversized, cleared non-essential cookies"
        );
        removed
    }

    /// Compress every value above the size threshold that is not already
    /// compressed. A value is only rewritten when the encoded form is
    /// strictly smaller, so this never grows the jar. Returns the number
    /// of values rewritten.
    pub fn compress_large(&self, jar: &mut CookieJar) -> usize {
        let threshold = self.policy.compress_threshold_bytes;
        let mut rewritten = 0;

        for entry in jar.entries_mut().iter_mut() {
            if entry.value.len() <= threshold || entry.value.starts_with(COMPRESSED_MARKER) {
                continue;
            }
            match encode_value(&entry.value) {
                Ok(encoded) if encoded.len() < entry.value.len() => {
                    tracing::debug!(
                        cookie = %entry.name,
                        from = entry.value.len(),
                        to = encoded.len(),
                        "compressed oversized cookie value"
                    );
                    entry.value = encoded;
                    rewritten += 1;
                }
                Ok(_) => {
                    // Incompressible value; leave it alone.
                }
                Err(e) => {
                    tracing::warn!(cookie = %entry.name, error = %e, "cookie compression failed");
                }
            }
        }
        rewritten
    }

    /// Delete all but the most recent `keep_latest` route-marker cookies.
    ///
    /// "Most recent" is a lexical comparison of raw values — a best-effort
    /// heuristic carried over from the backend's value format, not a true
    /// timestamp ordering. No-op when the count is within bounds. Returns
    /// the number of cookies removed.
    pub fn prune_route_cookies(&self, jar: &mut CookieJar, keep_latest: usize) -> usize {
        let prefix = self.policy.route_cookie_prefix.as_str();
        let mut route: Vec<(String, String)> = jar
            .iter()
            .filter(|e| e.name.starts_with(prefix))
            .map(|e| (e.value.clone(), e.name.clone()))
            .collect();

        if route.len() <= keep_latest {
            return 0;
        }

        // Lexically greatest values are treated as newest.
        route.sort();
        route.reverse();
        let survivors: Vec<&str> = route
            .iter()
            .take(keep_latest)
            .map(|(_, name)| name.as_str())
            .collect();

        let before = jar.len();
        jar.entries_mut()
            .retain(|e| !e.name.starts_with(prefix) || survivors.contains(&e.name.as_str()));
        let removed = before - jar.len();

        tracing::debug!(removed, kept = keep_latest, "pruned route-marker cookies");
        removed
    }
}
