//! Access-key rotation decision
//!
//! Pure functions over the listing returned by the identity service. The
//! caller supplies `now`, which keeps the decision deterministic under test.

use std::cmp::Ordering;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::core::AccessKeyMetadata;

/// Maximum number of access keys the identity service lets a principal hold
pub const MAX_ACCESS_KEYS: usize = 2;

/// What to do with a principal's access keys this cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Fewer than two keys held: issue one more
    Create,
    /// Two keys held and the older one is stale: delete it, then issue one
    Replace { expired: AccessKeyMetadata },
    /// Two keys held and the older one is still within max-age
    Keep,
    /// The listing holds a key count the service should never report
    Inconsistent { count: usize },
}

/// Decide the action for `keys` given the current time and `max_age`.
///
/// A key is stale only when its age is strictly greater than `max_age`.
/// Creation timestamps in the future count as age zero.
pub fn plan(keys: &[AccessKeyMetadata], now: DateTime<Utc>, max_age: Duration) -> KeyAction {
    match keys {
        [] | [_] => KeyAction::Create,
        [first, second] => {
            let older = older_of(first, second);
            if is_expired(older, now, max_age) {
                KeyAction::Replace {
                    expired: older.clone(),
                }
            } else {
                KeyAction::Keep
            }
        }
        _ => KeyAction::Inconsistent { count: keys.len() },
    }
}

/// The older of two keys by creation time.
///
/// Equal timestamps resolve to the key whose id sorts first, so the choice
/// never depends on listing order.
pub fn older_of<'a>(a: &'a AccessKeyMetadata, b: &'a AccessKeyMetadata) -> &'a AccessKeyMetadata {
    match a.created_at.cmp(&b.created_at) {
        Ordering::Less => a,
        Ordering::Greater => b,
        Ordering::Equal => {
            if a.id <= b.id {
                a
            } else {
                b
            }
        }
    }
}

/// Whether `key` has outlived `max_age` at `now`
pub fn is_expired(key: &AccessKeyMetadata, now: DateTime<Utc>, max_age: Duration) -> bool {
    let age = now
        .signed_duration_since(key.created_at)
        .to_std()
        .unwrap_or_default();
    age > max_age
}
