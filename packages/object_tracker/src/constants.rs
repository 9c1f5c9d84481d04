// A poisoned lock means a track/untrack caller panicked while mutating the
// table, so we can no longer vouch for the registry's contents (we panic).
pub(crate) const ERR_POISONED_LOCK: &str = "encountered poisoned lock - continued execution \
    is not safe because the registry contents can no longer be trusted";
