//! Request correlation identifiers.

/// Opaque identifier correlating a status query with its answer.
///
/// Handed out by the runner for every [`Event::QueryStatus`](crate::Event::QueryStatus)
/// and echoed back in the matching
/// [`Notification::Status`](crate::Notification::Status), so callers with
/// several queries in flight can tell the answers apart.
///
/// # Example
///
/// ```ignore
/// let request_id = handle.query_status(id)?;
///
/// while let Some(notification) = notifications.recv().await {
///     if let Notification::Status { request_id: answered, status, .. } = notification {
///         if answered == request_id {
///             return Ok(status);
///         }
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "query-{}", self.0)
    }
}

/// Stamp identifying one arming of a delivery timer.
///
/// Every request record gets a fresh nonce when its timer is armed, and the
/// fired [`DeliveryCheck`](crate::DeliveryCheck) carries it back. A check
/// whose nonce no longer matches the ledger entry is a late fire from a
/// cancelled timer and must be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestNonce(pub u64);

impl RequestNonce {
    /// Return this nonce and advance `self` to the next one.
    pub fn bump(&mut self) -> RequestNonce {
        let current = *self;
        self.0 = self.0.wrapping_add(1);
        current
    }
}

impl std::fmt::Display for RequestNonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "nonce-{}", self.0)
    }
}
