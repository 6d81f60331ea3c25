//! Buffer change notifications.

use tether_core::{Notification, ParameterSet, Scalar};

/// Forward `notification` to every buffer referenced by `params`.
///
/// Only resource-handle slots holding a reference are notified; all other
/// parameters ignore it. Returns the number of buffers notified.
pub fn route_notification(params: &ParameterSet, notification: &Notification) -> usize {
    let mut routed = 0;
    for (_, _, value) in params.iter() {
        for slot in value.to_slots() {
            if let Scalar::Buffer(Some(buffer)) = slot {
                buffer.notify(notification);
                routed += 1;
            }
        }
    }
    routed
}
