//! Handles for bodies and springs
//!
//! Bodies and springs live in slot maps and refer to each other by key, so a
//! spring never owns its endpoints. A key to a removed entry stays invalid
//! even after its slot is reused.

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Handle to a body in a world
    pub struct BodyId;

    /// Handle to a spring in a world
    pub struct SpringId;
}

/// Body storage; iteration is in slot order
pub type BodyMap<T> = SlotMap<BodyId, T>;

/// Spring storage; iteration is in slot order
pub type SpringMap<T> = SlotMap<SpringId, T>;
