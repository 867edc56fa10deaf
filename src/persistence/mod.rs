//! Plain-record persistence
//!
//! Features:
//! - Field-keyed `"Circle"` record per body, camelCase keys
//! - World snapshot with springs referring to bodies by index
//! - JSON via serde_json; restoring validates every record

pub mod record;
pub mod snapshot;

pub use record::{CircleRecord, Record};
pub use snapshot::{SpringRecord, WorldSnapshot};
