//! Domain logic shared by the database and HTTP layers.
//!
//! Nothing here touches the database. The propagation engine's per-row
//! decisions live in [`propagation`] as pure functions.

pub mod error;
pub mod ffmpeg;
pub mod files;
pub mod media;
pub mod propagation;
pub mod roles;
pub mod signing;
pub mod types;
pub mod work_lead_status;
pub mod work_lead_type;
