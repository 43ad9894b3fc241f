pub mod signature;
pub mod probe;
pub mod detect;
pub mod naming;
pub mod error;

pub use signature::{FileKind, Signature, SignatureTable, UNKNOWN_EXTENSION};
pub use probe::{ProbeHeader, PROBE_LEN, RIFF_PROBE_LEN};
pub use detect::{detect_type, Detector, RiffPolicy};
pub use naming::{download_name, format_bytes, capacity_summary};
pub use error::SniffError;
