mod gate;

pub use gate::{AdmissionGate, AdmissionToken};
