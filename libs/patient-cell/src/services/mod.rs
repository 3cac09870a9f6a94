pub mod patient;

pub use patient::PatientProfileService;
