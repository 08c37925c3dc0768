pub mod error;

// Enrollment import module
pub mod enrollment;
