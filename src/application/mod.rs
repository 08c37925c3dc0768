pub mod use_cases;

pub use use_cases::enrollment_import::EnrollmentImportUseCase;
pub use use_cases::header_mapper::{HeaderMapper, HeaderMapping, HeaderMatch, MatchTier};
pub use use_cases::row_validator::RowValidator;
pub use use_cases::value_normalizer::ValueNormalizer;
