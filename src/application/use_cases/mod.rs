pub mod enrollment_import;
pub mod header_mapper;
pub mod row_validator;
pub mod value_normalizer;
