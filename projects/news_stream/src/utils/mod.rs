pub mod field_extraction;
