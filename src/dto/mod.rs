pub mod job_dto;
pub mod patch;
