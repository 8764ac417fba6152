//! Helper functions shared by templates and logging

pub mod date;
