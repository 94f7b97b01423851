mod common;
mod parameters;
mod policy;
mod scoring;
