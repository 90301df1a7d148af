pub mod application;
pub mod directory;
pub mod interview;
pub mod review;
