pub mod controller;
pub mod media;
pub mod speech;
pub mod timeline;
pub mod tracker;
