pub mod normalize;
pub mod pool;
pub mod report;
pub mod transcript;
