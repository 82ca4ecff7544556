pub mod algorithm;
pub mod context;
pub mod graph;
pub mod vertex;
pub mod writer;
