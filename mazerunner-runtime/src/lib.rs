pub mod algorithms;
pub mod context;
pub mod dispatcher;
pub mod graph;
pub mod io;
pub mod local;
pub mod observability;
