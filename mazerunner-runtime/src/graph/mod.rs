pub mod partitioned_graph;
