//! Builder module for constructing de Bruijn graphs
//!
//! This module covers everything before traversal:
//! 1. Read fragments from k-mer lists, read-pair files, adjacency lists or FASTA/FASTQ
//! 2. Validate each fragment against k, the alphabet and the overlap rule
//! 3. Intern overlap boundaries as nodes and add one edge per fragment

pub mod config;
pub mod graph_builder;
pub mod parse;

pub use config::{AssemblyConfig, OverlapPolicy};
pub use graph_builder::{build_graph, BuildReport, ConstructionError, GraphBuilder};
