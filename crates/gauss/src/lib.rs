//! Reading and writing the input and output files of the Gaussian quantum
//! chemistry package

pub mod classify;
pub mod converge;
pub mod element;
pub mod error;
pub mod files;
pub mod gausscom;
pub mod gausslog;
pub mod node;
pub mod pdb;
pub mod section;
pub mod summary;

pub use error::Error;
