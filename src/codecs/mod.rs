//! Adapters for the three external collaborator contracts. The
//! reference implementation shells out to `fpzip`/JBIG/PPMd subprocesses;
//! those aren't real dependencies this crate can take on, so each contract
//! is realized here with an in-process, real registry crate instead —
//! `flate2` (already part of the inherited dependency stack) for the float
//! and 2D-binary codecs, `zstd` for the general byte codec.

pub mod binary_matrix_codec;
pub mod byte_codec;
pub mod float_codec;
