//! Configuration file locations.

pub mod xdg_root;
