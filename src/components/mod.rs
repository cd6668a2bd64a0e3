// src/components/mod.rs
pub mod gallery;
