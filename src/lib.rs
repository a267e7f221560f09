//! Twitter Board library.
//!
//! A minimal message board: visitors post short text entries and read them
//! back newest first. Posts live in a single PostgreSQL table.

pub mod components;
pub mod config;
pub mod db;
pub mod web;
