//! SQL queries, grouped by table.

pub mod videos;
