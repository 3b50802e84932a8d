// handlers/mod.rs - Handler groups
//
// public    → account and service routes (/, /health, /api/register, /api/login)
// data      → generic CRUD and find, one instantiation per entity kind
// relations → read-only lookups nested under a parent record

pub mod data;
pub mod public;
pub mod relations;
