// handlers/mod.rs
//
// auth      - /api/auth/register, /api/auth/login (public)
// resources - /api/<plural> CRUD; reads are public, writes need a bearer token
// health    - / and /health
pub mod auth;
pub mod health;
pub mod resources;
