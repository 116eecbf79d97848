// tests/property/main.rs

mod gpu_pool;
mod state_paths;
