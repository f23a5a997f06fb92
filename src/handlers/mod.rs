// handlers/mod.rs
//
// todo   - the todo resource, mounted under the configured API prefix
// probe  - health probes and metrics under /q
// root   - service info at /
pub mod probe;
pub mod root;
pub mod todo;

pub use root::root;
