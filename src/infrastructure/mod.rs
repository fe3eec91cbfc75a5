pub mod clock;
pub mod gateway;
pub mod in_memory;
