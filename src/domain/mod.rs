// Domain layer - Flux queries, readings and task descriptors
pub mod flux;
pub mod reading;
pub mod task;
