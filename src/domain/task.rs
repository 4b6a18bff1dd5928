// Task descriptor - a named recurring Flux pipeline registered with InfluxDB
use crate::domain::flux;

#[derive(Debug, Clone, PartialEq)]
pub struct TaskSpec {
    pub name: String,
    pub every_minutes: u32,
    pub pipeline: String,
}

impl TaskSpec {
    pub fn new(name: String, every_minutes: u32, pipeline: String) -> Self {
        Self {
            name,
            every_minutes,
            pipeline,
        }
    }

    /// Full Flux source for the task, with the `option task` header InfluxDB
    /// uses for scheduling and display.
    pub fn to_flux(&self) -> String {
        format!(
            "option task = {{name: {name}, every: {every}m}}\n\n{pipeline}",
            name = flux::string_literal(&self.name),
            every = self.every_minutes,
            pipeline = self.pipeline,
        )
    }

    pub fn every(&self) -> String {
        format!("{}m", self.every_minutes)
    }
}
