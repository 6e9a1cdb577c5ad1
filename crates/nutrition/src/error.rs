use thiserror::Error;

#[derive(Error, Debug)]
pub enum NutritionError {
    #[error("Invalid body metrics: {field} must be {expected}, got {got}")]
    InvalidMetrics {
        field: &'static str,
        expected: &'static str,
        got: f32,
    },
}
