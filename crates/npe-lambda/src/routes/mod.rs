pub mod cases;
pub mod health;
pub mod model_answer;
