pub mod output;
pub mod steam;
