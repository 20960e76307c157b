pub mod latest;
pub mod run;
