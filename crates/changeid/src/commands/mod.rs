pub mod check;
pub mod install;
pub mod run;
