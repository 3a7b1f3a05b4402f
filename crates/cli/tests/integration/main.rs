mod check_tests;
mod common;
mod plan_tests;
mod query_tests;
