pub mod output;

pub use output::{ConsoleReporter, print_failure, print_success};
