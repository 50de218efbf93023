//! Command: print version information.

/// Version string stamped at build time, falling back to the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("HOMEFILES_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the homefiles version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("homefiles {}", version());
}
