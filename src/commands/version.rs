//! Command: print version information.

/// Version string, overridable at build time through `DOTFILES_VERSION`.
#[must_use]
pub fn version() -> &'static str {
    option_env!("DOTFILES_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the dotfiles version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("dotfiles {}", version());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
