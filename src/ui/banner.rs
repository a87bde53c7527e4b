// Fri Oct 16 2026 - Alex

use colored::*;

pub const TAGLINE: &str = "CodeWarrior vtable to C++ header";

/// `vtbl-header-generator v0.1.0 - CodeWarrior vtable to C++ header`
pub fn banner_line() -> String {
    format!(
        "{} {} - {}",
        env!("CARGO_PKG_NAME").cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).green(),
        TAGLINE
    )
}

/// Goes to stderr so it never mixes with headers printed on stdout.
pub fn print_banner() {
    eprintln!("{}", banner_line());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_line_names_package_and_version() {
        colored::control::set_override(false);
        let line = banner_line();
        colored::control::unset_override();

        assert!(line.starts_with(env!("CARGO_PKG_NAME")));
        assert!(line.contains(&format!("v{}", env!("CARGO_PKG_VERSION"))));
        assert!(line.ends_with(TAGLINE));
        assert_eq!(line.lines().count(), 1);
    }
}
