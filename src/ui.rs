use colored::Colorize;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

// ============================================================================
// Formatting
// ============================================================================

/// Truncate a rendered value for single-line display, keeping the start
///
/// Newlines are shown as `⏎` so multi-line user data stays on one line.
pub fn truncate_value(value: &str, max_len: usize) -> String {
    let flat = value.replace('\n', "⏎");
    if flat.chars().count() <= max_len {
        flat
    } else if max_len <= 3 {
        "...".to_string()
    } else {
        let kept: String = flat.chars().take(max_len - 3).collect();
        format!("{kept}...")
    }
}

/// "1 change", "2 changes"
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_value_short() {
        assert_eq!(truncate_value("ami-123", 20), "ami-123");
        assert_eq!(truncate_value("exact", 5), "exact");
    }

    #[test]
    fn test_truncate_value_long() {
        assert_eq!(truncate_value("#!/bin/bash echo hello", 10), "#!/bin/...");
    }

    #[test]
    fn test_truncate_value_newlines() {
        assert_eq!(truncate_value("a\nb", 10), "a⏎b");
    }

    #[test]
    fn test_truncate_value_edge_cases() {
        assert_eq!(truncate_value("test", 3), "...");
        assert_eq!(truncate_value("", 10), "");
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "change"), "1 change");
        assert_eq!(plural(0, "change"), "0 changes");
        assert_eq!(plural(3, "warning"), "3 warnings");
    }
}
