use colored::Colorize;

/// Where the outcome of a run is reported
///
/// Warnings and failures end up as annotations on the CI run; plain lines
/// are regular job output.
pub trait Reporter: Send + Sync {
    fn line(&self, message: &str);
    fn warning(&self, message: &str);
    fn failure(&self, message: &str);
}

/// Reports through GitHub Actions workflow commands on stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ActionsReporter;

impl Reporter for ActionsReporter {
    fn line(&self, message: &str) {
        println!("{}", message);
    }

    fn warning(&self, message: &str) {
        println!("::warning::{}", escape_data(message));
    }

    fn failure(&self, message: &str) {
        println!("::error::{}", escape_data(message));
    }
}

/// Escape a workflow command payload so multi-line messages stay one annotation
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Format a highlighted `> label: value` line
pub fn highlight(label: &str, value: &str) -> String {
    format!("{} {}: {}", ">".bright_green(), label, value.bright_cyan())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_data() {
        assert_eq!(escape_data("plain"), "plain");
        assert_eq!(escape_data("100% done"), "100%25 done");
        assert_eq!(escape_data("line one\r\nline two"), "line one%0D%0Aline two");
    }

    #[test]
    fn test_highlight_contains_parts() {
        colored::control::set_override(false);
        assert_eq!(highlight("Tag", "production"), "> Tag: production");
    }
}
