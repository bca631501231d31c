use colored::Colorize;

pub fn print_section_header(title: &str) {
    println!("{}", title.bold().cyan());
    let display_width = title.chars().count();
    println!("{}", "─".repeat(display_width).cyan());
}

#[must_use]
pub fn format_delivery_success(recipient: &str) -> String {
    format!("{} {recipient}", "sent".green())
}

#[must_use]
pub fn format_delivery_failure(recipient: &str, reason: &str) -> String {
    format!("{} {recipient}: {reason}", "failed".red().bold())
}
