use console::style;
use termimad::MadSkin;

pub const FAREWELL: &str = "Goodbye!";

pub fn display_banner(model: &str) {
    println!(
        "{} {}",
        style("Hello! I'm your AI assistant.").bold().magenta(),
        style(format!("(model: {})", model)).dim()
    );
    println!(
        "Type {} for commands, {} to exit.",
        style("/help").bold().cyan(),
        style("quit").bold().cyan()
    );
}

/// Prints an assistant reply, rendering it as markdown when it looks like
/// markdown.
pub fn display_response(response: &str) {
    println!("\n{}", style("Assistant:").bold().blue());
    if looks_like_markdown(response) {
        MadSkin::default().print_text(response);
    } else {
        println!("{}", response);
    }
    println!();
}

/// Prints command output as-is.
pub fn display_output(output: &str) {
    println!("{}", output);
}

pub fn display_error(message: &str) {
    eprintln!("{}", style(message).red());
}

pub fn display_farewell() {
    println!("{}", style(FAREWELL).bold().magenta());
}

fn looks_like_markdown(text: &str) -> bool {
    text.contains("```")
        || text.contains('`')
        || text.contains("**")
        || text.lines().any(|l| {
            let l = l.trim_start();
            l.starts_with('#') || l.starts_with("- ") || l.starts_with("* ")
        })
}
